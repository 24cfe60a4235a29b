//! Rest action repository

use crate::database::core::schema::RestActionsTable;
use crate::database::error::Result;
use rusqlite::{params, Connection};
use serde::Serialize;

/// Something to do during a rest break
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "display", derive(tabled::Tabled))]
pub struct RestAction {
    pub id: i64,
    pub title: String,
    /// Empty when the action has no picture
    pub image_path: String,
    pub vertical_order: i64,
}

pub struct RestActionRepository<'a> {
    conn: &'a Connection,
}

impl<'a> RestActionRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Append a rest action below the existing ones, returning its id
    pub fn insert(&self, title: &str, image_path: &str) -> Result<i64> {
        let sql = format!(
            "INSERT INTO {table} ({title}, {image}, {order}) \
             VALUES (?1, ?2, (SELECT COALESCE(MAX({order}), -1) + 1 FROM {table}))",
            table = RestActionsTable::NAME,
            title = RestActionsTable::TITLE,
            image = RestActionsTable::IMAGE_PATH,
            order = RestActionsTable::VERTICAL_ORDER,
        );
        self.conn.execute(&sql, params![title, image_path])?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All rest actions in display order
    pub fn list(&self) -> Result<Vec<RestAction>> {
        let sql = format!(
            "SELECT {}, {}, {}, {} FROM {} ORDER BY {}",
            RestActionsTable::ID,
            RestActionsTable::TITLE,
            RestActionsTable::IMAGE_PATH,
            RestActionsTable::VERTICAL_ORDER,
            RestActionsTable::NAME,
            RestActionsTable::VERTICAL_ORDER,
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let actions = stmt
            .query_map([], |row| {
                Ok(RestAction {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    image_path: row.get(2)?,
                    vertical_order: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(actions)
    }

    pub fn count(&self) -> Result<u64> {
        let count: u64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", RestActionsTable::NAME),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
