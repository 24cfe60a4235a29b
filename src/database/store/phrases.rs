//! Breathing phrase repository

use crate::database::core::schema::PhrasesTable;
use crate::database::error::Result;
use rusqlite::{params, Connection};
use serde::Serialize;

/// A stored breathing phrase
///
/// `ib_*` is shown while breathing in, `ob_*` while breathing out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "display", derive(tabled::Tabled))]
pub struct Phrase {
    pub id: i64,
    pub title: String,
    pub ib_phrase: String,
    pub ob_phrase: String,
    pub vertical_order: i64,
    pub ib_short_phrase: String,
    pub ob_short_phrase: String,
}

/// Fields of a phrase about to be inserted
#[derive(Debug, Clone, Copy)]
pub struct NewPhrase<'s> {
    pub title: &'s str,
    pub ib_phrase: &'s str,
    pub ob_phrase: &'s str,
    pub ib_short_phrase: &'s str,
    pub ob_short_phrase: &'s str,
}

pub struct PhraseRepository<'a> {
    conn: &'a Connection,
}

impl<'a> PhraseRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Append a phrase below the existing ones, returning its id
    pub fn insert(&self, phrase: &NewPhrase<'_>) -> Result<i64> {
        let sql = format!(
            "INSERT INTO {table} ({title}, {ib}, {ob}, {order}, {ib_short}, {ob_short}) \
             VALUES (?1, ?2, ?3, (SELECT COALESCE(MAX({order}), -1) + 1 FROM {table}), ?4, ?5)",
            table = PhrasesTable::NAME,
            title = PhrasesTable::TITLE,
            ib = PhrasesTable::IB_PHRASE,
            ob = PhrasesTable::OB_PHRASE,
            order = PhrasesTable::VERTICAL_ORDER,
            ib_short = PhrasesTable::IB_SHORT_PHRASE,
            ob_short = PhrasesTable::OB_SHORT_PHRASE,
        );
        self.conn.execute(
            &sql,
            params![
                phrase.title,
                phrase.ib_phrase,
                phrase.ob_phrase,
                phrase.ib_short_phrase,
                phrase.ob_short_phrase
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All phrases in display order
    pub fn list(&self) -> Result<Vec<Phrase>> {
        let sql = format!(
            "SELECT {}, {}, {}, {}, {}, {}, {} FROM {} ORDER BY {}",
            PhrasesTable::ID,
            PhrasesTable::TITLE,
            PhrasesTable::IB_PHRASE,
            PhrasesTable::OB_PHRASE,
            PhrasesTable::VERTICAL_ORDER,
            PhrasesTable::IB_SHORT_PHRASE,
            PhrasesTable::OB_SHORT_PHRASE,
            PhrasesTable::NAME,
            PhrasesTable::VERTICAL_ORDER,
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let phrases = stmt
            .query_map([], |row| {
                Ok(Phrase {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    ib_phrase: row.get(2)?,
                    ob_phrase: row.get(3)?,
                    vertical_order: row.get(4)?,
                    ib_short_phrase: row.get(5)?,
                    ob_short_phrase: row.get(6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(phrases)
    }

    pub fn count(&self) -> Result<u64> {
        let count: u64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", PhrasesTable::NAME),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(&PhrasesTable::create_sql(), []).unwrap();
        conn
    }

    #[test]
    fn test_insert_appends_in_order() {
        let conn = create_test_db();
        let repo = PhraseRepository::new(&conn);

        for title in ["first", "second", "third"] {
            repo.insert(&NewPhrase {
                title,
                ib_phrase: "in",
                ob_phrase: "out",
                ib_short_phrase: "",
                ob_short_phrase: "",
            })
            .unwrap();
        }

        let phrases = repo.list().unwrap();
        assert_eq!(repo.count().unwrap(), 3);
        let titles: Vec<_> = phrases.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
        let orders: Vec<_> = phrases.iter().map(|p| p.vertical_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_short_phrases_default_to_empty() {
        let conn = create_test_db();
        conn.execute(
            "INSERT INTO phrases (title, ib_phrase, ob_phrase, vertical_order) VALUES ('t', 'i', 'o', 0)",
            [],
        )
        .unwrap();

        let phrase = &PhraseRepository::new(&conn).list().unwrap()[0];
        assert_eq!(phrase.ib_short_phrase, "");
        assert_eq!(phrase.ob_short_phrase, "");
    }
}
