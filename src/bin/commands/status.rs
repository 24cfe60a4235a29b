use anyhow::anyhow;
use mcstore::database::{upgrade_steps, DatabaseConn, SchemaDefinitions};
use mcstore::{format_size, McConfig, OutputFormat};
use serde::Serialize;
use std::path::Path;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Serialize)]
struct StoreStatus {
    path: String,
    exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema_version: Option<u32>,
    target_version: u32,
    pending: Vec<u32>,
    tables: Vec<TableStatus>,
}

#[derive(Debug, Serialize, Tabled)]
struct TableStatus {
    table: String,
    present: bool,
    rows: u64,
}

pub fn run(config: &McConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let path = config.database_path(None);
    let migrator = upgrade_steps()?;
    let status = collect_status(&path, migrator.target(), |v| migrator.pending(v))?;

    if super::print_json(&status, output_format)? {
        return Ok(());
    }

    println!("Store Status");
    println!("============\n");
    println!("  Path:           {}", status.path);
    println!(
        "  Status:         {}",
        if status.exists {
            "exists"
        } else {
            "not created (run: mcstore init)"
        }
    );
    if let Some(size) = status.size_bytes {
        println!("  Size:           {}", format_size(size));
    }
    match status.schema_version {
        Some(version) if version > status.target_version => println!(
            "  Schema:         v{} (newer than this build, v{})",
            version, status.target_version
        ),
        Some(version) => println!("  Schema:         v{}", version),
        None => println!("  Schema:         not initialized"),
    }
    if !status.pending.is_empty() {
        let pending: Vec<String> = status.pending.iter().map(|v| v.to_string()).collect();
        println!("  Pending:        {}", pending.join(", "));
    }

    if !status.tables.is_empty() {
        println!();
        let mut table = Table::new(&status.tables);
        match output_format {
            OutputFormat::Markdown => table.with(Style::markdown()),
            _ => table.with(Style::rounded()),
        };
        println!("{}", table);
    }
    Ok(())
}

/// Inspect the store file without running any upgrade step
fn collect_status(
    path: &Path,
    target_version: u32,
    pending: impl Fn(u32) -> Vec<u32>,
) -> anyhow::Result<StoreStatus> {
    let exists = path.exists();
    let mut status = StoreStatus {
        path: path.to_string_lossy().to_string(),
        exists,
        size_bytes: None,
        schema_version: None,
        target_version,
        pending: pending(0),
        tables: vec![],
    };
    if !exists {
        return Ok(status);
    }

    status.size_bytes = std::fs::metadata(path).ok().map(|m| m.len());

    let db = DatabaseConn::open_path(path).map_err(|e| anyhow!("Failed to open store: {}", e))?;
    let version = db.user_version()?;
    status.schema_version = Some(version);
    status.pending = pending(version);

    for table in SchemaDefinitions::required_tables() {
        let present = db.table_exists(table)?;
        let rows = if present { db.table_count(table)? } else { 0 };
        status.tables.push(TableStatus {
            table: table.to_string(),
            present,
            rows,
        });
    }
    Ok(status)
}
