use anyhow::anyhow;
use clap::Args;
use mcstore::database::DatabaseConn;
use mcstore::{format_size, shared_connection, McConfig, OutputFormat};
use serde::Serialize;

/// Arguments for the Backup command
#[derive(Args)]
pub struct BackupArgs {
    /// Copy the file as it is, without opening or upgrading the store first
    #[clap(long)]
    pub no_upgrade: bool,
}

#[derive(Debug, Serialize)]
struct BackupResult {
    source: String,
    backup: String,
    size_bytes: u64,
}

pub fn run(config: &McConfig, args: BackupArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let BackupArgs { no_upgrade } = args;
    let source = config.database_path(None);

    let backup = if no_upgrade {
        if !source.exists() {
            return Err(anyhow!(
                "No store at {} (run: mcstore init)",
                source.display()
            ));
        }
        // Opening checks the file is a readable store before it is copied
        drop(DatabaseConn::open_path(&source)?);
        mcstore::database::backup_db_file(&source, &chrono::Local::now())?
    } else {
        let db = shared_connection(config).map_err(|e| anyhow!("Failed to open store: {}", e))?;
        db.backup()?
            .ok_or_else(|| anyhow!("Store at {} has no backing file", source.display()))?
    };

    let result = BackupResult {
        source: source.to_string_lossy().to_string(),
        backup: backup.to_string_lossy().to_string(),
        size_bytes: std::fs::metadata(&backup).map(|m| m.len()).unwrap_or(0),
    };

    if super::print_json(&result, output_format)? {
        return Ok(());
    }

    println!("Backed up {}", result.source);
    println!("       to {} ({})", result.backup, format_size(result.size_bytes));
    Ok(())
}
