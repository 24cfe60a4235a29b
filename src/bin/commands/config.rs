use clap::Args;
use mcstore::{McConfig, OutputFormat};
use serde::Serialize;
use std::path::Path;

/// Arguments for the Config command
#[derive(Args)]
pub struct ConfigArgs {
    /// Also list backup files found in the data directory
    #[clap(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Serialize)]
struct ConfigInfo {
    config_file: String,
    data_dir: String,
    database_path: String,
    testing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    backups: Option<Vec<FileInfo>>,
}

#[derive(Debug, Serialize)]
struct FileInfo {
    name: String,
    size_bytes: u64,
}

pub fn run(config: &McConfig, args: ConfigArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let ConfigArgs { verbose } = args;

    let db_path = config.database_path(None);
    let backups = if verbose {
        Some(list_backups(Path::new(&config.data_dir), &config.db_file_name))
    } else {
        None
    };

    let info = ConfigInfo {
        config_file: McConfig::config_file_path(),
        data_dir: config.data_dir.clone(),
        database_path: db_path.to_string_lossy().to_string(),
        testing: config.testing,
        backups,
    };

    if super::print_json(&info, output_format)? {
        return Ok(());
    }

    println!("{}", config.summary());
    if let Some(backups) = &info.backups {
        println!();
        if backups.is_empty() {
            println!("No backups found.");
        } else {
            println!("Backups:");
            for file in backups {
                println!(
                    "  {:40} {}",
                    file.name,
                    mcstore::format_size(file.size_bytes)
                );
            }
        }
    }
    Ok(())
}

/// Files named `<db_file_name>_<stamp>` in the data directory, oldest first
fn list_backups(data_dir: &Path, db_file_name: &str) -> Vec<FileInfo> {
    let prefix = format!("{}_", db_file_name);
    let mut files: Vec<FileInfo> = std::fs::read_dir(data_dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter_map(|e| {
                    let name = e.file_name().to_string_lossy().to_string();
                    if !name.starts_with(&prefix) {
                        return None;
                    }
                    let size_bytes = e.metadata().ok()?.len();
                    Some(FileInfo { name, size_bytes })
                })
                .collect()
        })
        .unwrap_or_default();
    // Timestamps sort lexically
    files.sort_by(|a, b| a.name.cmp(&b.name));
    files
}
