use anyhow::anyhow;
use clap::Args;
use mcstore::{shared_connection, McConfig, OutputFormat};
use serde::Serialize;

/// Arguments for the Init command
#[derive(Args)]
pub struct InitArgs {
    /// Seed test data instead of first-run content when the store is created
    #[clap(long)]
    pub testing: bool,
}

#[derive(Debug, Serialize)]
struct InitResult {
    path: String,
    created: bool,
    from_version: u32,
    to_version: u32,
    applied: Vec<u32>,
}

pub fn run(config: &McConfig, args: InitArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let InitArgs { testing } = args;

    let mut config = config.clone();
    config.testing |= testing;

    let path = config.database_path(None);
    let created = !path.exists();

    let db = shared_connection(&config).map_err(|e| anyhow!("Failed to open store: {}", e))?;
    let report = db.last_migration();

    let result = InitResult {
        path: path.to_string_lossy().to_string(),
        created,
        from_version: report.from,
        to_version: report.to,
        applied: report.applied.clone(),
    };

    if super::print_json(&result, output_format)? {
        return Ok(());
    }

    println!(
        "Store {} at {}",
        if result.created { "created" } else { "opened" },
        result.path
    );
    if report.is_noop() {
        println!("Schema is up to date (v{})", result.to_version);
    } else {
        let applied: Vec<String> = result.applied.iter().map(|v| v.to_string()).collect();
        println!(
            "Upgraded v{} -> v{} (steps: {})",
            result.from_version,
            result.to_version,
            applied.join(", ")
        );
    }
    Ok(())
}
