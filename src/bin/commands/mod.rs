pub mod backup;
pub mod config;
pub mod init;
pub mod settings;
pub mod status;

use mcstore::OutputFormat;
use serde::Serialize;

/// Print a serializable value in one of the JSON formats
///
/// Returns `false` when the format is a table variant and nothing was printed.
pub(crate) fn print_json<T: Serialize>(value: &T, output_format: OutputFormat) -> anyhow::Result<bool> {
    match output_format.to_json(value) {
        Some(json) => {
            println!("{}", json?);
            Ok(true)
        }
        None => Ok(false),
    }
}
