use anyhow::anyhow;
use clap::{Args, Subcommand};
use mcstore::{shared_connection, McConfig, OutputFormat};
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Arguments for the Settings command
#[derive(Args)]
pub struct SettingsArgs {
    #[clap(subcommand)]
    pub command: Option<SettingsCommands>,
}

/// Settings subcommands
#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show the reminder settings (default when no subcommand)
    Show,

    /// List breathing phrases in display order
    Phrases,

    /// List rest actions in display order
    RestActions,
}

#[derive(Tabled)]
struct SettingRow {
    setting: &'static str,
    value: String,
}

pub fn run(config: &McConfig, args: SettingsArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let db = shared_connection(config).map_err(|e| anyhow!("Failed to open store: {}", e))?;

    match args.command {
        None | Some(SettingsCommands::Show) => {
            let settings = db.settings().get()?;
            if super::print_json(&settings, output_format)? {
                return Ok(());
            }

            let rows = vec![
                SettingRow {
                    setting: "rest reminder",
                    value: on_off(settings.rest_reminder_active),
                },
                SettingRow {
                    setting: "rest interval",
                    value: format!("{} min", settings.rest_reminder_interval),
                },
                SettingRow {
                    setting: "breathing reminder",
                    value: on_off(settings.breathing_reminder_active),
                },
                SettingRow {
                    setting: "breathing interval",
                    value: format!("{} min", settings.breathing_reminder_interval),
                },
                SettingRow {
                    setting: "audio file",
                    value: if settings.breathing_reminder_audio_path.is_empty() {
                        "(none)".to_string()
                    } else {
                        settings.breathing_reminder_audio_path.clone()
                    },
                },
                SettingRow {
                    setting: "volume",
                    value: format!("{}%", settings.breathing_reminder_volume),
                },
                SettingRow {
                    setting: "notification",
                    value: format!("{:?}", settings.breathing_reminder_notification_type)
                        .to_lowercase(),
                },
                SettingRow {
                    setting: "phrase setup",
                    value: format!("{:?}", settings.breathing_reminder_phrase_setup).to_lowercase(),
                },
            ];
            print_table(&rows, output_format);
        }
        Some(SettingsCommands::Phrases) => {
            let phrases = db.phrases().list()?;
            if !super::print_json(&phrases, output_format)? {
                print_table(&phrases, output_format);
            }
        }
        Some(SettingsCommands::RestActions) => {
            let actions = db.rest_actions().list()?;
            if !super::print_json(&actions, output_format)? {
                print_table(&actions, output_format);
            }
        }
    }
    Ok(())
}

fn on_off(active: bool) -> String {
    let label = if active { "on" } else { "off" };
    label.to_string()
}

fn print_table<T: Tabled>(rows: &[T], output_format: OutputFormat) {
    let mut table = Table::new(rows);
    match output_format {
        OutputFormat::Markdown => table.with(Style::markdown()),
        _ => table.with(Style::rounded()),
    };
    println!("{}", table);
}
