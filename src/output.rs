//! Output formats of the `mcstore` command

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How command results are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Rounded table, or plain text for single results
    #[default]
    Table,
    Markdown,
    /// One JSON document on a single line
    Json,
    JsonPretty,
}

impl OutputFormat {
    const ALL: [OutputFormat; 4] = [
        OutputFormat::Table,
        OutputFormat::Markdown,
        OutputFormat::Json,
        OutputFormat::JsonPretty,
    ];

    /// Name accepted on the command line
    pub fn name(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Markdown => "markdown",
            Self::Json => "json",
            Self::JsonPretty => "json-pretty",
        }
    }

    /// Serialize `value` for the JSON formats; `None` means print a table instead
    pub fn to_json<T: Serialize>(self, value: &T) -> Option<serde_json::Result<String>> {
        match self {
            Self::Json => Some(serde_json::to_string(value)),
            Self::JsonPretty => Some(serde_json::to_string_pretty(value)),
            Self::Table | Self::Markdown => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        match wanted.as_str() {
            "md" => return Ok(Self::Markdown),
            "jsonpretty" => return Ok(Self::JsonPretty),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|format| format.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|f| f.name()).collect();
                format!("unknown output format '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_aliases() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("md".parse::<OutputFormat>(), Ok(OutputFormat::Markdown));
        assert_eq!(
            "jsonpretty".parse::<OutputFormat>(),
            Ok(OutputFormat::JsonPretty)
        );
        assert!("psv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_display_matches_parse() {
        for format in OutputFormat::ALL {
            assert_eq!(format.to_string().parse::<OutputFormat>(), Ok(format));
        }
    }

    #[test]
    fn test_to_json() {
        let value = serde_json::json!({"a": 1});
        assert_eq!(
            OutputFormat::Json.to_json(&value).unwrap().unwrap(),
            r#"{"a":1}"#
        );
        assert!(OutputFormat::Table.to_json(&value).is_none());
        assert!(OutputFormat::Markdown.to_json(&value).is_none());
    }
}
