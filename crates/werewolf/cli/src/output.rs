//! Output formatting for CLI

use crate::error::CliResult;
use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Print rows as a table, or the serialized rows in the structured formats
pub fn print_output<T: Serialize + Tabled>(rows: Vec<T>, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("{}", "No results".dimmed());
            } else {
                println!("{}", Table::new(rows));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&rows)?),
    }
    Ok(())
}

/// Print one serializable value; tables fall back to pretty JSON
pub fn print_single<T: Serialize>(data: &T, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table | OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?)
        }
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(data)?),
    }
    Ok(())
}

/// Colour a win rate: green from 0.8, yellow from 0.5, red below
pub fn rate_band(rate: f64) -> ColoredString {
    let text = format!("{:.2}", rate);
    if rate >= 0.8 {
        text.green()
    } else if rate >= 0.5 {
        text.yellow()
    } else {
        text.red()
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert!(matches!(OutputFormat::default(), OutputFormat::Table));
    }

    #[test]
    fn test_rate_band_thresholds() {
        assert_eq!(rate_band(0.8).fgcolor(), Some(colored::Color::Green));
        assert_eq!(rate_band(0.79).fgcolor(), Some(colored::Color::Yellow));
        assert_eq!(rate_band(0.5).fgcolor(), Some(colored::Color::Yellow));
        assert_eq!(rate_band(0.49).fgcolor(), Some(colored::Color::Red));
        assert_eq!(&*rate_band(1.0), "1.00");
    }
}
