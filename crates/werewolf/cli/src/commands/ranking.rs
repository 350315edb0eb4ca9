//! Ranking and standings commands

use crate::error::CliResult;
use crate::output::{self, rate_band, OutputFormat};
use crate::state::StateStore;
use colored::Colorize;
use serde::Serialize;
use werewolf_runtime::{GameConfig, RankingEntry};

/// One ranking line for structured output
#[derive(Debug, Serialize)]
struct RankingRow {
    rank: usize,
    identity: String,
    games: u32,
    wins: u32,
    win_rate: f64,
}

/// Print the ranking; tables colour each win rate by band
pub fn print_ranking(entries: &[RankingEntry], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", "Global Ranking".bold().cyan());
            println!("{}", "=".repeat(40));
            println!(
                "  {:>4}  {:<10} {:>6} {:>6}  {}",
                "#".dimmed(),
                "Player".dimmed(),
                "Games".dimmed(),
                "Wins".dimmed(),
                "Rate".dimmed()
            );
            for (index, entry) in entries.iter().enumerate() {
                println!(
                    "  {:>4}  {:<10} {:>6} {:>6}  {}",
                    index + 1,
                    entry.identity.to_string().bold(),
                    entry.total,
                    entry.wins,
                    rate_band(entry.win_rate)
                );
            }
            Ok(())
        }
        OutputFormat::Json | OutputFormat::Yaml => {
            let rows: Vec<RankingRow> = entries
                .iter()
                .enumerate()
                .map(|(index, entry)| RankingRow {
                    rank: index + 1,
                    identity: entry.identity.to_string(),
                    games: entry.total,
                    wins: entry.wins,
                    win_rate: entry.win_rate,
                })
                .collect();
            output::print_single(&rows, format)
        }
    }
}

/// `werewolf ranking`
pub fn show(store: &StateStore, config: GameConfig, format: OutputFormat) -> CliResult<()> {
    let moderator = store.moderator(config)?;
    print_ranking(&moderator.ranking(), format)
}

/// `werewolf reset`
pub fn reset(store: &StateStore, config: GameConfig) -> CliResult<()> {
    if store.load()?.is_none() {
        output::print_info(&format!("No state at {}", store.path().display()));
        return Ok(());
    }
    let mut moderator = store.moderator(config)?;
    moderator.reset_standings();
    store.save(&moderator.snapshot())?;
    output::print_success("Global standings reset");
    Ok(())
}
