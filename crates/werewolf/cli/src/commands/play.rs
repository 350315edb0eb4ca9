//! Session commands

use crate::commands::ranking;
use crate::error::{CliError, CliResult};
use crate::output::{self, OutputFormat};
use crate::state::StateStore;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;
use werewolf_runtime::{EventKind, GameConfig, Moderator, RankingEntry, SessionEvent, SessionReport};

/// Arguments of `werewolf play`
#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Number of sessions to play
    #[arg(short = 'n', long)]
    pub sessions: Option<usize>,

    /// Seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Include each session's public event log
    #[arg(long)]
    pub events: bool,

    /// Neither read nor write the state file
    #[arg(long)]
    pub ephemeral: bool,
}

/// Table row for one finished session
#[derive(Debug, Serialize, Tabled)]
struct SessionRow {
    /// Position since the last standings reset
    #[tabled(rename = "#")]
    sequence: u64,
    winner: String,
    rounds: u32,
    /// Eliminations in order
    eliminated: String,
    session: String,
}

impl From<&SessionReport> for SessionRow {
    fn from(report: &SessionReport) -> Self {
        Self {
            sequence: report.sequence,
            winner: report.winner.to_string(),
            rounds: report.rounds,
            eliminated: report
                .eliminated
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            session: report.session_id.to_string().chars().take(8).collect(),
        }
    }
}

#[derive(Serialize)]
struct PlayOutput<'a> {
    sessions: Vec<SessionRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reports: Option<&'a [SessionReport]>,
    ranking: Vec<RankingEntry>,
}

/// `werewolf play`
pub async fn execute(
    args: PlayArgs,
    store: &StateStore,
    mut config: GameConfig,
    default_sessions: Option<usize>,
    format: OutputFormat,
) -> CliResult<()> {
    let sessions = args.sessions.or(default_sessions).unwrap_or(1);
    if sessions == 0 {
        return Err(CliError::InvalidArgument(
            "--sessions must be at least 1".into(),
        ));
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }

    let mut moderator = if args.ephemeral {
        Moderator::new(config)?
    } else {
        store.moderator(config)?
    };
    let reports = moderator.run_sessions(sessions).await?;
    if !args.ephemeral {
        store.save(&moderator.snapshot())?;
    }
    let standings = moderator.ranking();

    match format {
        OutputFormat::Table => {
            println!("{}", "Sessions".bold().cyan());
            output::print_output(reports.iter().map(SessionRow::from).collect(), format)?;
            if args.events {
                for report in &reports {
                    print_event_log(report);
                }
            }
            println!();
            ranking::print_ranking(&standings, format)?;
            if !args.ephemeral {
                println!();
                output::print_info(&format!("State saved to {}", store.path().display()));
            }
            Ok(())
        }
        OutputFormat::Json | OutputFormat::Yaml => output::print_single(
            &PlayOutput {
                sessions: reports.iter().map(SessionRow::from).collect(),
                reports: args.events.then_some(reports.as_slice()),
                ranking: standings,
            },
            format,
        ),
    }
}

fn print_event_log(report: &SessionReport) {
    println!();
    println!(
        "{} {} ({})",
        "Session".bold(),
        report.sequence.to_string().bold(),
        report.session_id.to_string().dimmed()
    );
    for event in report.public_events() {
        let prefix = event_prefix(event);
        println!("  {} {}", prefix.dimmed(), describe(&event.kind));
    }
}

fn event_prefix(event: &SessionEvent) -> String {
    format!("[R{} {:?}]", event.round, event.phase)
}

/// One line of human-readable narration
fn describe(kind: &EventKind) -> String {
    match kind {
        EventKind::NightReveal { eliminated } if eliminated.is_empty() => {
            "Nobody died during the night".into()
        }
        EventKind::NightReveal { eliminated } => format!(
            "Found dead at dawn: {}",
            eliminated
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        EventKind::LastWords { player, action } => {
            let target = action.vote();
            format!("{} points at {} with their last words", player, target)
        }
        EventKind::DayVote { voter, action } => format!("{} votes {}", voter, action.vote()),
        EventKind::DayElimination { target, votes } => {
            format!("{} is voted out with {} votes", target, votes)
        }
        EventKind::HunterAction { hunter, action } => {
            format!("{} (hunter) names {}", hunter, action.vote())
        }
        EventKind::HunterShot { hunter, target } => format!("{} shoots {}", hunter, target),
        EventKind::MalformedFallback {
            actor, substitute, ..
        } => format!("{} gave no answer; substituted {}", actor, substitute),
        EventKind::Status {
            alive_wolves,
            alive_good,
        } => format!("{} werewolves and {} good remain", alive_wolves, alive_good),
        EventKind::GameOver { winner } => format!("Game over: {}", winner).bold().to_string(),
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use werewolf_types::{Action, PlayerId, Winner};

    #[test]
    fn test_describe_day_vote() {
        let kind = EventKind::DayVote {
            voter: PlayerId::seat(2),
            action: Action::Villager {
                vote: PlayerId::seat(7),
            },
        };
        assert_eq!(describe(&kind), "Player2 votes Player7");
    }

    #[test]
    fn test_describe_quiet_night() {
        let kind = EventKind::NightReveal { eliminated: vec![] };
        assert_eq!(describe(&kind), "Nobody died during the night");
    }

    #[test]
    fn test_describe_game_over_mentions_winner() {
        let text = describe(&EventKind::GameOver {
            winner: Winner::Good,
        });
        assert!(text.contains(&Winner::Good.to_string()));
    }
}
