//! Command-line interface definition.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};

/// Accepted layouts for `--date` and `--now`.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// slotbook - Hourly appointment booking
#[derive(Debug, Parser)]
#[command(name = "slotbook")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "SLOTBOOK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the data snapshot
    #[arg(long, env = "SLOTBOOK_DATA", default_value = "slotbook.json")]
    pub data: PathBuf,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Pretend the current time is this (YYYY-MM-DDTHH:MM)
    #[arg(long, value_parser = parse_date_time)]
    pub now: Option<NaiveDateTime>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Book an appointment with a provider
    Book {
        /// Provider to book with
        #[arg(long, short)]
        provider: String,

        /// Client making the booking
        #[arg(long, short = 'u')]
        client: String,

        /// Requested time; minutes are dropped (YYYY-MM-DDTHH:MM)
        #[arg(long, short, value_parser = parse_date_time)]
        date: NaiveDateTime,
    },

    /// Show hourly availability for one day
    Day {
        /// Provider to inspect
        #[arg(long, short)]
        provider: String,

        /// Day to show (YYYY-MM-DD)
        date: NaiveDate,
    },

    /// Show daily availability for one month
    Month {
        /// Provider to inspect
        #[arg(long, short)]
        provider: String,

        /// Year
        year: i32,

        /// Month (1-12)
        month: u32,
    },

    /// List a provider's appointments on one day
    Appointments {
        /// Provider to inspect
        #[arg(long, short)]
        provider: String,

        /// Day to list (YYYY-MM-DD)
        date: NaiveDate,
    },

    /// Notification commands
    Notifications {
        #[command(subcommand)]
        action: NotificationAction,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Notification actions.
#[derive(Debug, Subcommand)]
pub enum NotificationAction {
    /// List notifications for a user, newest first
    List {
        /// Recipient to list
        recipient: String,

        /// Only show unread notifications
        #[arg(long)]
        unread: bool,
    },

    /// Mark a notification as read
    Read {
        /// Notification id
        id: uuid::Uuid,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,
}

impl Command {
    /// Returns whether the command changes the snapshot.
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Self::Book { .. }
                | Self::Notifications {
                    action: NotificationAction::Read { .. }
                }
        )
    }
}

/// Parses a local date-time in any of [`DATE_TIME_FORMATS`].
pub fn parse_date_time(s: &str) -> Result<NaiveDateTime, String> {
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| format!("expected YYYY-MM-DDTHH:MM, got '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("slotbook").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn parses_book_command() {
        let cli = parse(&["book", "-p", "pa", "-u", "cb", "-d", "2024-03-10T09:25"]);
        match cli.command {
            Command::Book {
                provider,
                client,
                date,
            } => {
                assert_eq!(provider, "pa");
                assert_eq!(client, "cb");
                assert_eq!(date.to_string(), "2024-03-10 09:25:00");
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(!cli.json);
    }

    #[test]
    fn parses_month_with_global_json() {
        let cli = parse(&["month", "-p", "pa", "2024", "3", "--json"]);
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Command::Month { year: 2024, month: 3, .. }
        ));
    }

    #[test]
    fn parses_day_and_now_override() {
        let cli = parse(&["--now", "2024-03-10 12:00", "day", "-p", "pa", "2024-03-10"]);
        assert_eq!(
            cli.now.map(|n| n.to_string()),
            Some("2024-03-10 12:00:00".to_string())
        );
        assert!(matches!(cli.command, Command::Day { .. }));
    }

    #[test]
    fn rejects_malformed_date() {
        let result = Cli::try_parse_from(["slotbook", "book", "-p", "a", "-u", "b", "-d", "tomorrow"]);
        assert!(result.is_err());
    }

    #[test]
    fn only_writes_mutate() {
        assert!(parse(&["book", "-p", "a", "-u", "b", "-d", "2024-03-10T09:00"]).command.mutates());
        assert!(!parse(&["appointments", "-p", "a", "2024-03-10"]).command.mutates());
        assert!(!parse(&["notifications", "list", "a"]).command.mutates());
        assert!(
            parse(&["notifications", "read", "67e55044-10b1-426f-9247-bb680e5fe0c8"])
                .command
                .mutates()
        );
    }

    #[test]
    fn date_time_formats() {
        for s in ["2024-03-10T09:00", "2024-03-10T09:00:00", "2024-03-10 09:00"] {
            assert!(parse_date_time(s).is_ok(), "{s}");
        }
        assert!(parse_date_time("10/03/2024").is_err());
    }
}
