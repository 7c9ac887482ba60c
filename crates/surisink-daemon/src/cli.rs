use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "surisink",
    version,
    about = "Upload files extracted by Suricata to S3-compatible storage"
)]
pub struct Cli {
    /// Path to the dotenv-style config file
    #[arg(long, env = "CONFIG_PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Tail eve.json and upload stored files (default)
    Run,
    /// Remove dedupe rows not seen within the retention window, then exit
    Gc {
        /// Retention in days; overrides SURISINK_DEDUPE_RETENTION_DAYS
        #[arg(long)]
        retention_days: Option<u32>,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_is_default() {
        let cli = Cli::try_parse_from(["surisink", "--config", "/etc/surisink.env"]).unwrap();
        assert_eq!(cli.command(), Command::Run);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/surisink.env")));
    }

    #[test]
    fn gc_with_override() {
        let cli = Cli::try_parse_from(["surisink", "gc", "--retention-days", "30", "--config", "c.env"])
            .unwrap();
        assert_eq!(
            cli.command(),
            Command::Gc {
                retention_days: Some(30)
            }
        );
        assert_eq!(cli.config, Some(PathBuf::from("c.env")));
    }

    #[test]
    fn unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["surisink", "serve"]).is_err());
    }
}
