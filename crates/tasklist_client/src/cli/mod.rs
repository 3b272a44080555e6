use clap::{Parser, Subcommand};
use tasklist_core::config::{Config, merge_overrides, parse_config_overrides};
use tasklist_core::error::AppError;

#[derive(Parser, Debug)]
#[command(author, version, about = "Manage the task list", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Answer yes to every confirmation
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Override configuration values (format SECTION.FIELD=VALUE)
    ///
    /// Example: tasklist --config-override client.mode=local list
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: tasklist add "Buy milk"
    Add { text: String },
    /// Mark a task as completed, or undo it
    ///
    /// Example: tasklist done 1
    Done { id: u64 },
    /// Start editing a task, or save it straight away when text is given
    ///
    /// Example: tasklist edit 1
    /// Example: tasklist edit 1 "Buy oat milk"
    Edit { id: u64, text: Option<String> },
    /// Save the task being edited
    ///
    /// Example: tasklist save 1 "Buy oat milk"
    Save { id: u64, text: String },
    /// Leave editing without saving
    ///
    /// Example: tasklist cancel 1
    Cancel { id: u64 },
    /// Delete a task
    ///
    /// Example: tasklist delete 1
    Delete { id: u64 },
    /// Remove every completed task
    ///
    /// Example: tasklist clear-completed
    ClearCompleted,
    /// Remove every task
    ///
    /// Example: tasklist clear-all --yes
    ClearAll,
    /// Show the task list
    ///
    /// Example: tasklist list
    List,
    /// Reload the task list from the store
    ///
    /// Example: tasklist reload
    Reload,
}

impl Cli {
    pub fn effective_config(&self, base: &Config) -> Result<Config, AppError> {
        let overrides = parse_config_overrides(&self.config_override)?;
        Ok(merge_overrides(base, &overrides))
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;
    use tasklist_core::config::{ClientMode, Config};

    #[test]
    fn parses_edit_with_and_without_text() {
        let cli = Cli::try_parse_from(["tasklist", "edit", "3"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Edit { id: 3, text: None })));

        let cli = Cli::try_parse_from(["tasklist", "edit", "3", "New text"]).unwrap();
        match cli.command {
            Some(Command::Edit { id, text }) => {
                assert_eq!(id, 3);
                assert_eq!(text.as_deref(), Some("New text"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["tasklist", "done", "abc"]).is_err());
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "tasklist",
            "clear-all",
            "--yes",
            "--config-override",
            "client.mode=local",
        ])
        .unwrap();

        assert!(cli.yes);
        assert!(matches!(cli.command, Some(Command::ClearAll)));
        let config = cli.effective_config(&Config::default()).unwrap();
        assert_eq!(config.client.mode, ClientMode::Local);
    }
}
