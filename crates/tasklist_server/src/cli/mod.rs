use clap::Parser;
use tasklist_core::config::{Config, StoreBackend, merge_overrides, parse_config_overrides};
use tasklist_core::error::AppError;

#[derive(Parser, Debug)]
#[command(author, version, about = "Serve the task list HTTP API", long_about = None)]
pub struct Cli {
    /// Address to bind (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Keep tasks in memory only
    ///
    /// Example: tasklist_server --memory
    #[arg(long)]
    pub memory: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,

    /// Override configuration values (format SECTION.FIELD=VALUE)
    ///
    /// Example: tasklist_server --config-override server.store_key=team_tasks
    #[arg(long = "config-override", value_name = "KEY=VALUE")]
    pub config_override: Vec<String>,
}

impl Cli {
    /// Layers config-override flags and then the dedicated flags over `base`.
    pub fn effective_config(&self, base: &Config) -> Result<Config, AppError> {
        let overrides = parse_config_overrides(&self.config_override)?;
        let mut config = merge_overrides(base, &overrides);

        if let Some(host) = self.host.as_deref() {
            config.server.host = host.to_string();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.memory {
            config.server.store = StoreBackend::Memory;
        }

        Ok(config)
    }
}
