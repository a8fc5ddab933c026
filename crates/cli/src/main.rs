use std::path::PathBuf;

use anyhow::Context;
use bookshelf_kernel::settings::Settings;
use clap::{Parser, Subcommand};

/// Book catalogue service
#[derive(Debug, Parser)]
#[command(name = "bookshelf-cli", version, about)]
struct Cli {
    /// Port to listen on (overrides server.port)
    #[arg(long, global = true)]
    port: Option<u16>,

    /// SQLite file to use (overrides database.path)
    #[arg(long, global = true, value_name = "PATH")]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply the schema, then serve HTTP until interrupted (default)
    Serve,
    /// Apply the schema and exit
    Migrate,
    /// Print the effective settings as JSON
    Config,
}

impl Cli {
    fn apply(&self, settings: &mut Settings) {
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(path) = &self.database {
            settings.database.path = path.clone();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;
    cli.apply(&mut settings);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            bookshelf_telemetry::init(&settings.telemetry);
            bookshelf_app::run(settings).await
        }
        Command::Migrate => {
            bookshelf_telemetry::init(&settings.telemetry);
            bookshelf_app::migrate(&settings).await?;
            tracing::info!(database = %settings.database.path.display(), "schema is up to date");
            Ok(())
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn overrides_replace_loaded_settings() {
        let cli = Cli::parse_from([
            "bookshelf-cli",
            "--port",
            "9090",
            "--database",
            "/tmp/x.db",
            "migrate",
        ]);
        let mut settings = Settings::default();
        cli.apply(&mut settings);

        assert!(matches!(cli.command, Some(Command::Migrate)));
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.database.path, PathBuf::from("/tmp/x.db"));
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::parse_from(["bookshelf-cli"]);
        assert!(cli.command.is_none());
    }
}
