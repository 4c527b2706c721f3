use crate::commands::{
    run_ask, run_card, run_export, run_letter, run_residents, run_settings, run_stats, run_sync,
    AskArgs, CardArgs, ExportArgs, LetterArgs, ResidentsArgs, SettingsCommand, StatsArgs,
    SyncArgs,
};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use warga_rt::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Warga RT",
    about = "Run the neighborhood resident registry service or query it from the command line",
    version
)]
struct Cli {
    /// Demo account used by the offline commands (admin or staff)
    #[arg(long, global = true, default_value = "admin")]
    user: String,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// List residents, optionally narrowed by name, NIK, or address
    Residents(ResidentsArgs),
    /// Print population and cash ledger statistics
    Stats(StatsArgs),
    /// Render a cover letter for one resident
    Letter(LetterArgs),
    /// Render a resident membership card
    Card(CardArgs),
    /// Write the resident or ledger spreadsheet to disk
    Export(ExportArgs),
    /// Push the resident list to the configured spreadsheet web-app
    Sync(SyncArgs),
    /// Ask the assistant a question about the registry
    Ask(AskArgs),
    /// Walk through registration, ledger, and letter workflows
    Demo(DemoArgs),
    /// Inspect or change persisted settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Start with the demo residents and ledger entries
    #[arg(long)]
    pub(crate) seed: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let user = cli.user;
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Residents(args) => run_residents(&user, args),
        Command::Stats(args) => run_stats(&user, args),
        Command::Letter(args) => run_letter(&user, args),
        Command::Card(args) => run_card(&user, args),
        Command::Export(args) => run_export(&user, args),
        Command::Sync(args) => run_sync(&user, args).await,
        Command::Ask(args) => run_ask(&user, args).await,
        Command::Demo(args) => run_demo(args),
        Command::Settings { command } => run_settings(&user, command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["warga-rt-api"]).expect("parses");
        assert!(cli.command.is_none());
        assert_eq!(cli.user, "admin");
    }

    #[test]
    fn parses_export_and_letter_arguments() {
        let cli = Cli::try_parse_from([
            "warga-rt-api",
            "--user",
            "staff",
            "export",
            "--kind",
            "transactions",
            "--format",
            "csv",
        ])
        .expect("parses");
        assert_eq!(cli.user, "staff");
        assert!(matches!(cli.command, Some(Command::Export(_))));

        let cli = Cli::try_parse_from([
            "warga-rt-api",
            "letter",
            "--id",
            "1",
            "--label",
            "Pengantar SKCK",
            "--date",
            "2026-10-18",
        ])
        .expect("parses");
        assert!(matches!(cli.command, Some(Command::Letter(_))));

        assert!(Cli::try_parse_from(["warga-rt-api", "letter", "--date", "18-10-2026"]).is_err());
    }
}
