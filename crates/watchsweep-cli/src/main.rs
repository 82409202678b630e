use clap::{ArgAction, Parser};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "watchsweep")]
#[command(
    about = "Lists watched movies from Plex, then optionally deletes them from Radarr (including files) and adds them to the import exclusion list"
)]
#[command(version)]
struct Cli {
    /// Number of days ago a movie must have been watched to be eligible
    /// (default: 3, or the configured value)
    #[arg(long, value_name = "N")]
    days: Option<u32>,

    /// Enable processing (delete from Radarr + add to exclusion list) after
    /// listing. Without this flag the run is list-only.
    #[arg(long, action = ArgAction::SetTrue)]
    process: bool,

    /// Skip the confirmation prompt (only effective with --process)
    #[arg(long, action = ArgAction::SetTrue)]
    yes: bool,

    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    commands::prune::run_prune(cli.days, cli.process, cli.yes, &output).await
}
