use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use cpk_forge::config::AnalysisConfig;
use cpk_forge::error::CpkResult;
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod tables;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON analysis settings; flags given on the command line override it.
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List parsed test records with a quick capability verdict.
    Scan(cmd::scan::ScanArgs),
    /// Detailed capability analysis of one record.
    Analyze(cmd::analyze::AnalyzeArgs),
    /// Capability indices for every record.
    Batch(cmd::batch::BatchArgs),
    /// Histogram, curve and control-limit data of one record as JSON.
    Chart(cmd::chart::ChartArgs),
}

fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(
    path: Option<&str>,
    cli_config: &AnalysisConfig,
    sub_matches: Option<&clap::ArgMatches>,
) -> CpkResult<AnalysisConfig> {
    let config = match (path, sub_matches) {
        (Some(path), Some(matches)) => {
            info!("⚙️  Loading settings from: {}", path);
            let mut file_config = AnalysisConfig::load_from_file(path)?;
            file_config.merge_from_cli(cli_config, matches);
            file_config
        }
        (Some(path), None) => AnalysisConfig::load_from_file(path)?,
        (None, _) => cli_config.clone(),
    };
    config.validate()?;
    Ok(config)
}

fn main() {
    // Raw matches tell user-typed flags apart from defaults.
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    init_tracing(cli.debug);

    let cli_config = match &cli.command {
        Commands::Scan(args) => &args.config,
        Commands::Analyze(args) => &args.config,
        Commands::Batch(args) => &args.config,
        Commands::Chart(args) => &args.config,
    };
    let sub_matches = matches.subcommand().map(|(_, m)| m);

    let config = resolve_config(cli.config.as_deref(), cli_config, sub_matches)
        .unwrap_or_else(|e| {
            error!("❌ {}", e);
            process::exit(1);
        });

    let outcome = match &cli.command {
        Commands::Scan(args) => cmd::scan::run(args, &config),
        Commands::Analyze(args) => cmd::analyze::run(args, &config),
        Commands::Batch(args) => cmd::batch::run(args, &config),
        Commands::Chart(args) => cmd::chart::run(args, &config),
    };

    if let Err(e) = outcome {
        error!("❌ {}", e);
        process::exit(1);
    }
}
