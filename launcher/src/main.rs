mod engine;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use glload::prelude::*;
use glload::runtime::storage;

use engine::DemoEngine;

#[derive(Parser)]
#[command(name = "glload")]
#[command(about = "GPU load benchmark host", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding engine assets
    #[arg(long, global = true)]
    assets: Option<PathBuf>,

    /// Directory for the results log and saved benchmark lists
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a benchmark session (the default)
    Run(RunArgs),
    /// Print the scene catalogue as JSON
    Scenes,
    /// Show the results log
    Results {
        /// Only the last N records
        #[arg(long)]
        tail: Option<usize>,
    },
    /// Manage saved benchmark lists
    Lists {
        #[command(subcommand)]
        command: ListCommand,
    },
}

#[derive(Args, Default)]
struct RunArgs {
    /// Launch arguments handed to the engine, e.g.
    /// `-- -b clear:duration=3 --visual-config d=24`
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Subcommand)]
enum ListCommand {
    /// List saved lists, or the benchmarks of one list
    Show { name: Option<String> },
    /// Save benchmarks under a list name
    Save {
        name: String,
        #[arg(required = true)]
        benchmarks: Vec<String>,
    },
    /// Run every benchmark of a saved list
    Load {
        name: String,
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Delete a saved list
    Delete { name: String },
}

fn main() {
    init_logger();
    let cli = Cli::parse();

    if let Err(err) = dispatch(cli) {
        eprintln!("glload failed: {}", err);
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let settings = resolve_settings(&cli)?;
    let assets = AssetSource::new(&settings.assets_dir);
    let lists = BenchmarkLists::new(&settings.data_dir);

    match cli.command.unwrap_or(Command::Run(RunArgs::default())) {
        Command::Run(run) => run_session(settings, &run.args),
        Command::Scenes => {
            let scenes = DemoEngine::new()
                .scene_info(&assets, &settings.results_log_path());
            println!("{}", serde_json::to_string_pretty(&scenes)?);
            Ok(())
        }
        Command::Results { tail } => {
            let path = settings.results_log_path();
            let records = storage::read_results_log(&path)?;
            let skip = tail.map_or(0, |n| records.len().saturating_sub(n));
            for record in &records[skip..] {
                println!("{}", record);
            }
            Ok(())
        }
        Command::Lists { command } => match command {
            ListCommand::Show { name: None } => {
                for name in lists.saved_lists()? {
                    println!("{}", name);
                }
                Ok(())
            }
            ListCommand::Show { name: Some(name) } => {
                for benchmark in lists.load(&name)? {
                    println!("{}", benchmark);
                }
                Ok(())
            }
            ListCommand::Save { name, benchmarks } => {
                let path = lists.save(&name, &benchmarks)?;
                info!("Saved list '{}' to {}", name, path.display());
                Ok(())
            }
            ListCommand::Load { name, args } => {
                let mut tokens = Vec::new();
                for benchmark in lists.load(&name)? {
                    tokens.push("-b".to_string());
                    tokens.push(benchmark);
                }
                tokens.extend(args);
                run_session(settings, &tokens)
            }
            ListCommand::Delete { name } => {
                lists.delete(&name)?;
                info!("Deleted list '{}'", name);
                Ok(())
            }
        },
    }
}

// Persisted settings, then command line overrides.
fn resolve_settings(cli: &Cli) -> Result<HostSettings> {
    let mut settings = match storage::config_dir() {
        Some(dir) => {
            storage::load_settings_if_exists(&dir)?.unwrap_or_default()
        }
        None => HostSettings::default(),
    };

    if let Some(assets) = &cli.assets {
        settings.assets_dir = assets.display().to_string();
    }
    if let Some(data_dir) = &cli.data_dir {
        settings.data_dir = data_dir.display().to_string();
    }

    Ok(settings)
}

fn run_session(settings: HostSettings, tokens: &[String]) -> Result<()> {
    let args = LaunchArgs::from_tokens(tokens);
    info!(
        "Results will be appended to {}",
        settings.results_log_path().display()
    );
    glload::run(DemoEngine::new(), args, settings)
}
