//! stagekit CLI - drive a simulated embedded project through its action queue

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{bail, eyre};
use sk_core::config::loader::load_settings;
use sk_core::project::{Project, ProjectArgs};
use sk_core::projects::ProjectManager;
use sk_core::HandleStatus;
use sk_protocol::ipc::Op;
use sk_protocol::log_models::LogLevel;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

mod demo;
mod logging;
mod render;

use demo::{DemoFactory, DemoProject};
use render::{render_event, render_stage_map, HandleView};

#[derive(Parser)]
#[command(name = "stagekit")]
#[command(about = "Queue lifecycle actions against an embedded project")]
#[command(after_help = "\
EXAMPLES:
  stagekit run ./blink generate build       # Run two actions in order
  stagekit run ./blink build clean --fail build
  stagekit actions                          # List available actions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a project and run actions on it, one at a time
    Run(RunArgs),
    /// List the actions a project accepts
    Actions,
    /// Show the effective settings
    Settings {
        /// Directory containing stagekit.toml
        #[arg(long, default_value = ".")]
        config_dir: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Project directory
    path: PathBuf,

    /// Actions to queue, in order
    actions: Vec<String>,

    /// Directory containing stagekit.toml
    #[arg(long, default_value = ".")]
    config_dir: PathBuf,

    /// Override the configured log level
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    /// Make this action fail (repeatable)
    #[arg(long, value_name = "ACTION")]
    fail: Vec<String>,

    /// Simulated duration of each action
    #[arg(long, value_name = "MS", default_value_t = 100)]
    step_ms: u64,

    /// Print events as JSON lines instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => cmd_run(args).await,
        Commands::Actions => {
            for name in DemoProject::actions().names() {
                println!("{name}");
            }
            Ok(())
        }
        Commands::Settings { config_dir } => {
            let settings = load_settings(&config_dir).await?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}

async fn cmd_run(args: RunArgs) -> color_eyre::Result<()> {
    let mut settings = load_settings(&args.config_dir).await?;
    if let Some(level) = args.log_level {
        settings.log_level = level;
    }
    logging::init_cli_logging(settings.log_level);

    let factory = Arc::new(DemoFactory {
        fail_on: args.fail.into_iter().collect(),
        step_delay: Duration::from_millis(args.step_ms),
    });
    let manager = ProjectManager::new(factory, settings);
    let handle = manager
        .add_project(ProjectArgs::path(args.path.display().to_string()), true)
        .await;

    let weak = Arc::downgrade(&handle);
    let json = args.json;
    handle.subscribe_fn(move |event| {
        if json {
            match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!("cannot serialize event: {e}"),
            }
            return;
        }

        let Some(handle) = weak.upgrade() else {
            return;
        };
        let view = HandleView {
            name: handle.name(),
            current_stage: handle.current_stage(),
        };
        println!("{}", render_event(event, &view));
    });

    handle.apply(Op::SignalReady).await?;

    let mut rejected = None;
    for name in args.actions {
        let op = Op::SubmitAction {
            name: name.clone(),
            args: Vec::new(),
        };
        if let Err(e) = handle.apply(op).await {
            rejected = Some(eyre!("cannot queue '{name}': {e}"));
            break;
        }
    }

    manager
        .remove_project(handle.id())
        .await
        .map_err(|e| eyre!(e))?;

    match handle.wait_initialized().await {
        HandleStatus::Ready => {}
        status => bail!("project {} is in state {status}", handle.name()),
    }

    if let Some(e) = rejected {
        return Err(e);
    }

    let stages = handle.stage_map().await?;
    if !json {
        println!("{} ({})", handle.name(), handle.current_stage());
        println!("{}", render_stage_map(&stages));
    }

    if !handle.last_action_succeeded() {
        bail!("last action failed");
    }
    Ok(())
}
