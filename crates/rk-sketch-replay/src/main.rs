//! rk-sketch-replay entry point

use std::path::PathBuf;

use rk_sketch_replay::{ConfigManager, ReplayError, Script, replay};

const USAGE: &str = "usage: rk-sketch-replay <script.json> [--config <path>] [--out <path>] [--reset-config]";

struct Args {
    script: PathBuf,
    config: Option<PathBuf>,
    out: Option<PathBuf>,
    reset_config: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut script = None;
    let mut config = None;
    let mut out = None;
    let mut reset_config = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config = Some(args.next().ok_or("--config needs a path")?.into()),
            "--out" => out = Some(args.next().ok_or("--out needs a path")?.into()),
            "--reset-config" => reset_config = true,
            flag if flag.starts_with("--") => return Err(format!("unknown option {}", flag)),
            path => {
                if script.replace(PathBuf::from(path)).is_some() {
                    return Err("more than one script given".to_string());
                }
            }
        }
    }

    Ok(Args {
        script: script.ok_or("missing script path")?,
        config,
        out,
        reset_config,
    })
}

fn run(args: Args) -> Result<(), ReplayError> {
    let mut manager = ConfigManager::open(args.config.unwrap_or_else(ConfigManager::default_path));
    if args.reset_config {
        manager.reset()?;
    }

    let script = Script::from_json(&std::fs::read_to_string(&args.script)?)?;
    let mut result = replay(&script, manager.config())?;
    tracing::info!(
        "Replayed {} steps: {} items added, {} degenerate primitives dropped",
        result.outcomes.len(),
        result.items_added(),
        result.absorbed()
    );

    let document = result.sketch.to_json()?;
    let text = serde_json::to_string_pretty(&document)?;
    match args.out {
        Some(path) => {
            std::fs::write(&path, text)?;
            tracing::info!("Wrote sketch '{}' to {:?}", result.sketch.name, path);
        }
        None => println!("{}", text),
    }

    result.sketch.release(&mut result.scene);
    Ok(())
}

fn main() -> std::process::ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rk_sketch=debug,rk_sketch_replay=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}\n{}", e, USAGE);
            return std::process::ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::ExitCode::FAILURE
        }
    }
}
