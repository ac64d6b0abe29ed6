use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;

use chrono::Local;
use clap::{ArgAction, Parser};

use screensnap::Config;
use screensnap::capture::{
    self, CaptureDependencies, CaptureManager, CaptureOutcome, FormatRegistry, Trigger, file,
    request,
};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("SCREENSNAP_GIT_HASH"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "screensnap")]
#[command(version = VERSION, about = "Capture the primary screen to an image file")]
struct Cli {
    /// Name of the generated image file without its suffix
    #[arg(value_name = "FILE_NAME_BASE", allow_negative_numbers = true)]
    file_name_base: Option<String>,

    /// Image format ('png', 'gif', 'jpg', etc.); unsupported formats fall back to the default
    #[arg(
        value_name = "FILE_FORMAT",
        allow_negative_numbers = true,
        conflicts_with = "interactive"
    )]
    file_format: Option<String>,

    /// Delay before capturing, 0-60000 ms
    #[arg(
        value_name = "DELAY_MS",
        allow_negative_numbers = true,
        conflicts_with = "interactive"
    )]
    delay_ms: Option<String>,

    /// Print the supported image formats and exit
    #[arg(long, action = ArgAction::SetTrue)]
    list_formats: bool,

    /// Append a capture timestamp to the file name
    #[arg(long, short = 't', action = ArgAction::SetTrue)]
    timestamp: bool,

    /// Capture once per line read from stdin (q or EOF to quit); only FILE_NAME_BASE applies
    #[arg(long, short = 'i', action = ArgAction::SetTrue)]
    interactive: bool,

    /// Exit with a failure status when the capture fails
    #[arg(long, action = ArgAction::SetTrue)]
    strict: bool,

    /// Read configuration from this file instead of ~/.config/screensnap/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Cli {
    fn positional(&self) -> Vec<&str> {
        [&self.file_name_base, &self.file_format, &self.delay_ms]
            .into_iter()
            .map_while(|arg| arg.as_deref())
            .collect()
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());
    let registry = FormatRegistry::detect();

    if cli.list_formats {
        for name in registry.formats() {
            println!("{}", name);
        }
        return Ok(ExitCode::SUCCESS);
    }

    if registry.is_empty() {
        log::error!("No writable image formats are available");
        return Ok(failure_code(cli.strict));
    }

    if cli.interactive {
        return run_interactive(&cli, &config, &registry);
    }

    let defaults = config.capture_defaults();
    let positional = cli.positional();
    let resolved = capture::resolve_request(positional.as_slice(), &registry, &defaults);

    for notice in &resolved.notices {
        match notice {
            request::Notice::UsageDefaults => {
                println!("{}", request::usage_message("screensnap", &registry, &defaults));
            }
            notice if notice.is_diagnostic() => log::warn!("{}", notice),
            notice => log::info!("{}", notice),
        }
    }

    let mut job = resolved.request;
    if cli.timestamp {
        job.file_name_base = file::timestamped_base(
            &job.file_name_base,
            &job.format,
            &config.capture.timestamp_format,
            Local::now(),
        );
    }
    log::debug!("Resolved capture request: {:?}", job);

    match capture::capture_request(&job, &registry, &CaptureDependencies::default()) {
        Ok(result) => {
            log::info!("A full screenshot saved to {}", result.saved_path.display());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            log::error!("{}", e);
            Ok(failure_code(cli.strict))
        }
    }
}

fn load_config(path: Option<&Path>) -> Config {
    let loaded = match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    loaded.unwrap_or_else(|e| {
        log::warn!("{:#}; using default configuration", e);
        Config::default()
    })
}

fn failure_code(strict: bool) -> ExitCode {
    if strict {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run_interactive(
    cli: &Cli,
    config: &Config,
    registry: &FormatRegistry,
) -> anyhow::Result<ExitCode> {
    let base = cli
        .file_name_base
        .clone()
        .unwrap_or_else(|| config.capture.default_file_name_base.clone());
    let manager = CaptureManager::new(base, registry)
        .with_format(&config.capture.interactive_format)
        .with_timestamp_format(config.capture.timestamp_format.clone());

    println!(
        "Start screen capture ({}): press Enter, or q to quit",
        manager.format()
    );
    io::stdout().flush()?;

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let trigger = match line {
                Ok(line) if line.trim().eq_ignore_ascii_case("q") => Trigger::Stop,
                Ok(_) => Trigger::Capture,
                Err(e) => {
                    log::warn!("Failed to read stdin: {}", e);
                    Trigger::Stop
                }
            };
            if tx.send(trigger).is_err() || trigger == Trigger::Stop {
                break;
            }
        }
    });

    let mut failed = false;
    manager.run(rx, |outcome| {
        match outcome {
            CaptureOutcome::Success(result) => {
                println!("A full screenshot saved to {}", result.saved_path.display());
            }
            CaptureOutcome::Failed(_) => failed = true,
        }
        println!("Next screen capture: press Enter, or q to quit");
    });

    if failed {
        Ok(failure_code(cli.strict))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
