//! Deploy Console - Entry Point
//!
//! Watches the deployment status of one repository on the deploy panel and
//! sends cancel, rollback and auto-deploy commands to it.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use deploy_console::actions::dispatch::Outcome;
use deploy_console::actions::prompt::TerminalPrompter;
use deploy_console::actions::Intent;
use deploy_console::app::options::AppOptions;
use deploy_console::app::run::{run, run_action, TagSelection};
use deploy_console::filesys::file::File;
use deploy_console::logs::{init_logging, LogLevel, LogOptions};
use deploy_console::storage::layout::StorageLayout;
use deploy_console::storage::settings::Settings;
use deploy_console::utils::version_info;
use deploy_console::view::terminal::TerminalView;
use deploy_console::workers::poller;

use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    // Print version and exit
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(version) => println!("{}", version),
            Err(e) => eprintln!("Failed to encode version info: {e}"),
        }
        return ExitCode::SUCCESS;
    }

    // Retrieve the settings file
    let settings_file = match cli_args.get("config") {
        Some(path) => File::new(PathBuf::from(path)),
        None => StorageLayout::default().settings_file(),
    };
    let mut settings = match settings_file.read_json_or_default::<Settings>().await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!(
                "Unable to read settings file {}: {}",
                settings_file.path().display(),
                e
            );
            return ExitCode::FAILURE;
        }
    };

    if let Some(repo) = cli_args.get("repo") {
        settings.repo = repo.clone();
    }
    if let Some(level) = cli_args.get("log-level") {
        match level.parse::<LogLevel>() {
            Ok(level) => settings.log_level = level,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        }
    }

    // Write the effective settings and exit
    if cli_args.contains_key("init") {
        return match settings_file.write_json(&settings).await {
            Ok(()) => {
                println!("Settings written to {}", settings_file.path().display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Unable to write settings file: {e}");
                ExitCode::FAILURE
            }
        };
    }

    // Initialize logging
    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        log_dir: settings.log_dir.clone(),
        json_format: settings.log_json,
        ..Default::default()
    };
    if let Err(e) = init_logging(log_options) {
        eprintln!("Failed to initialize logging: {e}");
    }

    if settings.repo.is_empty() {
        error!("No repository configured, pass --repo=<name>");
        return ExitCode::FAILURE;
    }

    let options = AppOptions {
        backend_base_url: settings.backend.base_url.clone(),
        request_timeout: settings.backend.request_timeout(),
        poller: poller::Options {
            repo: settings.repo.clone(),
            release_tags: settings.release_tags.clone(),
            ..Default::default()
        },
        ..Default::default()
    };

    // One-shot action
    if let Some(intent) = parse_intent(&cli_args) {
        let selection = cli_args.get("tag").map(|name| TagSelection {
            name: name.clone(),
            commit_id: cli_args.get("commit").cloned(),
        });

        info!("Running {:?} on {}", intent, options.repo());
        return match run_action(options, intent, selection, &TerminalPrompter).await {
            Ok(Outcome::Sent) | Ok(Outcome::Declined) => ExitCode::SUCCESS,
            Ok(outcome) => {
                info!("Action ended with {:?}", outcome);
                ExitCode::FAILURE
            }
            Err(e) => {
                error!("Failed to run action: {e}");
                ExitCode::FAILURE
            }
        };
    }

    // Watch mode
    info!("Running deploy console with options: {:?}", options);
    match run(options, TerminalView::new, await_shutdown_signal()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed to run the console: {e}");
            ExitCode::FAILURE
        }
    }
}

fn parse_intent(cli_args: &HashMap<String, String>) -> Option<Intent> {
    if cli_args.contains_key("cancel") {
        Some(Intent::CancelAndRollbackNow)
    } else if cli_args.contains_key("enable-auto") {
        Some(Intent::EnableAutoDeploy)
    } else if cli_args.contains_key("disable-auto") {
        Some(Intent::DisableAutoDeploy)
    } else if cli_args.contains_key("rollback") {
        Some(Intent::RollbackToSelectedTag)
    } else {
        None
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) = match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
            _ => {
                error!("Failed to install signal handlers, falling back to Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
        }
        info!("Ctrl+C received, shutting down...");
    }
}
