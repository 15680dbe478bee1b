//! desktop-notify - desktop notifications with consistent icons
//!
//! Sends a notification through the best available backend:
//! - dunstify, with interactive actions
//! - the terminal, when no notification daemon is running

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{CommandFactory, Parser};

use desktop_notify::cli::{Cli, Commands, Display, ResolveArgs, SendArgs};
use desktop_notify::{Notifier, Settings};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            Display::show_error(&e.to_string());
            eprintln!("  Hint: {}", e.suggestion());
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_tracing(&settings.log_level, cli.verbose);

    // Execute command
    match execute(cli, settings).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            Display::show_error(&e.to_string());
            std::process::exit(1);
        }
    }
}

/// Loads settings from `path`, or from the default locations.
fn load_settings(path: Option<&Path>) -> Result<Settings, desktop_notify::ConfigError> {
    match path {
        Some(path) => {
            let mut settings = Settings::load_from(&[path.to_path_buf()])?;
            settings.apply_env_overrides(std::env::vars())?;
            Ok(settings)
        }
        None => Settings::load(),
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(level: &str, verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { level };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command. Returns false when the command should exit 1.
async fn execute(cli: Cli, settings: Settings) -> Result<bool> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let command = match cli.command {
        Some(command) => command,
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
            return Ok(true);
        }
    };

    if let Commands::Completions { shell } = command {
        generate_completions(shell);
        return Ok(true);
    }

    let notifier = Arc::new(Notifier::new(settings));

    match command {
        Commands::Send(args) => return send(&notifier, args).await,
        Commands::Check => {
            Display::show_check(
                &notifier.current_backend(),
                &notifier.current_icon_set(),
                notifier.engine().is_all_or_nothing(),
            );
        }
        Commands::Backends => {
            Display::show_backends(&notifier.registry().list_all(), &notifier.current_backend());
        }
        Commands::IconSets { preview } => {
            let engine = notifier.engine();
            let sets: Vec<_> = engine
                .list_sets()
                .into_iter()
                .map(|set| {
                    let icons = match preview {
                        Some(limit) if set.available => {
                            engine.preview(&set.name, limit).unwrap_or_default()
                        }
                        _ => Vec::new(),
                    };
                    (set, icons)
                })
                .collect();
            Display::show_icon_sets(&sets, &engine.active_icon_set());
        }
        Commands::Resolve(args) => resolve(&notifier, &args)?,
        Commands::Completions { .. } => {}
    }

    Ok(true)
}

/// Sends one notification; Ctrl-C ends an interactive wait with no response.
async fn send(notifier: &Arc<Notifier>, args: SendArgs) -> Result<bool> {
    if let Some(backend) = &args.backend {
        if !notifier.switch_backend(backend) {
            bail!("Backend '{}' is not available", backend);
        }
    }

    if let Some(set) = &args.icon_set {
        if let Err(e) = notifier.engine().activate_icon_set(set) {
            eprintln!(
                "Warning: {}; using '{}' ({})",
                e,
                notifier.current_icon_set(),
                e.suggestion()
            );
        }
    }

    let request = args.to_request();
    let interactive = request.has_actions();
    let outcome = tokio::select! {
        outcome = notifier.send_async(request) => outcome,
        _ = tokio::signal::ctrl_c(), if interactive => {
            tracing::debug!("Interrupted; cancelling the wait");
            desktop_notify::SendOutcome::no_response()
        }
    };

    let backend = notifier
        .last_report()
        .map(|report| report.backend)
        .unwrap_or_else(|| notifier.current_backend());

    if args.json {
        if let Some(report) = notifier.last_report() {
            println!("{}", report.to_json()?);
        }
    } else {
        Display::show_outcome(&outcome, &backend);
    }

    Ok(!outcome.is_failed())
}

/// Resolves an icon name and prints where it came from.
fn resolve(notifier: &Notifier, args: &ResolveArgs) -> Result<()> {
    let engine = notifier.engine();
    let allow_fallback = !args.no_fallback;
    let icon = match &args.icon_set {
        Some(set) => engine.resolve_with(set, &args.name, allow_fallback)?,
        None => engine.resolve(&args.name, allow_fallback),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&icon)?);
    } else {
        Display::show_resolution(&icon);
    }
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["desktop-notify"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::parse_from(["desktop-notify", "check"]);
        assert!(matches!(cli.command, Some(Commands::Check)));
    }

    #[test]
    fn test_cli_parse_verbose() {
        let cli = Cli::parse_from(["desktop-notify", "--verbose", "backends"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_load_settings_from_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timeout_ms = 1234").unwrap();

        let settings = load_settings(Some(file.path())).unwrap();
        assert_eq!(settings.timeout_ms, 1234);
    }

    #[test]
    fn test_load_settings_rejects_bad_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timeout_ms = \"soon\"").unwrap();

        assert!(load_settings(Some(file.path())).is_err());
    }
}
