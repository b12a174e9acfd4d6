//! Prayer Reminder CLI
//!
//! Shows the five daily prayer times, counts down to the next one and, in
//! `run` mode, sends a reminder before each prayer and plays the adhan when
//! it arrives.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing::{info, warn};

use prayer_reminder::cli::display::{local_offset, now_in};
use prayer_reminder::cli::{
    Cli, Commands, Display, NextReport, RunArgs, TerminalStatus, TimesArgs, TimesReport,
};
use prayer_reminder::config::PrayerConfig;
use prayer_reminder::daemon::{ReminderTracker, TrackerHandle};
use prayer_reminder::notification::{DesktopNotifier, Notifier};
use prayer_reminder::sound::CommandAudioPlayer;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    match cli.command.clone() {
        Some(Commands::Run(args)) => run(&cli, args).await?,
        Some(Commands::Times(args)) => show_times(&cli, &args)?,
        Some(Commands::Next { json }) => show_next(&cli, json)?,
        None => show_next(&cli, false)?,
        Some(Commands::Cities) => Display::show_cities(),
        Some(Commands::Methods) => Display::show_methods(),
        Some(Commands::Completions { shell }) => generate_completions(shell),
    }

    Ok(())
}

fn show_times(cli: &Cli, args: &TimesArgs) -> Result<()> {
    let config = cli.load_config()?;
    let provider = config.provider()?;
    let offset = local_offset();
    let now = now_in(&offset);
    let date = args.date.unwrap_or_else(|| now.date_naive());

    let report = TimesReport::build(
        &provider,
        date,
        &offset,
        config.location_label(),
        config.time_format,
    )
    .context("礼拝時刻の計算に失敗しました")?;

    if args.json {
        Display::show_json(&report)?;
    } else {
        let next = if date == now.date_naive() {
            provider.next_prayer(&now).ok().map(|prayer| prayer.name)
        } else {
            None
        };
        Display::show_times(&report, next);
    }
    Ok(())
}

fn show_next(cli: &Cli, json: bool) -> Result<()> {
    let config = cli.load_config()?;
    let provider = config.provider()?;
    let now = now_in(&local_offset());

    let report = NextReport::build(&provider, &now, config.time_format)
        .context("次の礼拝の計算に失敗しました")?;

    if json {
        Display::show_json(&report)?;
    } else {
        Display::show_next(&report);
    }
    Ok(())
}

/// Runs the reminder loop until Ctrl-C.
async fn run(cli: &Cli, args: RunArgs) -> Result<()> {
    let mut config = cli.load_config()?;
    args.apply(&mut config);
    config.validate()?;

    let provider = config.provider()?;
    let notifier: Arc<dyn Notifier> = Arc::new(DesktopNotifier::new());
    let audio = Arc::new(
        CommandAudioPlayer::new(Arc::clone(&notifier)).with_timeout(config.playback_timeout()),
    );

    let adhan_path = config.adhan_path();
    if config.enable_adhan && !adhan_path.exists() {
        warn!("アザーン音声ファイルが見つかりません: {}", adhan_path.display());
    }

    println!(
        "🕌 {} ({}) - {}分前にリマインダー",
        config.location_label(),
        provider.method().as_str(),
        config.reminder_minutes
    );

    let tracker = ReminderTracker::new(provider, config.tracker_settings(), notifier, audio)
        .with_display(Arc::new(TerminalStatus));
    let handle = tracker.spawn();
    info!("リマインダーを開始しました");

    let mut hangup = hangup::listener()?;
    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.context("シグナルの待機に失敗しました")?;
                break;
            }
            _ = hangup::next(&mut hangup) => {
                reload(cli, &args, &handle).await;
            }
        }
    }

    handle.dispose().await;
    println!();
    Ok(())
}

/// Re-reads the configuration and applies the reminder settings.
async fn reload(cli: &Cli, args: &RunArgs, handle: &TrackerHandle) {
    let loaded = PrayerConfig::load(cli.config.as_deref()).and_then(|mut config| {
        cli.location.apply(&mut config);
        args.apply(&mut config);
        config.validate().map(|()| config)
    });

    match loaded {
        Ok(config) => {
            handle
                .update_config(config.reminder_minutes, config.enable_adhan)
                .await;
            info!("設定を再読み込みしました");
        }
        Err(e) => warn!("設定の再読み込みに失敗しました: {} ({})", e, e.suggestion()),
    }
}

#[cfg(unix)]
mod hangup {
    use tokio::signal::unix::{signal, Signal, SignalKind};

    pub fn listener() -> std::io::Result<Signal> {
        signal(SignalKind::hangup())
    }

    pub async fn next(signal: &mut Signal) {
        if signal.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
mod hangup {
    pub fn listener() -> std::io::Result<()> {
        Ok(())
    }

    pub async fn next(_: &mut ()) {
        std::future::pending::<()>().await;
    }
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

    #[test]
    fn test_cli_parse_no_args_defaults_to_next() {
        let cli = Cli::parse_from(["prayer"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["prayer", "run", "--reminder", "5"]);
        match cli.command {
            Some(Commands::Run(args)) => assert_eq!(args.reminder, Some(5)),
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
