use std::time::Duration;

use anyhow::anyhow;
use clap::Parser;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;

use warden_alert::{AlertController, AlertTransport, TelegramNotifier};
use warden_app::config::{AppConfig, Cli};
use warden_app::network;
use warden_app::runtime::{build_detector, build_source, SentinelLoop};
use warden_audio::WindowBuilder;
use warden_camera::{FileImageSource, ImageSource};
use warden_foundation::{real_clock, AppState, RecoveryStrategy, StateManager};
use warden_telemetry::PipelineMetrics;

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all("logs")?;
    let file_appender = RollingFileAppender::new(Rotation::DAILY, "logs", "warden.log");
    let (non_blocking_file, _guard) = tracing_appender::non_blocking(file_appender);
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout.and(non_blocking_file))
        .with_env_filter(log_level)
        .init();
    std::mem::forget(_guard);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging()?;
    tracing::info!("Booting Warden acoustic sentinel");

    let state_manager = StateManager::new();

    let mut cfg = AppConfig::load(cli.config.as_deref())?;
    cfg.apply_cli(&cli)?;

    // --- 1. Network reachability (bounded wait; reported, not fatal) ---
    let wait = Duration::from_secs(cfg.poll.network_wait_secs);
    let interval = Duration::from_millis(cfg.poll.network_probe_interval_ms);
    if let Err(e) = network::wait_for_endpoint(&cfg.alert.transport.api_host, 443, wait, interval)
    {
        tracing::warn!("Continuing without connectivity: {}", e);
    }

    let metrics = PipelineMetrics::new();

    // --- 2. Camera ---
    let camera: Box<dyn ImageSource> = Box::new(
        FileImageSource::new(&cfg.camera.image_path, &cfg.camera.sensor)
            .map_err(|e| anyhow!("camera init failed: {e}"))?,
    );
    tracing::info!("Camera ready");

    // --- 3. Alert transport + controller ---
    let notifier: Box<dyn AlertTransport> = Box::new(TelegramNotifier::new(&cfg.alert.transport)?);
    let controller =
        AlertController::new(camera, notifier, &cfg.alert).with_metrics(metrics.clone());

    // --- 4. Sample source + detector ---
    let source = build_source(&cfg)?;
    let detector = build_detector(&cfg, &metrics)?;
    let mut builder = WindowBuilder::new(detector.required_window_len());
    if let Some(bound) = cfg.audio.max_consecutive_invalid {
        builder = builder.with_invalid_bound(bound);
    }
    tracing::info!(
        window_len = detector.required_window_len(),
        sample_rate = detector.required_sample_rate(),
        mode = ?cfg.detector.mode,
        "Detection pipeline ready"
    );

    state_manager.transition(AppState::Running)?;

    // --- Poll loop (runs until the source fails or the process is killed) ---
    let mut sentinel = SentinelLoop::new(
        source,
        builder,
        detector,
        controller,
        metrics,
        Duration::from_millis(cfg.poll.pause_ms),
        real_clock(),
    );

    let Err(err) = sentinel.run() else {
        return Ok(());
    };
    match err.recovery_strategy() {
        RecoveryStrategy::Ignore => {
            tracing::warn!("Sentinel loop ended: {}", err);
            Ok(())
        }
        _ => {
            state_manager.transition(AppState::Faulted {
                reason: err.to_string(),
            })?;
            tracing::error!("Sentinel loop failed: {}", err);
            Err(anyhow!(err).into())
        }
    }
}
