use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use rappy_config::Config;
use rappy_core::correlation::Template;
use rappy_core::ports::{DigitRecognizer, KeyInjector};
use rappy_core::state::StateMachine;
use rappy_core::CaptureError;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::context::MonitorContext;
use crate::controller::Controller;

mod context;
mod controller;
mod io;
mod profile;

#[cfg(test)]
mod tests;

#[derive(Parser, Debug)]
#[command(name = "rappy-watch", version, about = "Watches the Rappy Slots window and reacts to state changes")]
struct Args {
    /// JSON config file. Defaults to ./config.json when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log key presses instead of sending them
    #[arg(long)]
    dry_run: bool,

    /// Never post to the webhook
    #[arg(long)]
    no_notify: bool,

    /// Emit JSON log lines
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(atty::is(atty::Stream::Stdout));

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn recognizer() -> Box<dyn DigitRecognizer> {
    #[cfg(feature = "ocr")]
    {
        Box::new(rappy_os::TesseractRecognizer::new(None))
    }
    #[cfg(not(feature = "ocr"))]
    {
        tracing::warn!("Built without OCR, coin footers will be empty");
        Box::new(rappy_os::NullRecognizer)
    }
}

fn build_context(config: &Config, args: &Args) -> anyhow::Result<MonitorContext> {
    let source = rappy_os::WindowFrameSource::new(
        config.window.title.clone(),
        config.window.capture_timeout(),
    );

    let keys: Box<dyn KeyInjector> = if args.dry_run {
        tracing::info!("Dry run, key presses are only logged");
        Box::new(rappy_os::LoggingKeyInjector::default())
    } else {
        Box::new(rappy_os::EnigoKeyInjector::new()?)
    };

    let mut ctx = MonitorContext::new(Box::new(source), keys, recognizer());

    if args.no_notify || !config.notifier.is_active() {
        tracing::info!("Webhook notifications disabled");
    } else {
        let notifier = rappy_notify::WebhookNotifier::new(
            config.notifier.webhook_url.clone(),
            Duration::from_millis(config.notifier.timeout_ms),
        )
        .context("Failed to build webhook client")?;
        ctx = ctx.with_notifier(Box::new(notifier));
    }

    if config.artifacts.enabled {
        tracing::info!("Saving snapshots under {}", config.artifacts.root.display());
        ctx = ctx.with_artifacts(Box::new(rappy_io::DirArtifactSink::new(
            config.artifacts.root.clone(),
        )));
    }

    Ok(ctx)
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = profile::load_config(args.config.as_deref())?;

    let template = Template::load(&config.homing.template_path).with_context(|| {
        format!(
            "Failed to load wild indicator template {}",
            config.homing.template_path.display()
        )
    })?;

    let ctx = build_context(&config, &args)?;

    let cancel = CancellationToken::new();
    let ctrl_c = io::spawn_ctrl_c(cancel.clone());
    let hotkey = io::spawn_stop_hotkey(config.controls.stop_hotkey.clone(), cancel.clone());

    let controller = Controller::new(config, template, StateMachine::new(), ctx, cancel.clone());
    let result = controller.run().await;

    cancel.cancel();
    let _ = ctrl_c.await;
    let _ = hotkey.await;

    match result {
        Ok(_) => Ok(()),
        Err(e @ CaptureError::WindowNotFound(_)) => {
            if let Ok(windows) = rappy_os::list_windows() {
                let titles: Vec<_> = windows.into_iter().map(|(_, title)| title).collect();
                tracing::debug!("Visible windows: {:?}", titles);
            }
            Err(e).context("Game window lost")
        }
        Err(e) => Err(e).context("Capture failed"),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    init_tracing(args.log_json);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Stopping: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
