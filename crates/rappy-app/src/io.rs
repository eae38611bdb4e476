use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Cancel the run on Ctrl-C
pub fn spawn_ctrl_c(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => match result {
                Ok(()) => {
                    tracing::info!("Ctrl-C received, stopping");
                    cancel.cancel();
                }
                Err(e) => tracing::error!("Failed to listen for Ctrl-C: {}", e),
            },
            _ = cancel.cancelled() => {}
        }
    })
}

/// Poll the global stop hotkey until it fires or the run ends
pub fn spawn_stop_hotkey(combo: String, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let hotkey_manager = match rappy_os::HotkeyManager::new(&combo) {
            Ok(manager) => manager,
            Err(e) => {
                tracing::warn!("Stop hotkey unavailable, use Ctrl-C instead: {:#}", e);
                return;
            }
        };

        tracing::info!("Stop hotkey registered ({})", combo);

        while !cancel.is_cancelled() {
            if hotkey_manager.poll() {
                tracing::info!("Stop hotkey pressed");
                cancel.cancel();
                break;
            }

            std::thread::sleep(Duration::from_millis(50));
        }

        tracing::debug!("Stop hotkey listener stopping");
    })
}
