use anyhow::{Context, Result};
use enigo::{Direction, Enigo, Keyboard, Settings};
use rappy_core::ports::KeyInjector;

/// Map a config key name to an enigo key. Single characters become unicode keys.
pub fn parse_key(key: &str) -> Option<enigo::Key> {
    let key = match key.to_lowercase().as_str() {
        "enter" | "return" => enigo::Key::Return,
        "tab" => enigo::Key::Tab,
        "escape" | "esc" => enigo::Key::Escape,
        "backspace" => enigo::Key::Backspace,
        "space" => enigo::Key::Space,
        "up" => enigo::Key::UpArrow,
        "down" => enigo::Key::DownArrow,
        "left" => enigo::Key::LeftArrow,
        "right" => enigo::Key::RightArrow,
        "f1" => enigo::Key::F1,
        "f2" => enigo::Key::F2,
        "f3" => enigo::Key::F3,
        "f4" => enigo::Key::F4,
        "f5" => enigo::Key::F5,
        "f6" => enigo::Key::F6,
        "f7" => enigo::Key::F7,
        "f8" => enigo::Key::F8,
        "f9" => enigo::Key::F9,
        "f10" => enigo::Key::F10,
        "f11" => enigo::Key::F11,
        "f12" => enigo::Key::F12,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => enigo::Key::Unicode(ch),
                _ => return None,
            }
        }
    };
    Some(key)
}

/// Sends real key clicks to whatever window has focus
pub struct EnigoKeyInjector {
    enigo: Enigo,
}

impl EnigoKeyInjector {
    pub fn new() -> Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| anyhow::anyhow!("{e}"))
            .context("Failed to initialize input backend")?;
        Ok(Self { enigo })
    }
}

impl KeyInjector for EnigoKeyInjector {
    fn press(&mut self, key: &str) {
        let Some(parsed) = parse_key(key) else {
            tracing::warn!("Unknown key '{}', not pressed", key);
            return;
        };
        if let Err(e) = self.enigo.key(parsed, Direction::Click) {
            tracing::warn!("Failed to press '{}': {}", key, e);
        }
    }
}

/// Dry-run stand-in that only logs
#[derive(Debug, Default)]
pub struct LoggingKeyInjector {
    pub presses: u64,
}

impl KeyInjector for LoggingKeyInjector {
    fn press(&mut self, key: &str) {
        self.presses += 1;
        tracing::info!(key, total = self.presses, "[dry-run] key press");
    }
}
