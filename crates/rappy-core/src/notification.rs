use rappy_types::{Change, Pip, Sky, TransitionEvent};
use serde::Serialize;

use crate::state::MachineEvent;

pub const DEFAULT_COLOR: u32 = 0x02A7E7;
pub const CHANCE_COLOR: u32 = 0xD5BED9;
pub const BURST_COLOR: u32 = 0x0206D7;
pub const FAILSAFE_COLOR: u32 = 0xFF0000;
pub const MISSED_COLOR: u32 = 0xFFA500;
pub const PIP_FILLED_COLOR: u32 = 0x93671D;
pub const PIP_EMPTY_COLOR: u32 = 0x777365;

/// One embed worth of state-change information
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub color: u32,
    pub title: String,
    pub footer: Option<String>,
}

fn coins_footer(counter: Option<&str>) -> Option<String> {
    counter.map(|text| format!("Coins: {text}"))
}

impl Notification {
    pub fn new(color: u32, title: impl Into<String>) -> Self {
        Self {
            color,
            title: title.into(),
            footer: None,
        }
    }

    pub fn with_footer(mut self, footer: Option<String>) -> Self {
        self.footer = footer;
        self
    }

    pub fn for_transition(event: &TransitionEvent) -> Self {
        let (color, title) = match event.change {
            Change::Sky { to: Sky::Default, .. } => (DEFAULT_COLOR, "Returned to default state."),
            Change::Sky { to: Sky::Chance, .. } => (CHANCE_COLOR, "Currently in PSE Chance state."),
            Change::Sky { to: Sky::Burst, .. } => (BURST_COLOR, "Currently in PSE Burst state."),
            Change::Pip { to: Pip::Filled, .. } => (PIP_FILLED_COLOR, "Pip filled."),
            Change::Pip { to: Pip::Empty, .. } => (PIP_EMPTY_COLOR, "Pip emptied."),
        };
        Self::new(color, title).with_footer(coins_footer(event.auxiliary_text.as_deref()))
    }

    pub fn missed(counter: Option<&str>) -> Self {
        Self::new(MISSED_COLOR, "Wild window closed without a press.")
            .with_footer(coins_footer(counter))
    }

    pub fn failsafe() -> Self {
        Self::new(FAILSAFE_COLOR, "Failsafe triggered.")
    }

    /// Map a machine event to what gets posted. Pip changes are opt-in,
    /// ongoing bursts never notify.
    pub fn from_machine_event(
        event: &MachineEvent,
        counter: Option<&str>,
        notify_pip_changes: bool,
    ) -> Option<Self> {
        match event {
            MachineEvent::Transition(transition) => {
                if matches!(transition.change, Change::Pip { .. }) && !notify_pip_changes {
                    return None;
                }
                let mut transition = transition.clone();
                if transition.auxiliary_text.is_none() {
                    transition.auxiliary_text = counter.map(str::to_string);
                }
                Some(Self::for_transition(&transition))
            }
            MachineEvent::Missed { .. } => Some(Self::missed(counter)),
            MachineEvent::BurstOngoing { .. } => None,
        }
    }
}
