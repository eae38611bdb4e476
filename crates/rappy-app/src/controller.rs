use std::time::Duration;

use rappy_config::Config;
use rappy_core::classify::{classify, read_counter_text};
use rappy_core::correlation::Template;
use rappy_core::homing::HomingLoop;
use rappy_core::notification::Notification;
use rappy_core::ports::ArtifactCategory;
use rappy_core::state::{MachineEvent, StateMachine};
use rappy_core::{CaptureError, Frame};
use rappy_types::{Change, HomingOutcome, Sky};
use tokio_util::sync::CancellationToken;

use crate::context::MonitorContext;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub hits: u64,
    pub failsafes: u64,
}

/// Snapshot category for a machine event, if it is archived at all
fn artifact_category(event: &MachineEvent) -> Option<ArtifactCategory> {
    match event {
        MachineEvent::Transition(transition) => match transition.change {
            Change::Sky { to: Sky::Chance, .. } => Some(ArtifactCategory::Chance),
            Change::Sky { to: Sky::Burst, .. } => Some(ArtifactCategory::Burst),
            _ => None,
        },
        MachineEvent::BurstOngoing { .. } => Some(ArtifactCategory::Burst),
        MachineEvent::Missed { .. } => None,
    }
}

/// Sequential poll loop: capture, classify, transition, optional homing,
/// notify, advance, sleep
pub struct Controller {
    config: Config,
    template: Template,
    machine: StateMachine,
    ctx: MonitorContext,
    cancel: CancellationToken,
    summary: RunSummary,
}

impl Controller {
    pub fn new(
        config: Config,
        template: Template,
        machine: StateMachine,
        ctx: MonitorContext,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            template,
            machine,
            ctx,
            cancel,
            summary: RunSummary::default(),
        }
    }

    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    /// Runs until cancelled. A capture failure ends the run with an error.
    pub async fn run(mut self) -> Result<RunSummary, CaptureError> {
        tracing::info!(
            window = %self.config.window.title,
            "Watching, initial state {}",
            self.machine.confirmed()
        );

        while !self.cancel.is_cancelled() {
            self.step().await?;
            if !self.pause(self.config.controls.poll_interval()).await {
                break;
            }
        }

        tracing::info!(
            cycles = self.summary.cycles,
            hits = self.summary.hits,
            failsafes = self.summary.failsafes,
            "Stopped in state {}",
            self.machine().confirmed()
        );
        Ok(self.summary)
    }

    /// One outer cycle without the trailing poll sleep
    pub async fn step(&mut self) -> Result<(), CaptureError> {
        let frame = self.ctx.source.capture().await?;
        self.summary.cycles += 1;

        let observed = classify(&frame, &self.config.classifier);
        let events = self.machine.observe(observed, frame.captured_at());
        self.dispatch(&events, &frame).await;

        if self.machine.confirmed().is_armed() && !self.home().await? {
            return Ok(());
        }

        if self.config.controls.advance_each_cycle && !self.cancel.is_cancelled() {
            self.ctx.keys.press(&self.config.controls.action_key);
        }

        Ok(())
    }

    /// Returns `false` when cancelled partway
    async fn home(&mut self) -> Result<bool, CaptureError> {
        tracing::info!("Armed, homing starts in {:?}", self.config.homing.settle());
        if !self.pause(self.config.homing.settle()).await {
            return Ok(false);
        }

        let homing = HomingLoop::new(
            &self.config.homing,
            &self.template,
            &self.config.controls.action_key,
        );
        let Some(report) = homing
            .run(
                self.ctx.source.as_ref(),
                self.ctx.keys.as_mut(),
                &self.cancel,
            )
            .await?
        else {
            return Ok(false);
        };

        self.machine.mark_consumed();

        match report.outcome {
            HomingOutcome::Hit { samples } => {
                tracing::info!(samples, "Pressed on the wild indicator");
                self.summary.hits += 1;
                self.save(ArtifactCategory::Wild, &report.frame);
            }
            HomingOutcome::Failsafe { samples } => {
                tracing::warn!(samples, "Pressed by failsafe");
                self.summary.failsafes += 1;
                self.save(ArtifactCategory::Failsafe, &report.frame);
                self.send(&Notification::failsafe()).await;
            }
        }

        Ok(self.pause(self.config.homing.cooldown()).await)
    }

    async fn dispatch(&self, events: &[MachineEvent], frame: &Frame) {
        let notify_pip = self.config.notifier.notify_pip_changes;
        let notifying = events
            .iter()
            .any(|e| Notification::from_machine_event(e, None, notify_pip).is_some());

        let counter = if notifying && self.ctx.notifier.is_some() {
            Some(read_counter_text(
                frame,
                &self.config.classifier.counter,
                self.ctx.recognizer.as_ref(),
            ))
        } else {
            None
        };

        for event in events {
            if let Some(category) = artifact_category(event) {
                self.save(category, frame);
            }
            if let MachineEvent::Missed { .. } = event {
                tracing::warn!("Wild window closed without a press");
            }
            if let Some(notification) =
                Notification::from_machine_event(event, counter.as_deref(), notify_pip)
            {
                self.send(&notification).await;
            }
        }
    }

    fn save(&self, category: ArtifactCategory, frame: &Frame) {
        if let Err(e) = self.ctx.artifacts.persist(category, frame) {
            tracing::warn!("Failed to save {} snapshot: {}", category, e);
        }
    }

    async fn send(&self, notification: &Notification) {
        let Some(notifier) = &self.ctx.notifier else {
            tracing::debug!(title = %notification.title, "Notifier disabled, skipping");
            return;
        };
        if let Err(e) = notifier.notify(notification).await {
            tracing::warn!(title = %notification.title, "Notification failed: {}", e);
        }
    }

    /// Cancellable sleep. Returns `false` if cancelled.
    async fn pause(&self, duration: Duration) -> bool {
        if duration.is_zero() {
            return !self.cancel.is_cancelled();
        }
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(duration) => true,
        }
    }
}
