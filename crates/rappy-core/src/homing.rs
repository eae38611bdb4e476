use rappy_config::homing::HomingConfig;
use rappy_types::HomingOutcome;

use crate::correlation::{MatchScore, Template, find_above};
use crate::error::CaptureError;
use crate::frame::Frame;
use crate::ports::{CancelSignal, FrameSource, KeyInjector};

#[derive(Debug, Clone)]
pub struct HomingReport {
    pub outcome: HomingOutcome,
    /// Detection region of the last sample taken
    pub frame: Frame,
}

/// Bounded sampler that presses the action key when the circle reaches the
/// wild indicator, or when the sample ceiling runs out
pub struct HomingLoop<'a> {
    config: &'a HomingConfig,
    template: &'a Template,
    action_key: &'a str,
}

impl<'a> HomingLoop<'a> {
    pub fn new(config: &'a HomingConfig, template: &'a Template, action_key: &'a str) -> Self {
        Self {
            config,
            template,
            action_key,
        }
    }

    /// Correlate one sample off the async workers
    async fn scan(&self, frame: Frame) -> Result<(Frame, Option<MatchScore>), CaptureError> {
        let template = self.template.clone();
        let confidence = self.config.confidence;
        tokio::task::spawn_blocking(move || {
            let found = find_above(&frame.to_gray(), &template, confidence);
            (frame, found)
        })
        .await
        .map_err(|e| CaptureError::Backend(format!("homing scan task failed: {e}")))
    }

    /// Returns `Ok(None)` when cancelled before reaching an outcome
    pub async fn run(
        &self,
        source: &dyn FrameSource,
        keys: &mut dyn KeyInjector,
        cancel: &dyn CancelSignal,
    ) -> Result<Option<HomingReport>, CaptureError> {
        let mut samples: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                tracing::info!(samples, "Homing cancelled");
                return Ok(None);
            }

            let frame = source.capture().await?.crop(self.config.region);
            samples += 1;

            let (frame, found) = self.scan(frame).await?;
            if let Some(hit) = found {
                tracing::info!(
                    samples,
                    x = hit.x,
                    y = hit.y,
                    score = hit.score,
                    "Wild indicator detected"
                );
                keys.press(self.action_key);
                return Ok(Some(HomingReport {
                    outcome: HomingOutcome::Hit { samples },
                    frame,
                }));
            }

            tracing::debug!(samples, "Not yet");

            if samples >= self.config.ceiling {
                tracing::warn!(samples, "Failsafe triggered");
                keys.press(self.action_key);
                return Ok(Some(HomingReport {
                    outcome: HomingOutcome::Failsafe { samples },
                    frame,
                }));
            }

            let interval = self.config.sample_interval();
            if !interval.is_zero() {
                tokio::time::sleep(interval).await;
            }
        }
    }
}
