//! Scenario tests for the poll loop, driven by scripted frames

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::Local;
use image::{GrayImage, Luma, RgbImage};
use rappy_config::Config;
use rappy_core::correlation::Template;
use rappy_core::notification::{
    BURST_COLOR, CHANCE_COLOR, DEFAULT_COLOR, FAILSAFE_COLOR, MISSED_COLOR, Notification,
};
use rappy_core::ports::{
    Ack, ArtifactCategory, ArtifactSink, DigitRecognizer, FrameSource, KeyInjector, Notifier,
};
use rappy_core::state::StateMachine;
use rappy_core::{ArtifactWriteError, CaptureError, DeliveryError, Frame, RecognizeError};
use rappy_types::{ConfirmedState, Pip, Rgb, Sky};
use tokio_util::sync::CancellationToken;

use crate::context::MonitorContext;
use crate::controller::{Controller, RunSummary};

struct ScriptedSource {
    frames: Mutex<VecDeque<Frame>>,
}

#[async_trait::async_trait]
impl FrameSource for ScriptedSource {
    async fn capture(&self) -> Result<Frame, CaptureError> {
        self.frames
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| CaptureError::WindowNotFound("rappy".into()))
    }
}

struct RecordingKeys(Arc<Mutex<Vec<String>>>);

impl KeyInjector for RecordingKeys {
    fn press(&mut self, key: &str) {
        self.0.lock().unwrap().push(key.to_string());
    }
}

struct FixedRecognizer;

impl DigitRecognizer for FixedRecognizer {
    fn recognize(&self, _image: &GrayImage, _charset: &str) -> Result<String, RecognizeError> {
        Ok(" 1,234\n".to_string())
    }
}

struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
    status: u16,
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> Result<Ack, DeliveryError> {
        self.sent.lock().unwrap().push(notification.clone());
        if (200..300).contains(&self.status) {
            Ok(Ack {
                status: self.status,
            })
        } else {
            Err(DeliveryError::Rejected {
                status: self.status,
            })
        }
    }
}

struct RecordingSink(Arc<Mutex<Vec<ArtifactCategory>>>);

impl ArtifactSink for RecordingSink {
    fn persist(
        &self,
        category: ArtifactCategory,
        _frame: &Frame,
    ) -> Result<std::path::PathBuf, ArtifactWriteError> {
        self.0.lock().unwrap().push(category);
        Ok(std::path::PathBuf::from(category.as_str()))
    }
}

#[derive(Default)]
struct Harness {
    keys: Arc<Mutex<Vec<String>>>,
    sent: Arc<Mutex<Vec<Notification>>>,
    saved: Arc<Mutex<Vec<ArtifactCategory>>>,
}

impl Harness {
    fn controller(
        &self,
        frames: Vec<Frame>,
        machine: StateMachine,
        status: u16,
        cancel: CancellationToken,
    ) -> Controller {
        let source = ScriptedSource {
            frames: Mutex::new(frames.into()),
        };
        let ctx = MonitorContext::new(
            Box::new(source),
            Box::new(RecordingKeys(self.keys.clone())),
            Box::new(FixedRecognizer),
        )
        .with_notifier(Box::new(RecordingNotifier {
            sent: self.sent.clone(),
            status,
        }))
        .with_artifacts(Box::new(RecordingSink(self.saved.clone())));

        Controller::new(test_config(), template(), machine, ctx, cancel)
    }

    fn colors(&self) -> Vec<u32> {
        self.sent.lock().unwrap().iter().map(|n| n.color).collect()
    }
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.controls.poll_interval_ms = 0;
    config.homing.settle_ms = 0;
    config.homing.cooldown_ms = 0;
    config.homing.ceiling = 3;
    config
}

fn pattern() -> GrayImage {
    GrayImage::from_fn(6, 4, |x, y| {
        Luma([if (x + y) % 2 == 0 { 220 } else { 30 }])
    })
}

fn template() -> Template {
    Template::new(pattern()).unwrap()
}

fn put(image: &mut RgbImage, x: u32, y: u32, Rgb(r, g, b): Rgb) {
    image.put_pixel(x, y, image::Rgb([r, g, b]));
}

/// Full-size window with the pip and sky sample pixels painted
fn frame(pip: Pip, sky: Sky) -> Frame {
    let config = Config::default();
    let pip_cfg = &config.classifier.pip;
    let sky_cfg = &config.classifier.sky;

    let mut image = RgbImage::from_pixel(800, 750, image::Rgb([40, 40, 40]));
    let pip_color = match pip {
        Pip::Filled => pip_cfg.filled,
        Pip::Empty => pip_cfg.empty,
    };
    let sky_color = match sky {
        Sky::Default => sky_cfg.default,
        Sky::Chance => sky_cfg.chance,
        Sky::Burst => sky_cfg.burst,
    };
    put(&mut image, pip_cfg.at.x, pip_cfg.at.y, pip_color);
    put(&mut image, sky_cfg.at.x, sky_cfg.at.y, sky_color);
    Frame::new(image, Local::now())
}

/// Sky sample painted, pip sample left unreadable
fn sky_only(sky: Sky) -> Frame {
    let mut image = frame(Pip::Empty, sky).image().clone();
    let pip = Config::default().classifier.pip.at;
    image.put_pixel(pip.x, pip.y, image::Rgb([40, 40, 40]));
    Frame::new(image, Local::now())
}

/// Homing sample with the wild indicator drawn inside the homing region
fn indicator() -> Frame {
    let region = test_config().homing.region;
    let mut image = RgbImage::from_pixel(800, 750, image::Rgb([40, 40, 40]));
    for (x, y, Luma([v])) in pattern().enumerate_pixels() {
        image.put_pixel(region.x + 60 + x, region.y + 90 + y, image::Rgb([*v, *v, *v]));
    }
    Frame::new(image, Local::now())
}

/// Plain frame used for homing samples
fn blank() -> Frame {
    Frame::new(
        RgbImage::from_pixel(800, 750, image::Rgb([40, 40, 40])),
        Local::now(),
    )
}

#[tokio::test]
async fn test_chance_round_trip_notifies_twice() {
    let harness = Harness::default();
    let frames = vec![
        frame(Pip::Empty, Sky::Default),
        frame(Pip::Empty, Sky::Chance),
        frame(Pip::Empty, Sky::Default),
    ];
    let controller =
        harness.controller(frames, StateMachine::new(), 204, CancellationToken::new());

    let result = controller.run().await;

    assert!(matches!(result, Err(CaptureError::WindowNotFound(_))));
    assert_eq!(harness.colors(), vec![CHANCE_COLOR, DEFAULT_COLOR]);
    assert_eq!(*harness.saved.lock().unwrap(), vec![ArtifactCategory::Chance]);

    let sent = harness.sent.lock().unwrap();
    assert_eq!(sent[0].title, "Currently in PSE Chance state.");
    assert_eq!(sent[0].footer.as_deref(), Some("Coins: 1,234"));
    assert_eq!(sent[1].title, "Returned to default state.");
    // advance key once per cycle
    assert_eq!(harness.keys.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_burst_is_archived_every_cycle_but_notified_once() {
    let harness = Harness::default();
    let frames = vec![
        frame(Pip::Empty, Sky::Burst),
        frame(Pip::Empty, Sky::Burst),
        frame(Pip::Empty, Sky::Burst),
    ];
    let controller =
        harness.controller(frames, StateMachine::new(), 204, CancellationToken::new());

    let _ = controller.run().await;

    assert_eq!(harness.colors(), vec![BURST_COLOR]);
    assert_eq!(
        *harness.saved.lock().unwrap(),
        vec![ArtifactCategory::Burst; 3]
    );
}

#[tokio::test]
async fn test_armed_without_match_hits_failsafe() {
    let harness = Harness::default();
    let frames = vec![frame(Pip::Filled, Sky::Default), blank(), blank(), blank()];
    let mut controller =
        harness.controller(frames, StateMachine::new(), 204, CancellationToken::new());

    controller.step().await.unwrap();

    assert_eq!(harness.colors(), vec![FAILSAFE_COLOR]);
    assert!(harness.sent.lock().unwrap()[0].footer.is_none());
    assert_eq!(*harness.saved.lock().unwrap(), vec![ArtifactCategory::Failsafe]);
    // failsafe press, then the cycle advance
    assert_eq!(harness.keys.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_hit_saves_wild_snapshot_without_notifying() {
    let harness = Harness::default();
    let frames = vec![frame(Pip::Filled, Sky::Default), blank(), indicator()];
    let mut controller =
        harness.controller(frames, StateMachine::new(), 204, CancellationToken::new());

    controller.step().await.unwrap();

    assert!(harness.sent.lock().unwrap().is_empty());
    assert_eq!(*harness.saved.lock().unwrap(), vec![ArtifactCategory::Wild]);
    // hit press, then the cycle advance
    assert_eq!(harness.keys.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_homing_reruns_when_armed_persists_through_unknown_pip() {
    let harness = Harness::default();
    let frames = vec![
        frame(Pip::Filled, Sky::Default),
        blank(),
        blank(),
        blank(),
        sky_only(Sky::Default),
        blank(),
        blank(),
        blank(),
    ];
    let controller =
        harness.controller(frames, StateMachine::new(), 204, CancellationToken::new());

    let result = controller.run().await;

    assert!(matches!(result, Err(CaptureError::WindowNotFound(_))));
    assert_eq!(harness.colors(), vec![FAILSAFE_COLOR, FAILSAFE_COLOR]);
    assert_eq!(
        *harness.saved.lock().unwrap(),
        vec![ArtifactCategory::Failsafe; 2]
    );
    assert_eq!(harness.keys.lock().unwrap().len(), 4);
}

#[tokio::test]
async fn test_leaving_armed_after_failsafe_is_not_missed() {
    let harness = Harness::default();
    let frames = vec![
        frame(Pip::Filled, Sky::Default),
        blank(),
        blank(),
        blank(),
        frame(Pip::Empty, Sky::Default),
    ];
    let controller =
        harness.controller(frames, StateMachine::new(), 204, CancellationToken::new());

    let _ = controller.run().await;

    assert_eq!(harness.colors(), vec![FAILSAFE_COLOR]);
}

#[tokio::test]
async fn test_missed_window_is_notified() {
    let harness = Harness::default();
    let frames = vec![frame(Pip::Empty, Sky::Default)];
    let mut controller = harness.controller(
        frames,
        StateMachine::with_state(ConfirmedState::ARMED),
        204,
        CancellationToken::new(),
    );

    controller.step().await.unwrap();

    let sent = harness.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].color, MISSED_COLOR);
    assert_eq!(sent[0].footer.as_deref(), Some("Coins: 1,234"));
}

#[tokio::test]
async fn test_delivery_failures_do_not_stop_the_loop() {
    let harness = Harness::default();
    let frames = vec![
        frame(Pip::Empty, Sky::Chance),
        frame(Pip::Empty, Sky::Default),
        frame(Pip::Empty, Sky::Burst),
    ];
    let controller =
        harness.controller(frames, StateMachine::new(), 500, CancellationToken::new());

    let result = controller.run().await;

    // only the exhausted source ends the run
    assert!(matches!(result, Err(CaptureError::WindowNotFound(_))));
    assert_eq!(harness.sent.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_cancelled_before_start_captures_nothing() {
    let harness = Harness::default();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let controller = harness.controller(
        vec![frame(Pip::Empty, Sky::Chance)],
        StateMachine::new(),
        204,
        cancel,
    );

    let summary = controller.run().await.unwrap();

    assert_eq!(summary, RunSummary::default());
    assert!(harness.sent.lock().unwrap().is_empty());
    assert!(harness.keys.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_colors_keep_confirmed_state() {
    let harness = Harness::default();
    let frames = vec![frame(Pip::Empty, Sky::Chance), blank(), blank()];
    let controller =
        harness.controller(frames, StateMachine::new(), 204, CancellationToken::new());

    let _ = controller.run().await;

    assert_eq!(harness.colors(), vec![CHANCE_COLOR]);
}
