//! Tap classification for touch sequences seen by the overlay layer.
//!
//! A sequence is a tap iff, measured from the down event:
//!
//! - the largest distance from the down point is **strictly less** than the slop, and
//! - the time until the up event is **strictly less** than the max duration.
//!
//! Both thresholds are exclusive, so a sequence sitting exactly on either
//! threshold is not a tap.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapThresholds {
    pub slop_px: f32,
    pub max_duration: Duration,
}

impl Default for TapThresholds {
    fn default() -> Self {
        Self {
            slop_px: 10.0,
            max_duration: Duration::from_millis(220),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// A single touch event. `at_ms` is any monotonic millisecond clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchSample {
    pub phase: TouchPhase,
    pub x: f32,
    pub y: f32,
    pub at_ms: u64,
}

impl TouchSample {
    pub fn new(phase: TouchPhase, x: f32, y: f32, at_ms: u64) -> Self {
        Self { phase, x, y, at_ms }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Tap,
    Drag,
    LongPress,
    Cancelled,
}

#[derive(Debug, Clone, Copy)]
struct Pressed {
    x: f32,
    y: f32,
    at_ms: u64,
    max_distance: f32,
}

/// Stateful classifier fed one sample at a time.
///
/// 逐个接收触摸采样的有状态点击分类器。
#[derive(Debug, Clone)]
pub struct TapClassifier {
    thresholds: TapThresholds,
    pressed: Option<Pressed>,
}

impl TapClassifier {
    pub fn new(thresholds: TapThresholds) -> Self {
        Self {
            thresholds,
            pressed: None,
        }
    }

    pub fn thresholds(&self) -> TapThresholds {
        self.thresholds
    }

    pub fn is_tracking(&self) -> bool {
        self.pressed.is_some()
    }

    /// Feed a sample; returns a classification when the sequence ends.
    pub fn feed(&mut self, sample: TouchSample) -> Option<GestureKind> {
        match sample.phase {
            TouchPhase::Down => {
                self.pressed = Some(Pressed {
                    x: sample.x,
                    y: sample.y,
                    at_ms: sample.at_ms,
                    max_distance: 0.0,
                });
                None
            }
            TouchPhase::Move => {
                if let Some(pressed) = self.pressed.as_mut() {
                    let distance = distance(pressed.x, pressed.y, sample.x, sample.y);
                    pressed.max_distance = pressed.max_distance.max(distance);
                }
                None
            }
            TouchPhase::Up => {
                let pressed = self.pressed.take()?;
                let distance = distance(pressed.x, pressed.y, sample.x, sample.y)
                    .max(pressed.max_distance);
                let elapsed = Duration::from_millis(sample.at_ms.saturating_sub(pressed.at_ms));
                Some(self.classify(distance, elapsed))
            }
            TouchPhase::Cancel => self.pressed.take().map(|_| GestureKind::Cancelled),
        }
    }

    fn classify(&self, distance: f32, elapsed: Duration) -> GestureKind {
        if distance >= self.thresholds.slop_px {
            GestureKind::Drag
        } else if elapsed >= self.thresholds.max_duration {
            GestureKind::LongPress
        } else {
            GestureKind::Tap
        }
    }
}

fn distance(x0: f32, y0: f32, x1: f32, y1: f32) -> f32 {
    ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt()
}
