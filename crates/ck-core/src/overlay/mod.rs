pub mod tap;

pub use tap::{GestureKind, TapClassifier, TapThresholds, TouchPhase, TouchSample};
