//! Display and input widgets of the player.
//!
//! Widgets are shared between the binder and whoever renders them, so each one
//! keeps its mutable state behind a `Mutex`.

use crate::platform::RangeProperty;
use std::sync::{Mutex, MutexGuard};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// Play/pause button; only its text changes
pub struct ToggleButton {
    glyph: Mutex<String>,
}

impl ToggleButton {
    pub fn new(initial: &str) -> Self {
        ToggleButton { glyph: Mutex::new(initial.to_string()) }
    }

    pub fn text(&self) -> String {
        lock(&self.glyph).clone()
    }

    pub fn set_text(&self, text: &str) {
        let mut g = lock(&self.glyph);
        if *g != text {
            *g = text.to_string();
        }
    }
}

/// The filled part of the progress bar, sized by flex-basis percentage
pub struct ProgressFill {
    flex_basis: Mutex<Option<f64>>,
}

impl ProgressFill {
    pub fn new() -> Self {
        ProgressFill { flex_basis: Mutex::new(None) }
    }

    /// Current fill in percent; `None` until the first update
    pub fn percent(&self) -> Option<f64> {
        *lock(&self.flex_basis)
    }

    pub fn set_percent(&self, percent: f64) {
        *lock(&self.flex_basis) = Some(percent);
    }

    /// CSS value of the flex-basis property, e.g. `"50%"`
    pub fn style(&self) -> Option<String> {
        self.percent().map(|p| format!("{}%", p))
    }
}

impl Default for ProgressFill {
    fn default() -> Self {
        Self::new()
    }
}

/// Clickable progress track that pointer offsets are measured against
pub struct ProgressTrack {
    offset_width: Mutex<f64>,
}

impl ProgressTrack {
    pub fn new(offset_width: f64) -> Self {
        ProgressTrack { offset_width: Mutex::new(offset_width) }
    }

    pub fn offset_width(&self) -> f64 {
        *lock(&self.offset_width)
    }

    /// Layout changed (e.g. window resize)
    pub fn resize(&self, offset_width: f64) {
        *lock(&self.offset_width) = offset_width;
    }
}

/// Range input bound to one media property
pub struct RangeSlider {
    name: RangeProperty,
    min: f64,
    max: f64,
    step: f64,
    value: Mutex<f64>,
}

impl RangeSlider {
    pub fn new(name: RangeProperty, min: f64, max: f64, step: f64, value: f64) -> Self {
        RangeSlider {
            name,
            min,
            max,
            step,
            value: Mutex::new(value.clamp(min, max)),
        }
    }

    pub fn name(&self) -> RangeProperty {
        self.name
    }

    pub fn value(&self) -> f64 {
        *lock(&self.value)
    }

    /// Move the thumb. Like a range input the value snaps to the nearest
    /// `step` above `min` and never leaves `[min, max]`.
    pub fn set_value(&self, value: f64) -> f64 {
        let v = if value.is_nan() { self.min } else { self.snap(value.clamp(self.min, self.max)) };
        *lock(&self.value) = v;
        v
    }

    // Values already on the grid are kept as given so 0.5 stays exactly 0.5.
    fn snap(&self, value: f64) -> f64 {
        if self.step <= 0.0 {
            return value;
        }
        let snapped = self.min + ((value - self.min) / self.step).round() * self.step;
        if (snapped - value).abs() <= self.step * 1e-9 {
            value
        } else {
            snapped.clamp(self.min, self.max)
        }
    }
}

/// Button that moves playback by a fixed offset
#[derive(Debug, Clone, PartialEq)]
pub struct SkipButton {
    delta: f64,
}

impl SkipButton {
    pub fn new(delta: f64) -> Self {
        SkipButton { delta }
    }

    /// Seconds to add to the current position (negative rewinds)
    pub fn delta(&self) -> f64 {
        self.delta
    }
}
