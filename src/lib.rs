//! RFox Player Controls
//!
//! A headless custom video-player control surface: a play/pause toggle,
//! volume and playback-rate sliders, skip buttons and a scrub/progress bar,
//! kept in sync with a media playback capability.
//!
//! # Features
//!
//! - **Capability-based**: the player talks to any `MediaElement`; decoding,
//!   buffering and A/V sync stay inside that element
//! - **Deterministic**: `SimulatedMedia` only advances when told to, so
//!   end-to-end UI tests can assert exact values
//! - **Observer wiring**: widgets update from media notifications, input is
//!   routed through an `InputSurface`
//!
//! # Example
//!
//! ```
//! use rfplayer::platform::{ControlTarget, MediaElement};
//! use rfplayer::PlayerConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = PlayerConfig::default();
//! config.media.duration = Some(100.0);
//!
//! let player = rfplayer::new_player(config)?;
//! assert_eq!(player.snapshot().toggle, "►");
//!
//! player.input().click(ControlTarget::Toggle);
//! assert!(!player.media().paused());
//!
//! player.scrub_at(320.0);
//! assert_eq!(player.snapshot().progress_percent, Some(50.0));
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use std::sync::Arc;

pub mod error;
pub use error::{Error, Result};

// Ordered callback registry used by every event stream
pub mod events;

// Media capability and input devices
pub mod platform;

// Widgets and the binder that wires them up
pub mod controls;

// Scripted action sessions for the CLI and tests
pub mod session;

pub use controls::{ControlSurfaceBinder, Widgets};
pub use platform::{MediaElement, SimulatedMedia};

use controls::{ProgressFill, ProgressTrack, RangeSlider, SkipButton, ToggleButton};
use platform::{ControlTarget, InputSurface, RangeProperty};

/// Text shown on the play/pause toggle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Glyphs {
    /// Shown while paused
    pub play: String,
    /// Shown while playing
    pub pause: String,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            play: "►".to_string(),
            pause: "❚ ❚".to_string(),
        }
    }
}

/// Bounds and starting position of a range slider
///
/// In JSON any field may be left out; it then keeps the stock value for that
/// slider, so `{"volume": {"value": 0.5}}` is a complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
}

impl SliderConfig {
    /// Stock volume slider: 0..1 in steps of 0.05, starting at full volume
    pub fn volume() -> Self {
        Self { min: 0.0, max: 1.0, step: 0.05, value: 1.0 }
    }

    /// Stock rate slider: 0.5..2 in steps of 0.1, starting at normal speed
    pub fn playback_rate() -> Self {
        Self { min: 0.5, max: 2.0, step: 0.1, value: 1.0 }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct PartialSlider {
    min: Option<f64>,
    max: Option<f64>,
    step: Option<f64>,
    value: Option<f64>,
}

impl PartialSlider {
    fn over(self, base: SliderConfig) -> SliderConfig {
        SliderConfig {
            min: self.min.unwrap_or(base.min),
            max: self.max.unwrap_or(base.max),
            step: self.step.unwrap_or(base.step),
            value: self.value.unwrap_or(base.value),
        }
    }
}

fn volume_slider<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<SliderConfig, D::Error> {
    Ok(PartialSlider::deserialize(d)?.over(SliderConfig::volume()))
}

fn playback_rate_slider<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<SliderConfig, D::Error> {
    Ok(PartialSlider::deserialize(d)?.over(SliderConfig::playback_rate()))
}

/// Options for the simulated media element
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Known duration in seconds; `None` means metadata has not loaded yet
    pub duration: Option<f64>,
    /// Refuse `play()` as a browser autoplay policy would
    pub autoplay_blocked: bool,
}

/// Configuration for a player instance
///
/// Defaults mirror the stock player markup: a 0..1 volume slider, a 0.5..2
/// rate slider and two skip buttons (back 10s, forward 25s).
///
/// # Examples
///
/// ```
/// let cfg = rfplayer::PlayerConfig::default();
/// assert_eq!(cfg.skip_offsets, vec![-10.0, 25.0]);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Seconds added by each skip button, in button order
    pub skip_offsets: Vec<f64>,
    #[serde(deserialize_with = "volume_slider")]
    pub volume: SliderConfig,
    #[serde(deserialize_with = "playback_rate_slider")]
    pub playback_rate: SliderConfig,
    /// Width of the progress track in px
    pub track_width: f64,
    pub glyphs: Glyphs,
    pub media: MediaConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            skip_offsets: vec![-10.0, 25.0],
            volume: SliderConfig::volume(),
            playback_rate: SliderConfig::playback_rate(),
            track_width: 640.0,
            glyphs: Glyphs::default(),
            media: MediaConfig::default(),
        }
    }
}

impl PlayerConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: PlayerConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Reject configurations the widgets cannot represent
    pub fn validate(&self) -> Result<()> {
        if let Some(bad) = self.skip_offsets.iter().find(|d| !d.is_finite()) {
            return Err(Error::ConfigError(format!("skip offset {} is not finite", bad)));
        }
        check_slider("volume", &self.volume)?;
        check_slider("playback_rate", &self.playback_rate)?;
        if self.volume.min < 0.0 || self.volume.max > 1.0 {
            return Err(Error::ConfigError("volume slider must stay within 0..1".to_string()));
        }
        if self.playback_rate.min <= 0.0 {
            return Err(Error::ConfigError("playback_rate slider minimum must be positive".to_string()));
        }
        if !self.track_width.is_finite() || self.track_width <= 0.0 {
            return Err(Error::ConfigError(format!("track_width {} must be positive", self.track_width)));
        }
        if let Some(d) = self.media.duration {
            if !d.is_finite() || d < 0.0 {
                return Err(Error::ConfigError(format!("media duration {} is invalid", d)));
            }
        }
        if self.glyphs.play.is_empty() || self.glyphs.pause.is_empty() {
            return Err(Error::ConfigError("toggle glyphs must not be empty".to_string()));
        }
        Ok(())
    }
}

fn check_slider(name: &str, s: &SliderConfig) -> Result<()> {
    let finite = s.min.is_finite() && s.max.is_finite() && s.step.is_finite() && s.value.is_finite();
    if !finite || s.min >= s.max || s.step <= 0.0 {
        return Err(Error::ConfigError(format!("{} slider bounds are invalid", name)));
    }
    if s.value < s.min || s.value > s.max {
        return Err(Error::ConfigError(format!("{} slider value {} is out of bounds", name, s.value)));
    }
    Ok(())
}

/// Everything visible on the player at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlSnapshot {
    /// Toggle glyph text
    pub toggle: String,
    /// Progress fill flex-basis, e.g. `"50%"`
    pub progress: Option<String>,
    pub progress_percent: Option<f64>,
    pub paused: bool,
    pub current_time: f64,
    pub duration: Option<f64>,
    pub volume: f64,
    pub playback_rate: f64,
    pub scrubbing: bool,
}

/// A bound player: media element, input surface, widgets and binder
pub struct Player<M: MediaElement + 'static = SimulatedMedia> {
    media: Arc<M>,
    input: Arc<InputSurface>,
    binder: Arc<ControlSurfaceBinder>,
}

impl<M: MediaElement + 'static> Player<M> {
    /// Build the widgets from `config` and bind them to `media`
    pub fn with_media(config: PlayerConfig, media: Arc<M>) -> Result<Self> {
        config.validate()?;
        let input = Arc::new(InputSurface::new());
        let slider = |name, s: &SliderConfig| Arc::new(RangeSlider::new(name, s.min, s.max, s.step, s.value));
        let widgets = Widgets {
            toggle: Arc::new(ToggleButton::new(&config.glyphs.play)),
            progress: Arc::new(ProgressFill::new()),
            track: Arc::new(ProgressTrack::new(config.track_width)),
            volume: slider(RangeProperty::Volume, &config.volume),
            playback_rate: slider(RangeProperty::PlaybackRate, &config.playback_rate),
            skip_buttons: config.skip_offsets.iter().map(|d| SkipButton::new(*d)).collect(),
        };
        let dyn_media: Arc<dyn MediaElement> = media.clone();
        let binder = ControlSurfaceBinder::new(dyn_media, input.clone(), widgets, config.glyphs);
        binder.bind();
        Ok(Player { media, input, binder })
    }

    pub fn media(&self) -> &Arc<M> {
        &self.media
    }

    pub fn input(&self) -> &Arc<InputSurface> {
        &self.input
    }

    pub fn binder(&self) -> &Arc<ControlSurfaceBinder> {
        &self.binder
    }

    pub fn widgets(&self) -> &Widgets {
        self.binder.widgets()
    }

    /// Click the play/pause toggle
    pub fn click_toggle(&self) {
        self.input.click(ControlTarget::Toggle);
    }

    /// Click the skip button at `index`
    pub fn click_skip(&self, index: usize) {
        self.input.click(ControlTarget::SkipButton(index));
    }

    /// Drag a slider to `value` and commit it with a change event
    pub fn set_slider(&self, property: RangeProperty, value: f64) {
        let w = self.widgets();
        let slider = match property {
            RangeProperty::Volume => &w.volume,
            RangeProperty::PlaybackRate => &w.playback_rate,
        };
        slider.set_value(value);
        self.input.change(ControlTarget::Slider(property));
    }

    /// Click on the progress track at `offset_x` px
    pub fn scrub_at(&self, offset_x: f64) {
        self.input.click_at(ControlTarget::ProgressTrack, offset_x);
    }

    /// Press on the track at `from`, move to `to` with the button held, release
    pub fn drag(&self, from: f64, to: f64) {
        self.input.pointer_down(ControlTarget::ProgressTrack, from);
        self.input.pointer_move(ControlTarget::ProgressTrack, to, 1);
        self.input.pointer_up(ControlTarget::ProgressTrack, to);
    }

    pub fn snapshot(&self) -> ControlSnapshot {
        let state = self.media.state();
        let w = self.widgets();
        ControlSnapshot {
            toggle: w.toggle.text(),
            progress: w.progress.style(),
            progress_percent: w.progress.percent(),
            paused: state.paused,
            current_time: state.current_time,
            duration: state.duration,
            volume: state.volume,
            playback_rate: state.playback_rate,
            scrubbing: self.binder.is_scrubbing(),
        }
    }
}

/// Create a player backed by a `SimulatedMedia` configured from `config.media`
pub fn new_player(config: PlayerConfig) -> Result<Player<SimulatedMedia>> {
    config.validate()?;
    let media = Arc::new(SimulatedMedia::new());
    if let Some(d) = config.media.duration {
        media.load_metadata(d)?;
    }
    media.set_autoplay_blocked(config.media.autoplay_blocked);
    Player::with_media(config, media)
}
