//! Platform surface: the media playback capability and the input devices
//!
//! The control surface only talks to these through the types re-exported
//! here, so a backend can supply its own `MediaElement` while tests use the
//! deterministic `SimulatedMedia`.

pub mod input;
pub mod media;

pub use input::{ControlTarget, InputEvent, InputKind, InputSurface, RangeProperty};
pub use media::{MediaElement, MediaEvent, MediaEventKind, MediaHandler, PlaybackState, SimulatedMedia};
