/// Pointer and form input routed from the page to the control surface

use crate::events::{ListenerId, Listeners};
use log::debug;
use serde::{Deserialize, Serialize};

/// The two media properties driven by range sliders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RangeProperty {
    Volume,
    PlaybackRate,
}

impl RangeProperty {
    pub fn name(&self) -> &'static str {
        match self {
            RangeProperty::Volume => "volume",
            RangeProperty::PlaybackRate => "playbackRate",
        }
    }
}

/// Element of the player that received the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlTarget {
    /// The video surface itself
    Video,
    Toggle,
    ProgressTrack,
    Slider(RangeProperty),
    /// Skip button by position in the player's button list
    SkipButton(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Click,
    /// Committed value change on a form control
    Change,
    PointerDown,
    PointerMove,
    PointerUp,
}

/// A single input event
#[derive(Debug, Clone, PartialEq)]
pub struct InputEvent {
    pub target: ControlTarget,
    pub kind: InputKind,
    /// Horizontal pointer position relative to the target, in px
    pub offset_x: f64,
    /// Bitmask of pressed pointer buttons (1 = primary)
    pub buttons: u8,
}

impl InputEvent {
    pub fn new(target: ControlTarget, kind: InputKind) -> Self {
        InputEvent { target, kind, offset_x: 0.0, buttons: 0 }
    }

    pub fn at(mut self, offset_x: f64) -> Self {
        self.offset_x = offset_x;
        self
    }

    pub fn with_buttons(mut self, buttons: u8) -> Self {
        self.buttons = buttons;
        self
    }
}

/// Source of input events for one player instance
pub struct InputSurface {
    listeners: Listeners<InputEvent>,
}

impl InputSurface {
    pub fn new() -> Self {
        InputSurface { listeners: Listeners::new() }
    }

    pub fn subscribe<F>(&self, handler: F) -> ListenerId
    where
        F: Fn(&InputEvent) + Send + Sync + 'static,
    {
        self.listeners.subscribe(handler)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn dispatch(&self, event: InputEvent) {
        debug!("input {:?} on {:?} at x={}", event.kind, event.target, event.offset_x);
        self.listeners.emit(&event);
    }

    pub fn click(&self, target: ControlTarget) {
        self.dispatch(InputEvent::new(target, InputKind::Click));
    }

    pub fn click_at(&self, target: ControlTarget, offset_x: f64) {
        self.dispatch(InputEvent::new(target, InputKind::Click).at(offset_x));
    }

    pub fn change(&self, target: ControlTarget) {
        self.dispatch(InputEvent::new(target, InputKind::Change));
    }

    pub fn pointer_down(&self, target: ControlTarget, offset_x: f64) {
        self.dispatch(InputEvent::new(target, InputKind::PointerDown).at(offset_x).with_buttons(1));
    }

    /// Pointer move; `buttons` is what the device reports as held
    pub fn pointer_move(&self, target: ControlTarget, offset_x: f64, buttons: u8) {
        self.dispatch(InputEvent::new(target, InputKind::PointerMove).at(offset_x).with_buttons(buttons));
    }

    pub fn pointer_up(&self, target: ControlTarget, offset_x: f64) {
        self.dispatch(InputEvent::new(target, InputKind::PointerUp).at(offset_x));
    }
}

impl Default for InputSurface {
    fn default() -> Self {
        Self::new()
    }
}
