//! Control surface binder: keeps the player widgets in sync with the media
//! element and turns user input into media mutations.
//!
//! The binder is built once with every collaborator passed in and then
//! `bind`s itself to the media notifications and the input surface. Listener
//! closures only hold a `Weak` reference, so dropping the last `Arc` to the
//! binder silently detaches it.

pub mod widgets;

use crate::platform::{
    ControlTarget, InputEvent, InputKind, InputSurface, MediaElement, MediaEvent, MediaEventKind, RangeProperty,
};
use crate::events::ListenerId;
use crate::Glyphs;
use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub use widgets::{ProgressFill, ProgressTrack, RangeSlider, SkipButton, ToggleButton};

/// The widgets a binder drives
pub struct Widgets {
    pub toggle: Arc<ToggleButton>,
    pub progress: Arc<ProgressFill>,
    pub track: Arc<ProgressTrack>,
    pub volume: Arc<RangeSlider>,
    pub playback_rate: Arc<RangeSlider>,
    pub skip_buttons: Vec<SkipButton>,
}

enum Subscription {
    Media(MediaEventKind, ListenerId),
    Input(ListenerId),
}

pub struct ControlSurfaceBinder {
    media: Arc<dyn MediaElement>,
    input: Arc<InputSurface>,
    widgets: Widgets,
    glyphs: Glyphs,
    scrubbing: AtomicBool,
    subscriptions: Mutex<Vec<Subscription>>,
}

impl ControlSurfaceBinder {
    pub fn new(media: Arc<dyn MediaElement>, input: Arc<InputSurface>, widgets: Widgets, glyphs: Glyphs) -> Arc<Self> {
        Arc::new(ControlSurfaceBinder {
            media,
            input,
            widgets,
            glyphs,
            scrubbing: AtomicBool::new(false),
            subscriptions: Mutex::new(Vec::new()),
        })
    }

    /// Register against media notifications and input. Calling it twice is a no-op.
    pub fn bind(self: &Arc<Self>) {
        let mut subs = self.subscriptions.lock().unwrap_or_else(|e| e.into_inner());
        if !subs.is_empty() {
            debug!("control surface already bound");
            return;
        }

        for kind in [MediaEventKind::Play, MediaEventKind::Pause, MediaEventKind::TimeUpdate] {
            let weak = Arc::downgrade(self);
            let id = self.media.subscribe(
                kind,
                Box::new(move |e: &MediaEvent| {
                    if let Some(binder) = weak.upgrade() {
                        binder.on_media(e);
                    }
                }),
            );
            subs.push(Subscription::Media(kind, id));
        }

        let weak = Arc::downgrade(self);
        let id = self.input.subscribe(move |e: &InputEvent| {
            if let Some(binder) = weak.upgrade() {
                binder.on_input(e);
            }
        });
        subs.push(Subscription::Input(id));
        drop(subs);

        self.update_button(self.media.paused());
    }

    /// Remove every listener registered by `bind`
    pub fn unbind(&self) {
        let subs: Vec<Subscription> = {
            let mut lock = self.subscriptions.lock().unwrap_or_else(|e| e.into_inner());
            lock.drain(..).collect()
        };
        for sub in subs {
            match sub {
                Subscription::Media(kind, id) => {
                    self.media.unsubscribe(kind, id);
                }
                Subscription::Input(id) => {
                    self.input.unsubscribe(id);
                }
            }
        }
        self.scrubbing.store(false, Ordering::SeqCst);
    }

    pub fn is_bound(&self) -> bool {
        !self.subscriptions.lock().map(|s| s.is_empty()).unwrap_or(true)
    }

    pub fn is_scrubbing(&self) -> bool {
        self.scrubbing.load(Ordering::SeqCst)
    }

    pub fn widgets(&self) -> &Widgets {
        &self.widgets
    }

    pub fn media(&self) -> &Arc<dyn MediaElement> {
        &self.media
    }

    /// Play when paused, pause otherwise. A refused `play()` is only logged.
    pub fn toggle_play(&self) {
        if self.media.paused() {
            if let Err(e) = self.media.play() {
                warn!("play request not honoured: {}", e);
            }
        } else {
            self.media.pause();
        }
    }

    /// Reflect the paused flag in the toggle glyph
    pub fn update_button(&self, paused: bool) {
        let glyph = if paused { &self.glyphs.play } else { &self.glyphs.pause };
        self.widgets.toggle.set_text(glyph);
    }

    /// Write a slider value straight into the media property it names
    pub fn handle_range_update(&self, property: RangeProperty, value: f64) {
        let res = match property {
            RangeProperty::Volume => self.media.set_volume(value),
            RangeProperty::PlaybackRate => self.media.set_playback_rate(value),
        };
        if let Err(e) = res {
            warn!("{} update to {} not applied: {}", property.name(), value, e);
        }
    }

    /// Move playback by `delta` seconds; the media element clamps
    pub fn skip(&self, delta: f64) {
        let target = self.media.current_time() + delta;
        if let Err(e) = self.media.set_current_time(target) {
            warn!("skip by {}s not applied: {}", delta, e);
        }
    }

    /// Size the progress fill to `current_time / duration`
    pub fn handle_progress(&self, current_time: f64, duration: Option<f64>) {
        match duration {
            Some(d) if d.is_finite() && d > 0.0 => {
                self.widgets.progress.set_percent(current_time / d * 100.0);
            }
            _ => debug!("duration unknown; progress left at {:?}", self.widgets.progress.percent()),
        }
    }

    /// Seek to the position under the pointer on the progress track
    pub fn scrub(&self, offset_x: f64, track_width: f64) {
        let duration = match self.media.duration() {
            Some(d) if d.is_finite() => d,
            _ => {
                debug!("scrub ignored before metadata");
                return;
            }
        };
        if track_width.is_nan() || track_width <= 0.0 {
            debug!("scrub ignored on collapsed track (width {})", track_width);
            return;
        }
        let target = offset_x / track_width * duration;
        if let Err(e) = self.media.set_current_time(target) {
            warn!("scrub to {}s not applied: {}", target, e);
        }
    }

    fn slider(&self, property: RangeProperty) -> &RangeSlider {
        match property {
            RangeProperty::Volume => self.widgets.volume.as_ref(),
            RangeProperty::PlaybackRate => self.widgets.playback_rate.as_ref(),
        }
    }

    fn on_media(&self, e: &MediaEvent) {
        match e.kind {
            MediaEventKind::Play | MediaEventKind::Pause => self.update_button(e.state.paused),
            MediaEventKind::TimeUpdate => self.handle_progress(e.state.current_time, e.state.duration),
            _ => {}
        }
    }

    fn on_input(&self, e: &InputEvent) {
        match (e.target, e.kind) {
            (ControlTarget::Video | ControlTarget::Toggle, InputKind::Click) => self.toggle_play(),
            (ControlTarget::Slider(p), InputKind::Change | InputKind::PointerMove) => {
                let slider = self.slider(p);
                self.handle_range_update(slider.name(), slider.value());
            }
            (ControlTarget::SkipButton(i), InputKind::Click) => match self.widgets.skip_buttons.get(i) {
                Some(b) => self.skip(b.delta()),
                None => debug!("no skip button at index {}", i),
            },
            (ControlTarget::ProgressTrack, InputKind::Click) => {
                self.scrub(e.offset_x, self.widgets.track.offset_width());
            }
            (ControlTarget::ProgressTrack, InputKind::PointerDown) => {
                self.scrubbing.store(true, Ordering::SeqCst);
            }
            (ControlTarget::ProgressTrack, InputKind::PointerUp) => {
                self.scrubbing.store(false, Ordering::SeqCst);
            }
            (ControlTarget::ProgressTrack, InputKind::PointerMove) => {
                if self.is_scrubbing() {
                    self.scrub(e.offset_x, self.widgets.track.offset_width());
                }
            }
            _ => {}
        }
    }
}
