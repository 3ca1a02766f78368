/// Media playback capability consumed by the control surface, plus a
/// deterministic in-memory element for tests and the session driver.

use crate::events::{ListenerId, Listeners};
use crate::{Error, Result};
use log::{debug, warn};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Playback properties as seen through the capability
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackState {
    pub paused: bool,
    pub ended: bool,
    /// Position in seconds
    pub current_time: f64,
    /// Length in seconds; `None` until metadata has loaded
    pub duration: Option<f64>,
    /// Linear gain in `[0, 1]`
    pub volume: f64,
    pub playback_rate: f64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            paused: true,
            ended: false,
            current_time: 0.0,
            duration: None,
            volume: 1.0,
            playback_rate: 1.0,
        }
    }
}

/// Notifications fired by a media element when its state changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaEventKind {
    Play,
    Pause,
    TimeUpdate,
    LoadedMetadata,
    Ended,
    VolumeChange,
    RateChange,
    Seeked,
}

const KIND_COUNT: usize = 8;

impl MediaEventKind {
    pub const ALL: [MediaEventKind; KIND_COUNT] = [
        MediaEventKind::Play,
        MediaEventKind::Pause,
        MediaEventKind::TimeUpdate,
        MediaEventKind::LoadedMetadata,
        MediaEventKind::Ended,
        MediaEventKind::VolumeChange,
        MediaEventKind::RateChange,
        MediaEventKind::Seeked,
    ];
}

/// A notification together with the state right after the change
#[derive(Debug, Clone, PartialEq)]
pub struct MediaEvent {
    pub kind: MediaEventKind,
    pub state: PlaybackState,
}

pub type MediaHandler = Box<dyn Fn(&MediaEvent) + Send + Sync>;

/// The playback capability: readable/writable properties, control methods and
/// a notification stream.
///
/// Implementations own range enforcement. Callers write values through
/// unchanged and rely on the element to clamp or reject them.
pub trait MediaElement: Send + Sync {
    /// Snapshot of every playback property
    fn state(&self) -> PlaybackState;

    fn paused(&self) -> bool {
        self.state().paused
    }

    fn ended(&self) -> bool {
        self.state().ended
    }

    fn current_time(&self) -> f64 {
        self.state().current_time
    }

    fn duration(&self) -> Option<f64> {
        self.state().duration
    }

    fn volume(&self) -> f64 {
        self.state().volume
    }

    fn playback_rate(&self) -> f64 {
        self.state().playback_rate
    }

    /// Start playback. May be refused by the platform.
    fn play(&self) -> Result<()>;

    fn pause(&self);

    /// Seek to `seconds`
    fn set_current_time(&self, seconds: f64) -> Result<()>;

    fn set_volume(&self, volume: f64) -> Result<()>;

    fn set_playback_rate(&self, rate: f64) -> Result<()>;

    /// Register a handler for one notification kind
    fn subscribe(&self, kind: MediaEventKind, handler: MediaHandler) -> ListenerId;

    fn unsubscribe(&self, kind: MediaEventKind, id: ListenerId) -> bool;
}

/// In-memory media element with browser-like clamping and notifications.
///
/// Time only moves when `advance` is called, which keeps tests deterministic.
pub struct SimulatedMedia {
    state: Mutex<PlaybackState>,
    autoplay_blocked: AtomicBool,
    listeners: [Listeners<MediaEvent>; KIND_COUNT],
}

impl SimulatedMedia {
    pub fn new() -> Self {
        SimulatedMedia {
            state: Mutex::new(PlaybackState::default()),
            autoplay_blocked: AtomicBool::new(false),
            listeners: std::array::from_fn(|_| Listeners::new()),
        }
    }

    /// Element whose metadata is already known
    pub fn with_duration(duration: f64) -> Self {
        let m = Self::new();
        m.lock_state().duration = Some(duration.max(0.0));
        m
    }

    pub fn set_autoplay_blocked(&self, blocked: bool) {
        self.autoplay_blocked.store(blocked, Ordering::SeqCst);
    }

    pub fn autoplay_blocked(&self) -> bool {
        self.autoplay_blocked.load(Ordering::SeqCst)
    }

    /// Simulate metadata arriving: sets the duration, then fires `LoadedMetadata`
    /// followed by `TimeUpdate` so progress displays catch up with the position.
    pub fn load_metadata(&self, duration: f64) -> Result<()> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(Error::InvalidTime(duration));
        }
        {
            let mut s = self.lock_state();
            s.duration = Some(duration);
            s.current_time = s.current_time.min(duration);
        }
        self.fire(MediaEventKind::LoadedMetadata);
        self.fire(MediaEventKind::TimeUpdate);
        Ok(())
    }

    /// Move playback forward by `seconds` of wall-clock time.
    ///
    /// Does nothing while paused or before metadata. Reaching the end pauses
    /// the element and fires `Pause` followed by `Ended`.
    pub fn advance(&self, seconds: f64) {
        if !seconds.is_finite() || seconds <= 0.0 {
            return;
        }
        let reached_end = {
            let mut s = self.lock_state();
            let duration = match s.duration {
                Some(d) if !s.paused => d,
                _ => return,
            };
            let next = s.current_time + seconds * s.playback_rate;
            if next >= duration {
                s.current_time = duration;
                s.paused = true;
                s.ended = true;
                true
            } else {
                s.current_time = next;
                false
            }
        };
        self.fire(MediaEventKind::TimeUpdate);
        if reached_end {
            self.fire(MediaEventKind::Pause);
            self.fire(MediaEventKind::Ended);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, PlaybackState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn listeners_for(&self, kind: MediaEventKind) -> &Listeners<MediaEvent> {
        &self.listeners[kind as usize]
    }

    // The state lock must be released before handlers run; they read it back.
    fn fire(&self, kind: MediaEventKind) {
        let event = MediaEvent { kind, state: self.state() };
        debug!("media event {:?} at {:.3}s", kind, event.state.current_time);
        self.listeners_for(kind).emit(&event);
    }
}

impl Default for SimulatedMedia {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaElement for SimulatedMedia {
    fn state(&self) -> PlaybackState {
        self.lock_state().clone()
    }

    fn play(&self) -> Result<()> {
        if self.autoplay_blocked() {
            return Err(Error::PlayRejected("play() blocked by autoplay policy".to_string()));
        }
        let restarted = {
            let mut s = self.lock_state();
            if !s.paused {
                return Ok(());
            }
            // a seek that clamped onto the end counts as ended too
            let at_end = s.ended || s.duration.map_or(false, |d| s.current_time >= d);
            if at_end {
                s.current_time = 0.0;
                s.ended = false;
            }
            s.paused = false;
            at_end
        };
        self.fire(MediaEventKind::Play);
        if restarted {
            self.fire(MediaEventKind::TimeUpdate);
        }
        Ok(())
    }

    fn pause(&self) {
        {
            let mut s = self.lock_state();
            if s.paused {
                return;
            }
            s.paused = true;
        }
        self.fire(MediaEventKind::Pause);
    }

    fn set_current_time(&self, seconds: f64) -> Result<()> {
        if !seconds.is_finite() {
            warn!("ignoring non-finite seek target {}", seconds);
            return Err(Error::InvalidTime(seconds));
        }
        {
            let mut s = self.lock_state();
            let mut t = seconds.max(0.0);
            if let Some(d) = s.duration {
                t = t.min(d);
            }
            s.current_time = t;
            s.ended = false;
        }
        self.fire(MediaEventKind::Seeked);
        self.fire(MediaEventKind::TimeUpdate);
        Ok(())
    }

    fn set_volume(&self, volume: f64) -> Result<()> {
        if !volume.is_finite() || !(0.0..=1.0).contains(&volume) {
            return Err(Error::IndexSize { property: "volume", value: volume });
        }
        {
            let mut s = self.lock_state();
            if s.volume == volume {
                return Ok(());
            }
            s.volume = volume;
        }
        self.fire(MediaEventKind::VolumeChange);
        Ok(())
    }

    fn set_playback_rate(&self, rate: f64) -> Result<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(Error::NotSupported { property: "playbackRate", value: rate });
        }
        {
            let mut s = self.lock_state();
            if s.playback_rate == rate {
                return Ok(());
            }
            s.playback_rate = rate;
        }
        self.fire(MediaEventKind::RateChange);
        Ok(())
    }

    fn subscribe(&self, kind: MediaEventKind, handler: MediaHandler) -> ListenerId {
        self.listeners_for(kind).subscribe(handler)
    }

    fn unsubscribe(&self, kind: MediaEventKind, id: ListenerId) -> bool {
        self.listeners_for(kind).unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn record(m: &SimulatedMedia) -> Arc<Mutex<Vec<MediaEventKind>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        for kind in MediaEventKind::ALL {
            let seen = seen.clone();
            m.subscribe(kind, Box::new(move |e: &MediaEvent| seen.lock().unwrap().push(e.kind)));
        }
        seen
    }

    #[test]
    fn simulated_media_transitions_state() {
        let m = SimulatedMedia::new();
        assert!(m.paused());
        m.play().unwrap();
        assert!(!m.paused());
        m.pause();
        assert!(m.paused());
    }

    #[test]
    fn play_and_pause_notify_only_on_change() {
        let m = SimulatedMedia::with_duration(10.0);
        let seen = record(&m);
        m.pause();
        m.play().unwrap();
        m.play().unwrap();
        m.pause();
        assert_eq!(*seen.lock().unwrap(), vec![MediaEventKind::Play, MediaEventKind::Pause]);
    }

    #[test]
    fn load_metadata_fires_loadedmetadata_then_timeupdate() {
        let m = SimulatedMedia::new();
        m.set_current_time(25.0).unwrap();
        let seen = record(&m);
        m.load_metadata(50.0).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![MediaEventKind::LoadedMetadata, MediaEventKind::TimeUpdate]);
        assert_eq!(m.current_time(), 25.0);
    }

    #[test]
    fn play_after_seek_to_end_restarts() {
        let m = SimulatedMedia::with_duration(30.0);
        m.set_current_time(99.0).unwrap();
        assert_eq!(m.current_time(), 30.0);
        m.play().unwrap();
        assert_eq!(m.current_time(), 0.0);
        assert!(!m.paused());
    }

    #[test]
    fn blocked_autoplay_rejects_play() {
        let m = SimulatedMedia::new();
        m.set_autoplay_blocked(true);
        let err = m.play().unwrap_err();
        assert!(matches!(err, Error::PlayRejected(_)));
        assert!(m.paused());
    }

    #[test]
    fn seek_clamps_to_media_bounds() {
        let m = SimulatedMedia::with_duration(100.0);
        m.set_current_time(-5.0).unwrap();
        assert_eq!(m.current_time(), 0.0);
        m.set_current_time(250.0).unwrap();
        assert_eq!(m.current_time(), 100.0);
        assert!(m.set_current_time(f64::NAN).is_err());
    }

    #[test]
    fn seek_before_metadata_only_clamps_below() {
        let m = SimulatedMedia::new();
        m.set_current_time(42.0).unwrap();
        assert_eq!(m.current_time(), 42.0);
        m.load_metadata(30.0).unwrap();
        assert_eq!(m.current_time(), 30.0);
    }

    #[test]
    fn seek_fires_seeked_then_timeupdate() {
        let m = SimulatedMedia::with_duration(100.0);
        let seen = record(&m);
        m.set_current_time(12.0).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![MediaEventKind::Seeked, MediaEventKind::TimeUpdate]);
    }

    #[test]
    fn volume_and_rate_reject_out_of_range() {
        let m = SimulatedMedia::new();
        assert!(matches!(m.set_volume(-0.1), Err(Error::IndexSize { .. })));
        assert!(matches!(m.set_volume(1.5), Err(Error::IndexSize { .. })));
        assert!(matches!(m.set_playback_rate(0.0), Err(Error::NotSupported { .. })));
        m.set_volume(0.25).unwrap();
        m.set_playback_rate(2.0).unwrap();
        assert_eq!(m.volume(), 0.25);
        assert_eq!(m.playback_rate(), 2.0);
    }

    #[test]
    fn advance_respects_rate_and_ends_at_duration() {
        let m = SimulatedMedia::with_duration(10.0);
        m.advance(1.0);
        assert_eq!(m.current_time(), 0.0, "paused element must not move");
        m.set_playback_rate(2.0).unwrap();
        m.play().unwrap();
        m.advance(2.0);
        assert_eq!(m.current_time(), 4.0);
        let seen = record(&m);
        m.advance(10.0);
        assert_eq!(m.current_time(), 10.0);
        assert!(m.paused());
        assert!(m.ended());
        assert_eq!(
            *seen.lock().unwrap(),
            vec![MediaEventKind::TimeUpdate, MediaEventKind::Pause, MediaEventKind::Ended]
        );
        m.play().unwrap();
        assert_eq!(m.current_time(), 0.0);
    }

    #[test]
    fn handlers_see_state_after_change() {
        let m = SimulatedMedia::new();
        let paused = Arc::new(Mutex::new(None));
        let p = paused.clone();
        m.subscribe(MediaEventKind::Play, Box::new(move |e: &MediaEvent| *p.lock().unwrap() = Some(e.state.paused)));
        m.play().unwrap();
        assert_eq!(*paused.lock().unwrap(), Some(false));
    }
}
