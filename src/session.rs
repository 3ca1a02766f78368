//! Scripted sessions: a tiny action language for driving a simulated player
//! from the command line or from tests.
//!
//! Each token is `name` or `name:arg[:arg]`, for example `toggle`,
//! `volume:0.5`, `drag:100:300` or `tick:2.5`.

use crate::platform::{ControlTarget, RangeProperty};
use crate::{ControlSnapshot, Error, Player, Result, SimulatedMedia};
use log::debug;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Click the play/pause toggle
    Toggle,
    /// Click the video surface
    Video,
    /// Click the skip button at this index
    Skip(usize),
    Volume(f64),
    Rate(f64),
    /// Click the progress track at this offset
    Scrub(f64),
    /// Press, move and release on the progress track
    Drag(f64, f64),
    /// Let playback run for this many seconds
    Tick(f64),
    /// Metadata arrives with this duration
    Metadata(f64),
}

fn number(token: &str, raw: Option<&str>) -> Result<f64> {
    let raw = raw.ok_or_else(|| Error::ScriptError(format!("'{}' needs an argument", token)))?;
    let v: f64 = raw
        .parse()
        .map_err(|_| Error::ScriptError(format!("'{}' is not a number in '{}'", raw, token)))?;
    if !v.is_finite() {
        return Err(Error::ScriptError(format!("'{}' is not finite in '{}'", raw, token)));
    }
    Ok(v)
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self> {
        let mut parts = token.split(':');
        let name = parts.next().unwrap_or_default();
        let a1 = parts.next();
        let a2 = parts.next();
        if parts.next().is_some() {
            return Err(Error::ScriptError(format!("too many arguments in '{}'", token)));
        }
        let action = match name {
            "toggle" => Action::Toggle,
            "video" => Action::Video,
            "skip" => {
                let raw = a1.ok_or_else(|| Error::ScriptError(format!("'{}' needs a button index", token)))?;
                let idx = raw
                    .parse()
                    .map_err(|_| Error::ScriptError(format!("'{}' is not a button index", raw)))?;
                Action::Skip(idx)
            }
            "volume" => Action::Volume(number(token, a1)?),
            "rate" => Action::Rate(number(token, a1)?),
            "scrub" => Action::Scrub(number(token, a1)?),
            "drag" => Action::Drag(number(token, a1)?, number(token, a2)?),
            "tick" => Action::Tick(number(token, a1)?),
            "metadata" => Action::Metadata(number(token, a1)?),
            other => return Err(Error::ScriptError(format!("unknown action '{}'", other))),
        };
        let takes_two = matches!(action, Action::Drag(..));
        if a2.is_some() && !takes_two {
            return Err(Error::ScriptError(format!("too many arguments in '{}'", token)));
        }
        Ok(action)
    }
}

/// Parse a whole script, stopping at the first bad token
pub fn parse_script<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Action>> {
    tokens.iter().map(|t| t.as_ref().parse()).collect()
}

impl Player<SimulatedMedia> {
    /// Perform one scripted action against the player
    pub fn apply(&self, action: &Action) -> Result<()> {
        debug!("apply {:?}", action);
        match *action {
            Action::Toggle => self.click_toggle(),
            Action::Video => self.input().click(ControlTarget::Video),
            Action::Skip(i) => self.click_skip(i),
            Action::Volume(v) => self.set_slider(RangeProperty::Volume, v),
            Action::Rate(v) => self.set_slider(RangeProperty::PlaybackRate, v),
            Action::Scrub(x) => self.scrub_at(x),
            Action::Drag(from, to) => self.drag(from, to),
            Action::Tick(secs) => self.media().advance(secs),
            Action::Metadata(d) => self.media().load_metadata(d)?,
        }
        Ok(())
    }

    /// Run `actions` in order, returning the snapshot after each one
    pub fn run(&self, actions: &[Action]) -> Result<Vec<ControlSnapshot>> {
        let mut out = Vec::with_capacity(actions.len());
        for a in actions {
            self.apply(a)?;
            out.push(self.snapshot());
        }
        Ok(out)
    }
}
