//! Front-panel button input dispatch.
//!
//! Raw button-down/button-up events plus periodic hold-duration sampling
//! become discrete [`Command`]s. A hold record exists only while a button
//! is physically held; long-press transitions fire *during* the hold (from
//! [`InputDispatcher::check_long_presses`]) and mark the contributing
//! records handled so the release does not double-dispatch the short-press
//! action.

use core::time::Duration;

use crate::time::InstantLike;

/// Hold durations below this dispatch the short-press action on release.
pub const SHORT_PRESS_LIMIT: Duration = Duration::from_millis(1000);

/// Continuous hold durations at or above this fire a long-press transition.
pub const LONG_PRESS_HOLD: Duration = Duration::from_secs(3);

/// The four physical front-panel keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Level key: switches between access levels.
    Level,
    /// Mode key: cycles through the current level's menu.
    Mode,
    /// Up key: increments the selected item.
    Up,
    /// Down key: decrements the selected item.
    Down,
}

const BUTTON_COUNT: usize = 4;

/// Adjustment direction carried by the up/down keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Increment.
    Up,
    /// Decrement.
    Down,
}

impl Direction {
    /// Returns `+1.0` for [`Direction::Up`], `-1.0` for [`Direction::Down`].
    pub fn sign(self) -> f64 {
        match self {
            Direction::Up => 1.0,
            Direction::Down => -1.0,
        }
    }

    /// Returns true for [`Direction::Up`].
    pub fn is_up(self) -> bool {
        self == Direction::Up
    }
}

/// A discrete navigation or adjustment command decoded from button input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Short press of the level key: cycle operation/adjustment, or return
    /// to operation from the deeper levels.
    NavigateLevel,
    /// Short press of the mode key: advance the menu selection.
    NextItem,
    /// Short press of up/down: adjust the selected item.
    Adjust(Direction),
    /// Solo long press of the level key: enter the initial-setting level.
    EnterInitial,
    /// Joint long press of level + mode: enter the protection level.
    EnterProtection,
}

#[derive(Debug, Clone, Copy)]
struct HoldRecord<I> {
    pressed_at: I,
    handled: bool,
}

/// Decodes button events into [`Command`]s.
///
/// At most one hold record exists per physical button; duplicate down
/// events are ignored. [`check_long_presses`](Self::check_long_presses)
/// must be polled while buttons are held — every facade tick does so.
#[derive(Debug)]
pub struct InputDispatcher<I: InstantLike> {
    holds: [Option<HoldRecord<I>>; BUTTON_COUNT],
}

impl<I: InstantLike> Default for InputDispatcher<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: InstantLike> InputDispatcher<I> {
    /// Creates a dispatcher with no buttons held.
    pub fn new() -> Self {
        Self {
            holds: [None; BUTTON_COUNT],
        }
    }

    /// Records a button press. A second down event for a button already
    /// held is ignored.
    pub fn on_button_down(&mut self, button: Button, now: I) {
        let slot = &mut self.holds[button as usize];
        if slot.is_none() {
            *slot = Some(HoldRecord {
                pressed_at: now,
                handled: false,
            });
        }
    }

    /// Records a button release, dispatching the short-press command when
    /// the hold stayed under [`SHORT_PRESS_LIMIT`] and no long-press rule
    /// already consumed it. The hold record is destroyed either way.
    pub fn on_button_up(&mut self, button: Button, now: I) -> Option<Command> {
        let record = self.holds[button as usize].take()?;
        if record.handled || now.duration_since(record.pressed_at) >= SHORT_PRESS_LIMIT {
            return None;
        }
        Some(match button {
            Button::Level => Command::NavigateLevel,
            Button::Mode => Command::NextItem,
            Button::Up => Command::Adjust(Direction::Up),
            Button::Down => Command::Adjust(Direction::Down),
        })
    }

    /// Samples the held buttons against [`LONG_PRESS_HOLD`].
    ///
    /// The joint level+mode check takes precedence over the solo level
    /// check; the joint hold duration is the minimum of the two individual
    /// holds. Fired rules mark their contributing records handled.
    pub fn check_long_presses(&mut self, now: I) -> Option<Command> {
        let level = Button::Level as usize;
        let mode = Button::Mode as usize;

        let joint = match (&self.holds[level], &self.holds[mode]) {
            (Some(l), Some(m)) => {
                let held = now
                    .duration_since(l.pressed_at)
                    .min(now.duration_since(m.pressed_at));
                held >= LONG_PRESS_HOLD && !(l.handled && m.handled)
            }
            _ => false,
        };
        if joint {
            for slot in [level, mode] {
                if let Some(record) = self.holds[slot].as_mut() {
                    record.handled = true;
                }
            }
            return Some(Command::EnterProtection);
        }

        let solo = match &self.holds[level] {
            Some(l) if self.holds[mode].is_none() => {
                !l.handled && now.duration_since(l.pressed_at) >= LONG_PRESS_HOLD
            }
            _ => false,
        };
        if solo {
            if let Some(record) = self.holds[level].as_mut() {
                record.handled = true;
            }
            return Some(Command::EnterInitial);
        }
        None
    }

    /// Returns whether the given button is currently held.
    pub fn is_held(&self, button: Button) -> bool {
        self.holds[button as usize].is_some()
    }
}
