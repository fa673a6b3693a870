#![warn(missing_docs)]

//! # Panel-mount Temperature Controller Simulator
//!
//! This library simulates the control logic of an industrial PID
//! temperature controller in Rust: PV/SV regulation, ON/OFF and
//! proportional-band PID control, relay-feedback autotuning, and the
//! four-level front-panel menu (operation, adjustment, initial setting,
//! protection) navigated by short, long, and joint-long button presses.
//!
//! ## Features
//!
//! - Respects the behavior of the real instrument class:
//!   - Proportional *band* PID with integral deadband, anti-windup
//!     clamping, setpoint-crossing damping, and derivative on measurement.
//!   - ON/OFF regulation with a hysteresis dead zone.
//!   - Relay autotune that always terminates after its fixed window and
//!     always leaves valid PID constants behind.
//!   - Fail-safe output on sensor fault or while in the initial-setting
//!     level, and the `oapt` write-protection lock.
//!
//! - Explicit support for **deterministic simulation**:
//!   - Injectable clock ([`time::InstantLike`]) and noise source, so every
//!     run is reproducible under test.
//!   - Three independently-clocked cadences (physics, control, input
//!     polling) driven from one synchronous, non-blocking `tick`.
//!
//! ## Usage
//!
//! Drive the simulator from any loop that can produce timestamps. Button
//! events arrive through `on_button_down`/`on_button_up`; everything else
//! happens inside `tick`.
//!
//! ```rust
//! use rand::{rngs::SmallRng, SeedableRng};
//! use thermopanel::input::Button;
//! use thermopanel::process::PhysicsConfig;
//! use thermopanel::sim::{PanelSim, SimOptions};
//! use thermopanel::time::Millis;
//!
//! let mut sim = PanelSim::new(
//!     PhysicsConfig::default(),
//!     SimOptions::default(),
//!     SmallRng::seed_from_u64(7),
//! );
//!
//! // A short press of the up key raises the setpoint by one degree.
//! sim.on_button_down(Button::Up, Millis(0));
//! sim.on_button_up(Button::Up, Millis(120));
//! assert_eq!(sim.sv(), 1.0);
//!
//! for t in (0..=5_000).step_by(100) {
//!     sim.tick(Millis(t));
//! }
//! assert!((0.0..=100.0).contains(&sim.mv()));
//! ```
//!
//! ### Level navigation
//!
//! Long presses are detected *while* the key is held, from the polling
//! inside `tick`, and the release is then suppressed:
//!
//! ```rust
//! use rand::{rngs::SmallRng, SeedableRng};
//! use thermopanel::input::Button;
//! use thermopanel::panel::Level;
//! use thermopanel::process::PhysicsConfig;
//! use thermopanel::sim::{PanelSim, SimOptions};
//! use thermopanel::time::Millis;
//!
//! let mut sim = PanelSim::new(
//!     PhysicsConfig::default(),
//!     SimOptions::default(),
//!     SmallRng::seed_from_u64(7),
//! );
//!
//! sim.on_button_down(Button::Level, Millis(0));
//! for t in (0..=3_200).step_by(100) {
//!     sim.tick(Millis(t));
//! }
//! sim.on_button_up(Button::Level, Millis(3_300));
//!
//! assert_eq!(sim.level(), Level::Initial);
//! assert!(sim.stop_control());
//! ```
//!
//! ### Plugging in your instant type
//!
//! Hosts running off a real clock use [`time::StdInstant`]; anything else
//! implements [`time::InstantLike`] the same way:
//!
//! ```rust
//! use thermopanel::time::{InstantLike, StdInstant};
//!
//! let start = StdInstant::now();
//! let elapsed = StdInstant::now().duration_since(start);
//! assert!(elapsed.as_secs() < 1);
//! ```

/// The controller: ON/OFF, PID, and relay autotuning.
pub mod control;

/// Button input decoding with short/long/joint-press semantics.
pub mod input;

/// The four-level front-panel menu state machine.
pub mod panel;

/// The named control parameters and their update rules.
pub mod params;

/// The thermal plant producing the process value.
pub mod process;

/// The simulator facade tying every component together.
pub mod sim;

/// Time-related utilities supporting injectable clocks.
pub mod time;

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
