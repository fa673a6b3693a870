//! The temperature controller: ON/OFF, proportional-band PID, and
//! relay-feedback autotuning.
//!
//! One [`Controller::tick`] runs per control period. Fail-safe conditions
//! (stopped control or a disconnected sensor) override every mode, force
//! the output to zero, and reset the integral accumulator so regulation
//! resumes cleanly.

use core::f64::consts::PI;
use core::time::Duration;

use log::{info, warn};

use crate::params::{AutotuneSetting, ControlMethod, ControlParams};
use crate::process::ProcessState;
use crate::time::InstantLike;

/// Fixed duration of a relay autotune session, in simulated time.
pub const AUTOTUNE_DURATION: Duration = Duration::from_secs(20);

/// Anti-windup bound on the integral accumulator.
const INTEGRAL_LIMIT: f64 = 100.0;

/// Errors smaller than this do not accumulate, preventing integral creep
/// while hovering at the setpoint.
const INTEGRAL_DEADBAND: f64 = 0.1;

/// The relay swings MV across 0..100, i.e. ±50 about its midpoint.
const RELAY_AMPLITUDE: f64 = 50.0;

// Installed when a session times out without a measurable oscillation
// (e.g. the plant never crossed the setpoint within the window).
const FALLBACK_BAND: f64 = 8.0;
const FALLBACK_INTEGRAL: f64 = 233.0;
const FALLBACK_DERIVATIVE: f64 = 40.0;

/// The controller's effective mode for a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    /// Fail-safe: output forced to zero.
    Stopped,
    /// Relay autotune session in progress.
    Autotune,
    /// Proportional-band PID regulation.
    Pid,
    /// ON/OFF regulation with hysteresis.
    OnOff,
}

/// A running relay-feedback identification session.
///
/// While active the relay oscillates MV at full swing around the
/// setpoint. Switch-on instants and the PV envelope are recorded so the
/// ultimate gain and period can be estimated when the session times out.
#[derive(Debug)]
struct AutotuneSession<I> {
    started_at: I,
    relay_on: bool,
    last_switch_on: Option<I>,
    periods: Vec<f64>,
    pv_min: f64,
    pv_max: f64,
}

impl<I: InstantLike> AutotuneSession<I> {
    fn new(now: I, pv: f64) -> Self {
        Self {
            started_at: now,
            relay_on: false,
            last_switch_on: None,
            periods: Vec::new(),
            pv_min: pv,
            pv_max: pv,
        }
    }

    fn relay_step(&mut self, state: &mut ProcessState, now: I) {
        let on = state.pv < state.sv;
        if on && !self.relay_on {
            if let Some(previous) = self.last_switch_on {
                self.periods.push(now.duration_since(previous).as_secs_f64());
            }
            self.last_switch_on = Some(now);
        }
        self.relay_on = on;
        state.mv = if on { 100.0 } else { 0.0 };
        self.pv_min = self.pv_min.min(state.pv);
        self.pv_max = self.pv_max.max(state.pv);
    }

    /// Åström–Hägglund estimate from the recorded oscillation, or `None`
    /// when fewer than two full relay cycles were observed.
    fn identify(&self) -> Option<(f64, f64, f64)> {
        let amplitude = (self.pv_max - self.pv_min) / 2.0;
        if self.periods.len() < 2 || amplitude <= INTEGRAL_DEADBAND {
            return None;
        }
        let tu = self.periods.iter().sum::<f64>() / self.periods.len() as f64;
        let ku = 4.0 * RELAY_AMPLITUDE / (PI * amplitude);
        // Ziegler–Nichols, expressed for a proportional-band controller:
        // Kp = 0.6 Ku becomes band = 100 / (0.6 Ku).
        let band = (100.0 / (0.6 * ku)).max(0.1);
        let integral = (0.5 * tu).round().max(1.0);
        let derivative = (0.125 * tu).round().max(1.0);
        Some((band, integral, derivative))
    }
}

/// Computes MV from PV, SV, and the parameter store once per control
/// period.
#[derive(Debug)]
pub struct Controller<I: InstantLike> {
    period: Duration,
    integral_sum: f64,
    last_pv: Option<f64>,
    session: Option<AutotuneSession<I>>,
    forced_off: bool,
}

impl<I: InstantLike> Controller<I> {
    /// Creates a controller running at the given control period.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            integral_sum: 0.0,
            last_pv: None,
            session: None,
            forced_off: false,
        }
    }

    /// Returns the configured control period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns the current integral accumulator, always within ±100.
    pub fn integral_sum(&self) -> f64 {
        self.integral_sum
    }

    /// Whether a relay autotune session is in progress.
    pub fn autotune_active(&self) -> bool {
        self.session.is_some()
    }

    /// Runs one control cycle.
    ///
    /// `sensor_ok` and `stop` carry the fail-safe inputs; either one
    /// forces `mv = 0`, resets the integral accumulator, and cancels any
    /// running autotune session on this very tick.
    pub fn tick(
        &mut self,
        state: &mut ProcessState,
        params: &mut ControlParams,
        sensor_ok: bool,
        stop: bool,
        now: I,
    ) {
        if !sensor_ok || stop {
            if !self.forced_off {
                warn!(
                    "control output forced off ({})",
                    if stop { "stop" } else { "sensor fault" }
                );
                self.forced_off = true;
            }
            state.mv = 0.0;
            self.integral_sum = 0.0;
            if self.session.take().is_some() {
                params.cancel_autotune();
                info!("autotune cancelled by fail-safe");
            }
            return;
        }
        self.forced_off = false;

        // Keep the relay session in step with the `at` parameter.
        match (params.autotune(), self.session.is_some()) {
            (AutotuneSetting::At2, false) => {
                self.session = Some(AutotuneSession::new(now, state.pv));
                info!("autotune started (sv = {:.1})", state.sv);
            }
            (AutotuneSetting::Off, true) => {
                self.session = None;
                info!("autotune cancelled");
            }
            _ => {}
        }

        if let Some(mut session) = self.session.take() {
            if now.duration_since(session.started_at) < AUTOTUNE_DURATION {
                session.relay_step(state, now);
                self.session = Some(session);
                self.last_pv = Some(state.pv);
                return;
            }
            self.finish_autotune(&session, params);
            // Fall through and regulate with the fresh constants.
        }

        match params.control_method() {
            ControlMethod::OnOff => self.on_off_step(state, params),
            ControlMethod::Pid => self.pid_step(state, params),
        }
        self.last_pv = Some(state.pv);
    }

    fn finish_autotune(&mut self, session: &AutotuneSession<I>, params: &mut ControlParams) {
        let (band, integral, derivative) = session.identify().unwrap_or((
            FALLBACK_BAND,
            FALLBACK_INTEGRAL,
            FALLBACK_DERIVATIVE,
        ));
        params.install_autotune_result(band, integral, derivative);
        self.integral_sum = 0.0;
        info!(
            "autotune finished: p = {:.1}, i = {:.0}, d = {:.0}",
            params.band(),
            params.integral(),
            params.derivative()
        );
    }

    fn on_off_step(&mut self, state: &mut ProcessState, params: &ControlParams) {
        let diff = state.pv - state.sv;
        if diff < -params.hysteresis() {
            state.mv = 100.0;
        } else if diff > 0.0 {
            state.mv = 0.0;
        }
        // Inside the dead zone the previous output stands.
    }

    fn pid_step(&mut self, state: &mut ProcessState, params: &ControlParams) {
        let error = state.sv - state.pv;

        // Halving the accumulator on a setpoint crossing damps the
        // overshoot that built it up. Runs before accumulation.
        if let Some(last) = self.last_pv {
            let crossed = (last < state.sv && state.pv >= state.sv)
                || (last > state.sv && state.pv <= state.sv);
            if crossed {
                self.integral_sum *= 0.5;
            }
        }

        if error.abs() > INTEGRAL_DEADBAND {
            self.integral_sum += error / params.integral();
        }
        self.integral_sum = self.integral_sum.clamp(-INTEGRAL_LIMIT, INTEGRAL_LIMIT);

        let gain = 100.0 / params.band();
        // Derivative on measurement, so setpoint steps do not spike D.
        let derivative = match self.last_pv {
            Some(last) => {
                gain * params.derivative() * (last - state.pv) / self.period.as_secs_f64()
            }
            None => 0.0,
        };

        state.mv = (gain * error + self.integral_sum + derivative).clamp(0.0, 100.0);
    }
}
