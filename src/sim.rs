//! The simulator facade: owns every component and schedules the three
//! cooperative tick cadences (physics, control, input polling) from a
//! single host-driven [`PanelSim::tick`].

use core::time::Duration;

use log::debug;
use rand::Rng;
use thiserror::Error;

use crate::control::{ControlMode, Controller};
use crate::input::{Button, Command, Direction, InputDispatcher};
use crate::panel::{Level, MenuItem, Panel};
use crate::params::ControlParams;
use crate::process::{PhysicsConfig, ProcessModel, ProcessState, SensorStatus};
use crate::process::{ConfigError, PV_MAX, PV_MIN};
use crate::time::InstantLike;

/// Setpoint change per up/down press in the operation level, in °C.
pub const SETPOINT_STEP: f64 = 1.0;

/// The error type for rejected tick cadences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimOptionsError {
    /// The physics period must be nonzero.
    #[error("physics period must be nonzero")]
    InvalidPhysicsPeriod,
    /// The control period must be nonzero and no shorter than the
    /// physics period.
    #[error("control period must be nonzero and at least the physics period")]
    InvalidControlPeriod,
}

/// Tick cadences for the simulator.
///
/// Control deliberately runs slower than physics to reproduce the
/// sampling-time behavior of the real instrument; the constructor
/// rejects any other ordering.
#[derive(Debug, Clone, Copy)]
pub struct SimOptions {
    physics_period: Duration,
    control_period: Duration,
}

impl Default for SimOptions {
    fn default() -> Self {
        SimOptions {
            physics_period: Duration::from_millis(100),
            control_period: Duration::from_millis(500),
        }
    }
}

impl SimOptions {
    /// Creates validated tick cadences.
    ///
    /// # Errors
    /// Returns [`SimOptionsError`] if either period is zero or the
    /// control period is shorter than the physics period.
    pub fn new(physics_period: Duration, control_period: Duration) -> Result<Self, SimOptionsError> {
        if physics_period.is_zero() {
            return Err(SimOptionsError::InvalidPhysicsPeriod);
        }
        if control_period.is_zero() || control_period < physics_period {
            return Err(SimOptionsError::InvalidControlPeriod);
        }
        Ok(SimOptions {
            physics_period,
            control_period,
        })
    }

    /// Returns the physics step period.
    pub fn physics_period(&self) -> Duration {
        self.physics_period
    }

    /// Returns the control cycle period.
    pub fn control_period(&self) -> Duration {
        self.control_period
    }
}

/// One complete simulated controller: plant, regulation, parameters, and
/// the front-panel state machine.
///
/// Instantiate as many as needed; there is no process-wide state. All
/// methods are synchronous and bounded — the host drives them from a
/// timer, an event loop, or a plain test loop.
#[derive(Debug)]
pub struct PanelSim<I: InstantLike, R: Rng> {
    state: ProcessState,
    model: ProcessModel<R>,
    params: ControlParams,
    controller: Controller<I>,
    panel: Panel,
    input: InputDispatcher<I>,
    options: SimOptions,
    last_physics: Option<I>,
    last_control: Option<I>,
    physics_advanced: bool,
}

impl<I: InstantLike, R: Rng> PanelSim<I, R> {
    /// Creates a simulator from a plant configuration, tick cadences, and
    /// an injected noise source.
    pub fn new(physics: PhysicsConfig, options: SimOptions, rng: R) -> Self {
        PanelSim {
            state: ProcessState::default(),
            model: ProcessModel::new(physics, rng),
            params: ControlParams::default(),
            controller: Controller::new(options.control_period()),
            panel: Panel::new(),
            input: InputDispatcher::new(),
            options,
            last_physics: None,
            last_control: None,
            physics_advanced: false,
        }
    }

    /// Advances the simulation to `now`.
    ///
    /// Runs every elapsed fixed physics step, then at most one control
    /// cycle — and only once physics has advanced since the previous
    /// control cycle, so control never regulates against a stale PV —
    /// then samples held buttons for long-press transitions. The first
    /// call only anchors the cadences.
    pub fn tick(&mut self, now: I) {
        match self.last_physics {
            None => {
                self.last_physics = Some(now);
                self.last_control = Some(now);
            }
            Some(last) => {
                let period = self.options.physics_period();
                let steps = (now.duration_since(last).as_nanos() / period.as_nanos()) as u32;
                for _ in 0..steps {
                    self.model.advance(&mut self.state, period);
                }
                if steps > 0 {
                    self.last_physics = Some(last + period * steps);
                    self.physics_advanced = true;
                }
            }
        }

        if let Some(last) = self.last_control {
            if self.physics_advanced
                && now.duration_since(last) >= self.options.control_period()
            {
                self.controller.tick(
                    &mut self.state,
                    &mut self.params,
                    self.model.config().sensor_connected(),
                    self.panel.stop_control(),
                    now,
                );
                self.last_control = Some(now);
                self.physics_advanced = false;
            }
        }

        if let Some(command) = self.input.check_long_presses(now) {
            self.apply(command);
        }
    }

    /// Forwards a physical button press to the input dispatcher.
    pub fn on_button_down(&mut self, button: Button, now: I) {
        self.input.on_button_down(button, now);
    }

    /// Forwards a physical button release, applying whatever short-press
    /// command it decodes to.
    pub fn on_button_up(&mut self, button: Button, now: I) {
        if let Some(command) = self.input.on_button_up(button, now) {
            self.apply(command);
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::NavigateLevel => self.panel.navigate(),
            Command::NextItem => self.panel.next_item(),
            Command::EnterInitial => self.panel.enter(Level::Initial),
            Command::EnterProtection => self.panel.enter(Level::Protection),
            Command::Adjust(direction) => match self.panel.selected() {
                MenuItem::PvSv => self.adjust_setpoint(direction),
                MenuItem::Param(key) => {
                    self.params.adjust(key, direction, self.panel.level())
                }
            },
        }
    }

    fn adjust_setpoint(&mut self, direction: Direction) {
        if self.params.locked(self.panel.level()) {
            debug!("setpoint adjustment locked by oapt");
            return;
        }
        self.state.sv = (self.state.sv + direction.sign() * SETPOINT_STEP).clamp(PV_MIN, PV_MAX);
    }

    /// Returns the current process value.
    pub fn pv(&self) -> f64 {
        self.state.pv
    }

    /// Returns the current setpoint.
    pub fn sv(&self) -> f64 {
        self.state.sv
    }

    /// Returns the current controller output in percent.
    pub fn mv(&self) -> f64 {
        self.state.mv
    }

    /// Returns the active front-panel level.
    pub fn level(&self) -> Level {
        self.panel.level()
    }

    /// Whether control output is forced off by the initial-setting level.
    pub fn stop_control(&self) -> bool {
        self.panel.stop_control()
    }

    /// Whether a relay autotune session is in progress.
    pub fn autotune_active(&self) -> bool {
        self.controller.autotune_active()
    }

    /// Whether the `oapt` lock currently blocks front-panel adjustments.
    pub fn locked(&self) -> bool {
        self.params.locked(self.panel.level())
    }

    /// The controller's effective mode right now.
    pub fn control_mode(&self) -> ControlMode {
        if self.panel.stop_control() || !self.model.config().sensor_connected() {
            ControlMode::Stopped
        } else if self.controller.autotune_active() {
            ControlMode::Autotune
        } else {
            match self.params.control_method() {
                crate::params::ControlMethod::Pid => ControlMode::Pid,
                crate::params::ControlMethod::OnOff => ControlMode::OnOff,
            }
        }
    }

    /// Classifies the sensor reading for the display layer.
    pub fn sensor_status(&self) -> SensorStatus {
        self.model.sensor_status(&self.state)
    }

    /// Returns the mnemonic of the selected menu item.
    pub fn selected_code(&self) -> &'static str {
        self.panel.selected().code()
    }

    /// Formats the selected menu item's value the way the panel shows it.
    pub fn selected_display(&self) -> String {
        match self.panel.selected() {
            MenuItem::PvSv => format!("{:.1}", self.state.sv),
            MenuItem::Param(key) => self.params.display_value(key),
        }
    }

    /// Returns the parameter store.
    pub fn params(&self) -> &ControlParams {
        &self.params
    }

    /// Returns the parameter store for host-side mutation. This is the
    /// collaborator API; it is not gated by the front-panel lock.
    pub fn params_mut(&mut self) -> &mut ControlParams {
        &mut self.params
    }

    /// Returns the plant configuration.
    pub fn physics(&self) -> &PhysicsConfig {
        self.model.config()
    }

    /// Returns the plant configuration for host-side mutation.
    pub fn physics_mut(&mut self) -> &mut PhysicsConfig {
        self.model.config_mut()
    }

    /// Sets the ambient temperature the plant relaxes toward.
    ///
    /// # Errors
    /// Rejects non-finite values, leaving the configuration unchanged.
    pub fn set_ambient_temp(&mut self, temp: f64) -> Result<(), ConfigError> {
        self.model.config_mut().set_ambient_temp(temp)
    }

    /// Sets the plant cooling rate.
    ///
    /// # Errors
    /// Rejects negative or non-finite values.
    pub fn set_cooling_rate(&mut self, rate: f64) -> Result<(), ConfigError> {
        self.model.config_mut().set_cooling_rate(rate)
    }

    /// Sets the host-supplied external heat contribution (the abstracted
    /// ambient-volume input).
    ///
    /// # Errors
    /// Rejects negative or non-finite values.
    pub fn set_external_heat_input(&mut self, input: f64) -> Result<(), ConfigError> {
        self.model.config_mut().set_external_heat_input(input)
    }

    /// Attaches or detaches the temperature sensor. Detaching fails safe
    /// on the next control cycle.
    pub fn set_sensor_connected(&mut self, connected: bool) {
        self.model.config_mut().set_sensor_connected(connected);
    }

    /// Sets the setpoint directly, clamped to the PV range.
    ///
    /// This models the host collaborator, not a front-panel key, so the
    /// `oapt` lock does not apply here.
    pub fn set_setpoint(&mut self, sv: f64) {
        if sv.is_finite() {
            self.state.sv = sv.clamp(PV_MIN, PV_MAX);
        }
    }
}
