//! The control parameter store.
//!
//! Eight named front-panel parameters with heterogeneous semantics: three
//! toggled enums, four floored numerics, and the clamped protection code.
//! Adjustment goes through [`ControlParams::adjust`], which applies the
//! per-parameter stepping rules and the `oapt` write-protection lock.
//! Typed setters validate host-supplied values the same way the physics
//! configuration does: a rejected value leaves the store unchanged.

use log::debug;
use thiserror::Error;

use crate::input::Direction;
use crate::panel::Level;

/// Every numeric parameter lands at or above this after any adjustment.
pub const NUMERIC_FLOOR: f64 = 0.1;

/// The `oapt` value that locks out parameter writes everywhere but the
/// protection level.
pub const PROTECT_LOCK: u8 = 3;

const PROTECT_MAX: u8 = 3;

/// Names the front-panel parameters. [`code`](Self::code) yields the
/// mnemonic the panel displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKey {
    /// `at` — autotune execute/cancel.
    Autotune,
    /// `p` — proportional band, °C. Larger means a gentler response.
    Band,
    /// `i` — integral time, seconds.
    Integral,
    /// `d` — derivative time, seconds.
    Derivative,
    /// `hys` — ON/OFF hysteresis, °C.
    Hysteresis,
    /// `in-t` — sensor input type code.
    InputType,
    /// `cntl` — control method, PID or ON/OFF.
    ControlMethod,
    /// `oapt` — operation protection lock code.
    OperationProtect,
}

impl ParamKey {
    /// Returns the device mnemonic for this parameter.
    pub fn code(self) -> &'static str {
        match self {
            ParamKey::Autotune => "at",
            ParamKey::Band => "p",
            ParamKey::Integral => "i",
            ParamKey::Derivative => "d",
            ParamKey::Hysteresis => "hys",
            ParamKey::InputType => "in-t",
            ParamKey::ControlMethod => "cntl",
            ParamKey::OperationProtect => "oapt",
        }
    }
}

/// Setting of the `at` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutotuneSetting {
    /// Autotune off.
    Off,
    /// 100% relay-limit autotune running.
    At2,
}

impl AutotuneSetting {
    /// Returns the display code for this setting.
    pub fn code(self) -> &'static str {
        match self {
            AutotuneSetting::Off => "off",
            AutotuneSetting::At2 => "at-2",
        }
    }
}

/// Sensor input type selected by `in-t`. Only the two codes the panel
/// supports; the simulated plant behaves identically under either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorInput {
    /// Input type code 5.
    Type5,
    /// Input type code 6.
    Type6,
}

impl SensorInput {
    /// Returns the numeric input-type code.
    pub fn code(self) -> u8 {
        match self {
            SensorInput::Type5 => 5,
            SensorInput::Type6 => 6,
        }
    }

    fn toggled(self) -> Self {
        match self {
            SensorInput::Type5 => SensorInput::Type6,
            SensorInput::Type6 => SensorInput::Type5,
        }
    }
}

/// Control method selected by `cntl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMethod {
    /// Two-degree PID regulation.
    Pid,
    /// ON/OFF regulation with hysteresis.
    OnOff,
}

impl ControlMethod {
    /// Returns the display code for this method.
    pub fn code(self) -> &'static str {
        match self {
            ControlMethod::Pid => "pid",
            ControlMethod::OnOff => "onof",
        }
    }
}

/// The error type for rejected parameter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParamError {
    /// Proportional band must be finite and at least 0.1.
    #[error("proportional band must be finite and at least 0.1")]
    InvalidBand,
    /// Integral time must be finite and at least 0.1.
    #[error("integral time must be finite and at least 0.1")]
    InvalidIntegralTime,
    /// Derivative time must be finite and non-negative.
    #[error("derivative time must be finite and non-negative")]
    InvalidDerivativeTime,
    /// Hysteresis must be finite and at least 0.1.
    #[error("hysteresis must be finite and at least 0.1")]
    InvalidHysteresis,
    /// Protection code must be at most 3.
    #[error("protection code must be at most 3")]
    InvalidProtectCode,
}

/// The named control parameters and their update rules.
#[derive(Debug, Clone)]
pub struct ControlParams {
    autotune: AutotuneSetting,
    band: f64,
    integral: f64,
    derivative: f64,
    hysteresis: f64,
    input_type: SensorInput,
    control_method: ControlMethod,
    protect: u8,
}

impl Default for ControlParams {
    fn default() -> Self {
        ControlParams {
            autotune: AutotuneSetting::Off,
            band: 8.0,
            integral: 233.0,
            derivative: 40.0,
            hysteresis: 1.0,
            input_type: SensorInput::Type5,
            control_method: ControlMethod::Pid,
            protect: 0,
        }
    }
}

impl ControlParams {
    /// Returns the autotune setting.
    pub fn autotune(&self) -> AutotuneSetting {
        self.autotune
    }

    /// Returns the proportional band in °C.
    pub fn band(&self) -> f64 {
        self.band
    }

    /// Returns the integral time in seconds.
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// Returns the derivative time in seconds.
    pub fn derivative(&self) -> f64 {
        self.derivative
    }

    /// Returns the ON/OFF hysteresis in °C.
    pub fn hysteresis(&self) -> f64 {
        self.hysteresis
    }

    /// Returns the sensor input type.
    pub fn input_type(&self) -> SensorInput {
        self.input_type
    }

    /// Returns the control method.
    pub fn control_method(&self) -> ControlMethod {
        self.control_method
    }

    /// Returns the `oapt` protection code.
    pub fn protect(&self) -> u8 {
        self.protect
    }

    /// Whether parameter writes are locked out at the given level.
    pub fn locked(&self, level: Level) -> bool {
        self.protect == PROTECT_LOCK && level != Level::Protection
    }

    /// Sets the proportional band.
    ///
    /// # Errors
    /// Returns [`ParamError::InvalidBand`] unless the value is finite and
    /// at least [`NUMERIC_FLOOR`].
    pub fn set_band(&mut self, band: f64) -> Result<(), ParamError> {
        if !band.is_finite() || band < NUMERIC_FLOOR {
            return Err(ParamError::InvalidBand);
        }
        self.band = band;
        Ok(())
    }

    /// Sets the integral time.
    ///
    /// # Errors
    /// Returns [`ParamError::InvalidIntegralTime`] unless the value is
    /// finite and at least [`NUMERIC_FLOOR`].
    pub fn set_integral(&mut self, integral: f64) -> Result<(), ParamError> {
        if !integral.is_finite() || integral < NUMERIC_FLOOR {
            return Err(ParamError::InvalidIntegralTime);
        }
        self.integral = integral;
        Ok(())
    }

    /// Sets the derivative time. Zero disables the derivative term.
    ///
    /// # Errors
    /// Returns [`ParamError::InvalidDerivativeTime`] unless the value is
    /// finite and non-negative.
    pub fn set_derivative(&mut self, derivative: f64) -> Result<(), ParamError> {
        if !derivative.is_finite() || derivative < 0.0 {
            return Err(ParamError::InvalidDerivativeTime);
        }
        self.derivative = derivative;
        Ok(())
    }

    /// Sets the ON/OFF hysteresis.
    ///
    /// # Errors
    /// Returns [`ParamError::InvalidHysteresis`] unless the value is
    /// finite and at least [`NUMERIC_FLOOR`].
    pub fn set_hysteresis(&mut self, hysteresis: f64) -> Result<(), ParamError> {
        if !hysteresis.is_finite() || hysteresis < NUMERIC_FLOOR {
            return Err(ParamError::InvalidHysteresis);
        }
        self.hysteresis = hysteresis;
        Ok(())
    }

    /// Sets the `oapt` protection code.
    ///
    /// # Errors
    /// Returns [`ParamError::InvalidProtectCode`] for codes above 3.
    pub fn set_protect(&mut self, protect: u8) -> Result<(), ParamError> {
        if protect > PROTECT_MAX {
            return Err(ParamError::InvalidProtectCode);
        }
        self.protect = protect;
        Ok(())
    }

    /// Sets the sensor input type.
    pub fn set_input_type(&mut self, input_type: SensorInput) {
        self.input_type = input_type;
    }

    /// Sets the control method.
    pub fn set_control_method(&mut self, method: ControlMethod) {
        self.control_method = method;
    }

    /// Steps the named parameter one increment in the given direction,
    /// applying the per-parameter rules from the front panel:
    ///
    /// - `at` and `cntl` switch on direction rather than stepping;
    /// - `in-t` toggles between its two codes;
    /// - `oapt` steps within 0..=3;
    /// - the numeric parameters step by 0.1 (`p`, `hys`) or 1 (`i`, `d`)
    ///   and floor at [`NUMERIC_FLOOR`].
    ///
    /// With `oapt` at [`PROTECT_LOCK`] and the panel outside the
    /// protection level the adjustment is silently ignored.
    pub fn adjust(&mut self, key: ParamKey, direction: Direction, level: Level) {
        if self.locked(level) {
            debug!("adjustment of {} locked by oapt", key.code());
            return;
        }
        match key {
            ParamKey::Autotune => {
                self.autotune = if direction.is_up() {
                    AutotuneSetting::At2
                } else {
                    AutotuneSetting::Off
                };
            }
            ParamKey::ControlMethod => {
                self.control_method = if direction.is_up() {
                    ControlMethod::Pid
                } else {
                    ControlMethod::OnOff
                };
            }
            ParamKey::InputType => self.input_type = self.input_type.toggled(),
            ParamKey::OperationProtect => {
                self.protect = if direction.is_up() {
                    (self.protect + 1).min(PROTECT_MAX)
                } else {
                    self.protect.saturating_sub(1)
                };
            }
            ParamKey::Band => self.band = stepped(self.band, 0.1, direction),
            ParamKey::Hysteresis => self.hysteresis = stepped(self.hysteresis, 0.1, direction),
            ParamKey::Integral => self.integral = stepped(self.integral, 1.0, direction),
            ParamKey::Derivative => self.derivative = stepped(self.derivative, 1.0, direction),
        }
    }

    /// Formats the named parameter's value the way the panel shows it.
    pub fn display_value(&self, key: ParamKey) -> String {
        match key {
            ParamKey::Autotune => self.autotune.code().to_string(),
            ParamKey::Band => format!("{:.1}", self.band),
            ParamKey::Integral => format_whole(self.integral),
            ParamKey::Derivative => format_whole(self.derivative),
            ParamKey::Hysteresis => format!("{:.1}", self.hysteresis),
            ParamKey::InputType => self.input_type.code().to_string(),
            ParamKey::ControlMethod => self.control_method.code().to_string(),
            ParamKey::OperationProtect => self.protect.to_string(),
        }
    }

    /// Reverts `at` to off without touching anything else; the controller
    /// calls this when a session is cancelled.
    pub(crate) fn cancel_autotune(&mut self) {
        self.autotune = AutotuneSetting::Off;
    }

    /// Installs an identified tuning set at the end of an autotune
    /// session. Leaves the store in PID mode with `at` off; the caller
    /// guarantees the values are positive.
    pub(crate) fn install_autotune_result(&mut self, band: f64, integral: f64, derivative: f64) {
        self.autotune = AutotuneSetting::Off;
        self.control_method = ControlMethod::Pid;
        self.band = band.max(NUMERIC_FLOOR);
        self.integral = integral.max(NUMERIC_FLOOR);
        self.derivative = derivative.max(NUMERIC_FLOOR);
    }
}

fn stepped(value: f64, step: f64, direction: Direction) -> f64 {
    (value + direction.sign() * step).max(NUMERIC_FLOOR)
}

fn format_whole(value: f64) -> String {
    if value == value.trunc() {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}
