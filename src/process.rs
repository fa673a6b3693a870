//! Thermal plant simulation producing the process value (PV).
//!
//! The plant is a lumped first-order model: heat flows in from the heater
//! (proportional to MV) and from an external contribution supplied by the
//! host, and leaks out toward ambient. A small injected-RNG perturbation
//! emulates sensor noise. Physics never fails, it only saturates; abnormal
//! conditions surface through [`SensorStatus`] for the display layer.

use core::time::Duration;

use rand::Rng;
use thiserror::Error;

/// Lower saturation bound for PV and SV, in degrees Celsius.
pub const PV_MIN: f64 = -200.0;

/// Upper saturation bound for PV and SV, in degrees Celsius.
pub const PV_MAX: f64 = 1300.0;

/// The measured/target/output triple the whole simulator revolves around.
///
/// `pv` and `sv` stay within [`PV_MIN`]..=[`PV_MAX`]; `mv` stays within
/// 0..=100. The [`PanelSim`](crate::sim::PanelSim) facade owns the one
/// live instance and upholds those invariants through the physics and
/// control tick paths.
#[derive(Debug, Clone, Copy)]
pub struct ProcessState {
    /// Process value: the simulated temperature the sensor reports.
    pub pv: f64,
    /// Setpoint value: the target temperature.
    pub sv: f64,
    /// Manipulated value: controller output driving the heater, in percent.
    pub mv: f64,
}

impl ProcessState {
    /// Creates a state with the given process value and setpoint, both
    /// clamped to the representable range, and zero heater output.
    pub fn new(pv: f64, sv: f64) -> Self {
        Self {
            pv: pv.clamp(PV_MIN, PV_MAX),
            sv: sv.clamp(PV_MIN, PV_MAX),
            mv: 0.0,
        }
    }
}

impl Default for ProcessState {
    fn default() -> Self {
        ProcessState::new(25.0, 0.0)
    }
}

/// What the temperature input currently reports, for the display layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorStatus {
    /// Sensor connected and PV within range.
    Ok,
    /// Sensor disconnected; PV is frozen at its last value.
    Fault,
    /// PV pinned at the upper saturation bound.
    OverRange,
    /// PV pinned at the lower saturation bound.
    UnderRange,
}

/// The error type for rejected physics configuration values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Ambient temperature must be finite.
    #[error("ambient temperature must be finite")]
    InvalidAmbientTemp,
    /// Thermal inertia must be finite and strictly positive.
    #[error("thermal inertia must be finite and positive")]
    InvalidThermalInertia,
    /// Cooling rate must be finite and non-negative.
    #[error("cooling rate must be finite and non-negative")]
    InvalidCoolingRate,
    /// Heater gain must be finite and non-negative.
    #[error("heater gain must be finite and non-negative")]
    InvalidHeaterGain,
    /// External heat input must be finite and non-negative.
    #[error("external heat input must be finite and non-negative")]
    InvalidExternalHeat,
    /// Noise amplitude must be finite and non-negative.
    #[error("noise amplitude must be finite and non-negative")]
    InvalidNoiseAmplitude,
}

/// Tunable parameters of the thermal plant.
///
/// Externally adjustable through the validated setters; read-only to the
/// control core. A rejected value leaves the previous one in place.
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Temperature the plant relaxes toward with no heat input, in °C.
    ambient_temp: f64,

    /// Thermal mass dividing the net heat flux. Larger values make the
    /// plant slower to move. Defaults to 1.0.
    thermal_inertia: f64,

    /// Fraction of the PV-to-ambient difference lost per second.
    cooling_rate: f64,

    /// Heating rate contributed by the heater at full output, in °C/s.
    heater_gain: f64,

    /// Host-supplied heat contribution (the abstracted ambient-volume
    /// input), in °C/s. Defaults to 0.
    external_heat_input: f64,

    /// Peak sensor-noise perturbation per second of simulated time.
    noise_amplitude: f64,

    /// Whether the temperature sensor is attached. When false the PV
    /// freezes and the controller fails safe.
    sensor_connected: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            ambient_temp: 25.0,
            thermal_inertia: 1.0,
            cooling_rate: 0.02,
            heater_gain: 2.0,
            external_heat_input: 0.0,
            noise_amplitude: 0.01,
            sensor_connected: true,
        }
    }
}

impl PhysicsConfig {
    /// Returns the ambient temperature.
    pub fn ambient_temp(&self) -> f64 {
        self.ambient_temp
    }

    /// Returns the thermal inertia.
    pub fn thermal_inertia(&self) -> f64 {
        self.thermal_inertia
    }

    /// Returns the cooling rate.
    pub fn cooling_rate(&self) -> f64 {
        self.cooling_rate
    }

    /// Returns the full-output heater gain.
    pub fn heater_gain(&self) -> f64 {
        self.heater_gain
    }

    /// Returns the host-supplied external heat contribution.
    pub fn external_heat_input(&self) -> f64 {
        self.external_heat_input
    }

    /// Returns the peak noise perturbation per second.
    pub fn noise_amplitude(&self) -> f64 {
        self.noise_amplitude
    }

    /// Returns whether the temperature sensor is attached.
    pub fn sensor_connected(&self) -> bool {
        self.sensor_connected
    }

    /// Sets the ambient temperature.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidAmbientTemp`] for non-finite values.
    pub fn set_ambient_temp(&mut self, temp: f64) -> Result<(), ConfigError> {
        if !temp.is_finite() {
            return Err(ConfigError::InvalidAmbientTemp);
        }
        self.ambient_temp = temp;
        Ok(())
    }

    /// Sets the thermal inertia dividing the net heat flux.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidThermalInertia`] unless the value is
    /// finite and strictly positive.
    pub fn set_thermal_inertia(&mut self, inertia: f64) -> Result<(), ConfigError> {
        if !inertia.is_finite() || inertia <= 0.0 {
            return Err(ConfigError::InvalidThermalInertia);
        }
        self.thermal_inertia = inertia;
        Ok(())
    }

    /// Sets the cooling rate.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidCoolingRate`] unless the value is
    /// finite and non-negative.
    pub fn set_cooling_rate(&mut self, rate: f64) -> Result<(), ConfigError> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(ConfigError::InvalidCoolingRate);
        }
        self.cooling_rate = rate;
        Ok(())
    }

    /// Sets the full-output heater gain.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidHeaterGain`] unless the value is
    /// finite and non-negative.
    pub fn set_heater_gain(&mut self, gain: f64) -> Result<(), ConfigError> {
        if !gain.is_finite() || gain < 0.0 {
            return Err(ConfigError::InvalidHeaterGain);
        }
        self.heater_gain = gain;
        Ok(())
    }

    /// Sets the host-supplied external heat contribution.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidExternalHeat`] unless the value is
    /// finite and non-negative.
    pub fn set_external_heat_input(&mut self, input: f64) -> Result<(), ConfigError> {
        if !input.is_finite() || input < 0.0 {
            return Err(ConfigError::InvalidExternalHeat);
        }
        self.external_heat_input = input;
        Ok(())
    }

    /// Sets the peak sensor-noise perturbation per second. Zero makes the
    /// plant fully deterministic.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidNoiseAmplitude`] unless the value is
    /// finite and non-negative.
    pub fn set_noise_amplitude(&mut self, amplitude: f64) -> Result<(), ConfigError> {
        if !amplitude.is_finite() || amplitude < 0.0 {
            return Err(ConfigError::InvalidNoiseAmplitude);
        }
        self.noise_amplitude = amplitude;
        Ok(())
    }

    /// Attaches or detaches the temperature sensor.
    pub fn set_sensor_connected(&mut self, connected: bool) {
        self.sensor_connected = connected;
    }
}

/// The thermal plant: advances PV from the current heat inputs.
///
/// The random source is injected so tests can seed it (or zero the noise
/// amplitude) for full determinism.
#[derive(Debug)]
pub struct ProcessModel<R: Rng> {
    config: PhysicsConfig,
    rng: R,
}

impl<R: Rng> ProcessModel<R> {
    /// Creates a plant with the given configuration and noise source.
    pub fn new(config: PhysicsConfig, rng: R) -> Self {
        Self { config, rng }
    }

    /// Returns the plant configuration.
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Returns the plant configuration for mutation.
    pub fn config_mut(&mut self) -> &mut PhysicsConfig {
        &mut self.config
    }

    /// Advances the process value by `dt` given the current heater output.
    ///
    /// With the sensor disconnected the PV holds its last value; the fault
    /// is reported through [`sensor_status`](Self::sensor_status), not
    /// here. PV saturates at the range bounds instead of erroring.
    pub fn advance(&mut self, state: &mut ProcessState, dt: Duration) {
        if !self.config.sensor_connected {
            return;
        }
        let dt = dt.as_secs_f64();
        let heat_gain =
            self.config.external_heat_input + (state.mv / 100.0) * self.config.heater_gain;
        let natural_loss = (state.pv - self.config.ambient_temp) * self.config.cooling_rate;
        let noise = (self.rng.gen::<f64>() - 0.5) * 2.0 * self.config.noise_amplitude * dt;
        state.pv += (heat_gain - natural_loss) * dt / self.config.thermal_inertia + noise;
        state.pv = state.pv.clamp(PV_MIN, PV_MAX);
    }

    /// Classifies the current sensor reading for the display layer.
    pub fn sensor_status(&self, state: &ProcessState) -> SensorStatus {
        if !self.config.sensor_connected {
            SensorStatus::Fault
        } else if state.pv >= PV_MAX {
            SensorStatus::OverRange
        } else if state.pv <= PV_MIN {
            SensorStatus::UnderRange
        } else {
            SensorStatus::Ok
        }
    }
}
