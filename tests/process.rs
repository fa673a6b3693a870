// Copyright © 2025 Hs293Go
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included
// in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES
// OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
// IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
// TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE
// OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use fixtures::harness::quiet_physics;

use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use thermopanel::process::{
    ConfigError, PhysicsConfig, ProcessModel, ProcessState, SensorStatus, PV_MAX, PV_MIN,
};

const DT: Duration = Duration::from_millis(100);

fn make_model(physics: PhysicsConfig) -> ProcessModel<SmallRng> {
    ProcessModel::new(physics, SmallRng::seed_from_u64(1))
}

#[test]
fn test_unheated_plant_decays_monotonically_toward_ambient() {
    let mut model = make_model(quiet_physics());
    let ambient = model.config().ambient_temp();
    let mut state = ProcessState::new(200.0, 0.0);

    let mut previous = state.pv;
    for _ in 0..1000 {
        model.advance(&mut state, DT);
        assert!(state.pv <= previous, "PV rose with no heat input");
        assert!(state.pv >= ambient, "PV undershot ambient");
        previous = state.pv;
    }
    // 100 s at the default cooling rate leaves only a small residual.
    assert!(state.pv < ambient + 30.0);
}

#[test]
fn test_heater_output_raises_pv() {
    let mut model = make_model(quiet_physics());
    let mut state = ProcessState::new(25.0, 0.0);
    state.mv = 100.0;

    let start = state.pv;
    for _ in 0..50 {
        model.advance(&mut state, DT);
    }
    assert!(state.pv > start);
}

#[test]
fn test_pv_saturates_at_upper_bound() {
    let mut physics = quiet_physics();
    physics.set_heater_gain(1.0e6).unwrap();
    let mut model = make_model(physics);
    let mut state = ProcessState::new(25.0, 0.0);
    state.mv = 100.0;

    for _ in 0..10 {
        model.advance(&mut state, DT);
    }
    assert_eq!(state.pv, PV_MAX);
    assert_eq!(model.sensor_status(&state), SensorStatus::OverRange);

    // Saturated is stable, not an error.
    model.advance(&mut state, DT);
    assert_eq!(state.pv, PV_MAX);
}

#[test]
fn test_pv_saturates_at_lower_bound() {
    let mut physics = quiet_physics();
    physics.set_ambient_temp(-500.0).unwrap();
    physics.set_cooling_rate(1.0).unwrap();
    let mut model = make_model(physics);
    let mut state = ProcessState::new(0.0, 0.0);

    for _ in 0..200 {
        model.advance(&mut state, DT);
    }
    assert_eq!(state.pv, PV_MIN);
    assert_eq!(model.sensor_status(&state), SensorStatus::UnderRange);
}

#[test]
fn test_disconnected_sensor_freezes_pv() {
    let mut physics = quiet_physics();
    physics.set_sensor_connected(false);
    let mut model = make_model(physics);
    let mut state = ProcessState::new(90.0, 0.0);
    state.mv = 100.0;

    for _ in 0..20 {
        model.advance(&mut state, DT);
    }
    assert_eq!(state.pv, 90.0);
    assert_eq!(model.sensor_status(&state), SensorStatus::Fault);
}

#[test]
fn test_noise_perturbation_is_bounded() {
    let mut physics = PhysicsConfig::default();
    physics.set_cooling_rate(0.0).unwrap();
    physics.set_heater_gain(0.0).unwrap();
    assert_eq!(physics.noise_amplitude(), 0.01);
    let mut model = make_model(physics);
    let mut state = ProcessState::new(25.0, 0.0);

    for _ in 0..1000 {
        let before = state.pv;
        model.advance(&mut state, DT);
        // At most ±noise_amplitude per unit dt, i.e. 0.001 per step here.
        assert!((state.pv - before).abs() <= 0.001 + 1.0e-12);
    }
}

#[test]
fn test_rejected_config_values_leave_previous_ones() {
    let mut physics = PhysicsConfig::default();

    assert_eq!(
        physics.set_cooling_rate(-0.5),
        Err(ConfigError::InvalidCoolingRate)
    );
    assert_eq!(physics.cooling_rate(), 0.02);

    assert_eq!(
        physics.set_thermal_inertia(0.0),
        Err(ConfigError::InvalidThermalInertia)
    );
    assert_eq!(physics.thermal_inertia(), 1.0);

    assert_eq!(
        physics.set_ambient_temp(f64::NAN),
        Err(ConfigError::InvalidAmbientTemp)
    );
    assert_eq!(physics.ambient_temp(), 25.0);

    assert_eq!(
        physics.set_external_heat_input(-1.0),
        Err(ConfigError::InvalidExternalHeat)
    );
    assert_eq!(physics.external_heat_input(), 0.0);
}

#[test]
fn test_thermal_inertia_slows_the_plant() {
    let mut slow_physics = quiet_physics();
    slow_physics.set_thermal_inertia(10.0).unwrap();

    let mut fast = make_model(quiet_physics());
    let mut slow = make_model(slow_physics);
    let mut fast_state = ProcessState::new(25.0, 0.0);
    let mut slow_state = ProcessState::new(25.0, 0.0);
    fast_state.mv = 100.0;
    slow_state.mv = 100.0;

    for _ in 0..100 {
        fast.advance(&mut fast_state, DT);
        slow.advance(&mut slow_state, DT);
    }
    assert!(fast_state.pv > slow_state.pv);
    assert!(slow_state.pv > 25.0);
}
