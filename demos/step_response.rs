//! Closed-loop warm-up of the simulated plant under PID control.
//!
//! Prints a sampled table of PV/MV while the controller drives the plant
//! from ambient to the setpoint.
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

use rand::rngs::SmallRng;
use rand::SeedableRng;

use thermopanel::process::PhysicsConfig;
use thermopanel::sim::{PanelSim, SimOptions};
use thermopanel::time::Millis;

fn main() {
    let mut physics = PhysicsConfig::default();
    physics.set_heater_gain(5.0).unwrap();
    physics.set_cooling_rate(0.05).unwrap();

    let mut sim = PanelSim::new(physics, SimOptions::default(), SmallRng::seed_from_u64(7));
    sim.set_setpoint(80.0);

    println!("Warming up to {:.0} deg C under PID control", sim.sv());
    println!("time(s) |  PV(degC) | MV(%)");
    println!("--------|-----------|------");

    for t in (0..=120_000u64).step_by(100) {
        sim.tick(Millis(t));
        if t % 5_000 == 0 {
            println!("{:7.1} | {:9.2} | {:5.1}", t as f64 / 1000.0, sim.pv(), sim.mv());
        }
    }

    println!(
        "final: pv = {:.2}, sv = {:.1}, mode = {:?}",
        sim.pv(),
        sim.sv(),
        sim.control_mode()
    );
}
