//! Scripted tour of the front-panel menu.
//!
//! Walks the four access levels with short, long, and joint key presses,
//! printing the panel state after each step the way a bench test of the
//! real instrument would read out.
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

use thermopanel::input::Button;
use thermopanel::process::PhysicsConfig;
use thermopanel::sim::{PanelSim, SimOptions};
use thermopanel::time::Millis;

type Sim = PanelSim<Millis, SmallRng>;

fn report(sim: &Sim, what: &str) {
    println!(
        "{:40} level={:<10} item={:<5} value={:<5} stop={}",
        what,
        sim.level().to_string(),
        sim.selected_code(),
        sim.selected_display(),
        sim.stop_control()
    );
}

/// Presses and releases a key inside the short-press window, ticking the
/// simulator across the press.
fn tap(sim: &mut Sim, button: Button, t: &mut u64) {
    sim.on_button_down(button, Millis(*t));
    *t += 120;
    sim.tick(Millis(*t));
    sim.on_button_up(button, Millis(*t));
    *t += 80;
}

/// Holds one or two keys past the long-press threshold, polling the
/// simulator the whole way like the render loop would.
fn hold(sim: &mut Sim, buttons: &[Button], t: &mut u64) {
    for &button in buttons {
        sim.on_button_down(button, Millis(*t));
    }
    let release = *t + 3_400;
    while *t < release {
        *t += 100;
        sim.tick(Millis(*t));
    }
    for &button in buttons {
        sim.on_button_up(button, Millis(*t));
    }
    *t += 100;
}

fn main() {
    let mut sim = PanelSim::new(
        PhysicsConfig::default(),
        SimOptions::default(),
        SmallRng::seed_from_u64(7),
    );
    let mut t = 0u64;

    report(&sim, "power-on");

    tap(&mut sim, Button::Up, &mut t);
    tap(&mut sim, Button::Up, &mut t);
    report(&sim, "raise setpoint twice");

    tap(&mut sim, Button::Level, &mut t);
    report(&sim, "short level press -> adjustment");

    tap(&mut sim, Button::Mode, &mut t);
    tap(&mut sim, Button::Up, &mut t);
    report(&sim, "widen the proportional band");

    hold(&mut sim, &[Button::Level], &mut t);
    report(&sim, "3 s level hold -> initial setting");

    tap(&mut sim, Button::Mode, &mut t);
    tap(&mut sim, Button::Down, &mut t);
    report(&sim, "switch control method to on/off");

    hold(&mut sim, &[Button::Level, Button::Mode], &mut t);
    report(&sim, "joint 3 s hold -> protection");

    tap(&mut sim, Button::Up, &mut t);
    tap(&mut sim, Button::Up, &mut t);
    tap(&mut sim, Button::Up, &mut t);
    report(&sim, "raise oapt to the lock value");

    tap(&mut sim, Button::Level, &mut t);
    tap(&mut sim, Button::Up, &mut t);
    report(&sim, "locked: setpoint press is ignored");
}
