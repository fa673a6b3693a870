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

use fixtures::harness::{make_sim, run, tap};

use thermopanel::input::Button;
use thermopanel::panel::Level;
use thermopanel::time::Millis;

#[test]
fn test_short_press_toggles_operation_and_adjustment() {
    let mut sim = make_sim();
    assert_eq!(sim.level(), Level::Operation);

    let t = tap(&mut sim, Button::Level, 0);
    assert_eq!(sim.level(), Level::Adjustment);

    tap(&mut sim, Button::Level, t + 100);
    assert_eq!(sim.level(), Level::Operation);
}

#[test]
fn test_long_level_hold_enters_initial_without_double_handling() {
    let mut sim = make_sim();
    sim.on_button_down(Button::Level, Millis(0));
    run(&mut sim, 0, 3_500);

    // The transition fires during the hold, not on release.
    assert_eq!(sim.level(), Level::Initial);
    assert!(sim.stop_control());

    // The release must not additionally navigate levels.
    sim.on_button_up(Button::Level, Millis(3_600));
    assert_eq!(sim.level(), Level::Initial);
    assert!(sim.stop_control());
}

#[test]
fn test_short_press_returns_home_from_initial_and_restores_control() {
    let mut sim = make_sim();
    sim.on_button_down(Button::Level, Millis(0));
    run(&mut sim, 0, 3_200);
    sim.on_button_up(Button::Level, Millis(3_300));
    assert_eq!(sim.level(), Level::Initial);

    tap(&mut sim, Button::Level, 4_000);
    assert_eq!(sim.level(), Level::Operation);
    assert!(!sim.stop_control());
}

#[test]
fn test_joint_hold_enters_protection_from_any_level() {
    // From the operation level.
    let mut sim = make_sim();
    sim.on_button_down(Button::Level, Millis(0));
    sim.on_button_down(Button::Mode, Millis(200));
    run(&mut sim, 0, 3_400);
    assert_eq!(sim.level(), Level::Protection);
    sim.on_button_up(Button::Level, Millis(3_500));
    sim.on_button_up(Button::Mode, Millis(3_500));
    assert_eq!(sim.level(), Level::Protection);

    // And from the adjustment level.
    let mut sim = make_sim();
    tap(&mut sim, Button::Level, 0);
    assert_eq!(sim.level(), Level::Adjustment);
    sim.on_button_down(Button::Level, Millis(500));
    sim.on_button_down(Button::Mode, Millis(500));
    run(&mut sim, 500, 3_700);
    assert_eq!(sim.level(), Level::Protection);
}

#[test]
fn test_joint_hold_measures_the_later_press() {
    let mut sim = make_sim();
    sim.on_button_down(Button::Level, Millis(0));
    sim.on_button_down(Button::Mode, Millis(1_000));
    // At 3.2 s the level key qualifies alone but the mode key does not;
    // the joint rule gates on the shorter hold and the solo rule is
    // blocked by the concurrent mode hold.
    run(&mut sim, 0, 3_900);
    assert_eq!(sim.level(), Level::Operation);

    run(&mut sim, 4_000, 4_200);
    assert_eq!(sim.level(), Level::Protection);
}

#[test]
fn test_mode_key_cycles_menu_and_wraps() {
    let mut sim = make_sim();
    let mut t = tap(&mut sim, Button::Level, 0);
    assert_eq!(sim.selected_code(), "at");

    let expected = ["p", "i", "d", "hys", "at"];
    for code in expected {
        t = tap(&mut sim, Button::Mode, t + 100);
        assert_eq!(sim.selected_code(), code);
    }
}

#[test]
fn test_reentering_a_level_resets_the_selection() {
    let mut sim = make_sim();
    let mut t = tap(&mut sim, Button::Level, 0);
    t = tap(&mut sim, Button::Mode, t + 100);
    t = tap(&mut sim, Button::Mode, t + 100);
    assert_eq!(sim.selected_code(), "i");

    t = tap(&mut sim, Button::Level, t + 100);
    tap(&mut sim, Button::Level, t + 100);
    assert_eq!(sim.level(), Level::Adjustment);
    assert_eq!(sim.selected_code(), "at");
}

#[test]
fn test_up_down_adjust_the_selected_parameter() {
    let mut sim = make_sim();
    let mut t = tap(&mut sim, Button::Level, 0);
    t = tap(&mut sim, Button::Mode, t + 100);
    assert_eq!(sim.selected_code(), "p");
    assert_eq!(sim.selected_display(), "8.0");

    t = tap(&mut sim, Button::Up, t + 100);
    assert_eq!(sim.selected_display(), "8.1");

    tap(&mut sim, Button::Down, t + 100);
    tap(&mut sim, Button::Down, t + 300);
    assert_eq!(sim.selected_display(), "7.9");
}

#[test]
fn test_setpoint_steps_from_the_operation_level() {
    let mut sim = make_sim();
    assert_eq!(sim.selected_code(), "pv_sv");

    let t = tap(&mut sim, Button::Up, 0);
    tap(&mut sim, Button::Up, t + 100);
    assert_eq!(sim.sv(), 2.0);
    assert_eq!(sim.selected_display(), "2.0");

    tap(&mut sim, Button::Down, t + 300);
    assert_eq!(sim.sv(), 1.0);
}

#[test]
fn test_protect_lock_blocks_every_front_panel_write() {
    let mut sim = make_sim();
    sim.params_mut().set_protect(3).unwrap();
    assert!(sim.locked());

    // Setpoint adjustment in the operation level is locked out.
    tap(&mut sim, Button::Up, 0);
    assert_eq!(sim.sv(), 0.0);

    // So is every parameter in the adjustment level.
    let mut t = tap(&mut sim, Button::Level, 500);
    t = tap(&mut sim, Button::Mode, t + 100);
    assert_eq!(sim.selected_code(), "p");
    tap(&mut sim, Button::Up, t + 100);
    assert_eq!(sim.params().band(), 8.0);
}

#[test]
fn test_protection_level_can_always_lower_the_lock() {
    let mut sim = make_sim();
    sim.params_mut().set_protect(3).unwrap();

    sim.on_button_down(Button::Level, Millis(0));
    sim.on_button_down(Button::Mode, Millis(0));
    run(&mut sim, 0, 3_200);
    assert_eq!(sim.level(), Level::Protection);
    assert_eq!(sim.selected_code(), "oapt");
    assert!(!sim.locked());
    sim.on_button_up(Button::Level, Millis(3_300));
    sim.on_button_up(Button::Mode, Millis(3_300));

    // `oapt` itself stays adjustable here regardless of the lock value.
    tap(&mut sim, Button::Down, 3_400);
    assert_eq!(sim.params().protect(), 2);
    assert_eq!(sim.selected_display(), "2");

    // Returning to operation, the lock is released.
    tap(&mut sim, Button::Level, 3_800);
    assert_eq!(sim.level(), Level::Operation);
    tap(&mut sim, Button::Up, 4_200);
    assert_eq!(sim.sv(), 1.0);
}

#[test]
fn test_initial_level_menu_and_toggles() {
    let mut sim = make_sim();
    sim.on_button_down(Button::Level, Millis(0));
    run(&mut sim, 0, 3_100);
    sim.on_button_up(Button::Level, Millis(3_200));
    assert_eq!(sim.level(), Level::Initial);
    assert_eq!(sim.selected_code(), "in-t");
    assert_eq!(sim.selected_display(), "5");

    let mut t = tap(&mut sim, Button::Up, 3_300);
    assert_eq!(sim.selected_display(), "6");

    t = tap(&mut sim, Button::Mode, t + 100);
    assert_eq!(sim.selected_code(), "cntl");
    assert_eq!(sim.selected_display(), "pid");
    tap(&mut sim, Button::Down, t + 100);
    assert_eq!(sim.selected_display(), "onof");
}
