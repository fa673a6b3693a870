//! The four-level front-panel menu state machine.
//!
//! Each access level owns a fixed, ordered list of selectable items; the
//! mode key cycles the selection and the level key (short, long, or joint
//! long press — decoded upstream by the input dispatcher) moves between
//! levels. Entering the initial-setting level stops control output until
//! the panel leaves it again.

use core::fmt;

use log::info;

use crate::params::ParamKey;

/// Front-panel access level, gating which parameters are reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Run-time display level; shows PV and adjusts SV.
    Operation,
    /// Tuning parameters: autotune, PID constants, hysteresis.
    Adjustment,
    /// Configuration that changes the control structure; control output
    /// is stopped while here.
    Initial,
    /// Protection lock configuration.
    Protection,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Operation => "operation",
            Level::Adjustment => "adjustment",
            Level::Initial => "initial",
            Level::Protection => "protection",
        })
    }
}

/// One selectable entry in a level's menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    /// The operation level's PV/SV display; up/down adjust the setpoint.
    PvSv,
    /// A named control parameter.
    Param(ParamKey),
}

impl MenuItem {
    /// Returns the mnemonic the panel shows for this item.
    pub fn code(self) -> &'static str {
        match self {
            MenuItem::PvSv => "pv_sv",
            MenuItem::Param(key) => key.code(),
        }
    }
}

const OPERATION_ITEMS: &[MenuItem] = &[MenuItem::PvSv];
const ADJUSTMENT_ITEMS: &[MenuItem] = &[
    MenuItem::Param(ParamKey::Autotune),
    MenuItem::Param(ParamKey::Band),
    MenuItem::Param(ParamKey::Integral),
    MenuItem::Param(ParamKey::Derivative),
    MenuItem::Param(ParamKey::Hysteresis),
];
const INITIAL_ITEMS: &[MenuItem] = &[
    MenuItem::Param(ParamKey::InputType),
    MenuItem::Param(ParamKey::ControlMethod),
];
const PROTECTION_ITEMS: &[MenuItem] = &[MenuItem::Param(ParamKey::OperationProtect)];

impl Level {
    /// Returns this level's ordered menu, always non-empty.
    pub fn items(self) -> &'static [MenuItem] {
        match self {
            Level::Operation => OPERATION_ITEMS,
            Level::Adjustment => ADJUSTMENT_ITEMS,
            Level::Initial => INITIAL_ITEMS,
            Level::Protection => PROTECTION_ITEMS,
        }
    }
}

/// Tracks the active level, the menu selection within it, and the
/// stop-control flag tied to the initial-setting level.
#[derive(Debug)]
pub struct Panel {
    level: Level,
    menu_index: usize,
    stop_control: bool,
}

impl Default for Panel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel {
    /// Creates a panel in the operation level.
    pub fn new() -> Self {
        Panel {
            level: Level::Operation,
            menu_index: 0,
            stop_control: false,
        }
    }

    /// Returns the active level.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Returns the index of the selected menu item.
    pub fn menu_index(&self) -> usize {
        self.menu_index
    }

    /// Returns the selected menu item.
    pub fn selected(&self) -> MenuItem {
        self.level.items()[self.menu_index]
    }

    /// Whether control output is forced off for configuration safety.
    pub fn stop_control(&self) -> bool {
        self.stop_control
    }

    /// Short press of the level key: operation and adjustment toggle;
    /// the deeper levels return to operation.
    pub fn navigate(&mut self) {
        let next = match self.level {
            Level::Operation => Level::Adjustment,
            Level::Adjustment | Level::Initial | Level::Protection => Level::Operation,
        };
        self.enter(next);
    }

    /// Enters a level directly, resetting the menu selection.
    ///
    /// Entering [`Level::Initial`] raises `stop_control`; leaving it by
    /// any transition clears the flag again.
    pub fn enter(&mut self, level: Level) {
        if level != self.level {
            info!("panel level {} -> {}", self.level, level);
        }
        self.stop_control = level == Level::Initial;
        self.level = level;
        self.menu_index = 0;
    }

    /// Short press of the mode key: advances the selection cyclically.
    pub fn next_item(&mut self) {
        self.menu_index = (self.menu_index + 1) % self.level.items().len();
    }
}
