//! Keyboard bindings and the presentation toggles they drive.

use engine::{Direction, Engine};

/// Manual rotation step in degrees.
pub const ROTATE_STEP_DEG: f64 = 5.0;
/// Rotation step with the coarse modifier held.
pub const ROTATE_STEP_COARSE_DEG: f64 = 15.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyCommand {
    RotateLeft,
    RotateRight,
    TurnLeft,
    TurnRight,
    CycleDebugPane,
    ToggleDisplayMode,
}

/// How the rendering layer presents the selected imagery. Purely
/// presentational; the engine never sees it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Front photo large, neighbors as thumbnails.
    #[default]
    Focus,
    /// Everything in view as a uniform strip.
    Strip,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Focus => DisplayMode::Strip,
            DisplayMode::Strip => DisplayMode::Focus,
        }
    }
}

/// Debug overlay pane, cycled by a single key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DebugPane {
    #[default]
    Hidden,
    Selection,
    EventTrace,
}

impl DebugPane {
    pub fn cycled(self) -> Self {
        match self {
            DebugPane::Hidden => DebugPane::Selection,
            DebugPane::Selection => DebugPane::EventTrace,
            DebugPane::EventTrace => DebugPane::Hidden,
        }
    }
}

#[derive(Debug, Default)]
pub struct KeyboardAdapter {
    display_mode: DisplayMode,
    debug_pane: DebugPane,
}

impl KeyboardAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn debug_pane(&self) -> DebugPane {
        self.debug_pane
    }

    /// Dispatches one key command. `coarse` reflects a held modifier and
    /// only affects the rotate commands.
    pub fn handle(&mut self, engine: &mut Engine, cmd: KeyCommand, coarse: bool) {
        let step = if coarse {
            ROTATE_STEP_COARSE_DEG
        } else {
            ROTATE_STEP_DEG
        };
        match cmd {
            KeyCommand::RotateLeft => engine.rotate_bearing(-step),
            KeyCommand::RotateRight => engine.rotate_bearing(step),
            KeyCommand::TurnLeft => {
                engine.turn_to(Direction::Left);
            }
            KeyCommand::TurnRight => {
                engine.turn_to(Direction::Right);
            }
            KeyCommand::CycleDebugPane => {
                self.debug_pane = self.debug_pane.cycled();
            }
            KeyCommand::ToggleDisplayMode => {
                self.display_mode = self.display_mode.toggled();
            }
        }
    }
}
