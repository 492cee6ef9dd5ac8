use crate::Step;
use std::fmt;

/// Which family of input is currently live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    FreeLook,
    #[default]
    Guided,
    SearchModal,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::FreeLook => "Free look",
            Mode::Guided => "Guided",
            Mode::SearchModal => "Search",
        }
    }

    pub fn status_message(self) -> &'static str {
        match self {
            Mode::FreeLook => "Free look enabled (move the mouse to look around, Space returns to guided mode).",
            Mode::Guided => "Guided mode (W/S change viewpoint, A/D browse artworks, I opens search, Space frees the camera).",
            Mode::SearchModal => "Search open (type a term, pick a sort order and submit).",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// User intents after key bindings have been resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    Viewpoint(Step),
    Item(Step),
    ToggleLook,
    OpenSearch,
    Look { yaw_degrees: f32, pitch_degrees: f32 },
    /// Hides the startup instructions panel; not a navigation key.
    DismissInstructions,
}

/// Mode state machine. Mode changes only through the methods below; the navigator owns side effects.
#[derive(Debug, Clone, Default)]
pub struct ModeController {
    mode: Mode,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn permits(&self, intent: &Intent) -> bool {
        match (self.mode, intent) {
            (_, Intent::DismissInstructions) => true,
            (Mode::SearchModal, _) => false,
            (Mode::FreeLook, Intent::ToggleLook | Intent::Look { .. }) => true,
            (Mode::FreeLook, _) => false,
            (Mode::Guided, Intent::Look { .. }) => false,
            (Mode::Guided, _) => true,
        }
    }

    /// FreeLook and Guided swap; SearchModal is left alone. Returns the new mode when it changed.
    pub fn toggle_look(&mut self) -> Option<Mode> {
        let next = match self.mode {
            Mode::FreeLook => Mode::Guided,
            Mode::Guided => Mode::FreeLook,
            Mode::SearchModal => return None,
        };
        self.mode = next;
        Some(next)
    }

    /// Entered from the settle-delay callback. Returns false when already open.
    pub fn open_search_modal(&mut self) -> bool {
        if self.mode == Mode::SearchModal {
            return false;
        }
        self.mode = Mode::SearchModal;
        true
    }

    /// Modal submission returns to guided navigation. Returns false when the modal was not open.
    pub fn close_search_modal(&mut self) -> bool {
        if self.mode != Mode::SearchModal {
            return false;
        }
        self.mode = Mode::Guided;
        true
    }
}
