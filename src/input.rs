use crate::mode::Intent;
use crate::Step;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use winit::keyboard::{Key, NamedKey};

const DEFAULT_LOOK_DEGREES_PER_PIXEL: f32 = 0.2;

/// Turns raw key and mouse events into navigator intents using a remappable binding table.
pub struct Input {
    bindings: InputBindings,
    intents: Vec<Intent>,
    mouse_delta: (f32, f32),
    look_degrees_per_pixel: f32,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(path: impl AsRef<Path>) -> Self {
        let bindings = InputBindings::load_or_default(path);
        Self::with_bindings(bindings)
    }

    fn with_bindings(bindings: InputBindings) -> Self {
        Self {
            bindings,
            intents: Vec::new(),
            mouse_delta: (0.0, 0.0),
            look_degrees_per_pixel: DEFAULT_LOOK_DEGREES_PER_PIXEL,
        }
    }

    pub fn set_look_sensitivity(&mut self, degrees_per_pixel: f32) {
        self.look_degrees_per_pixel = degrees_per_pixel;
    }

    pub fn push(&mut self, ev: InputEvent) {
        match ev {
            InputEvent::Key { key, pressed: true } => self.apply_key_binding(&key),
            InputEvent::Key { pressed: false, .. } => {}
            InputEvent::MouseMove { dx, dy } => {
                self.mouse_delta.0 += dx;
                self.mouse_delta.1 += dy;
            }
        }
    }

    /// Discrete intents in arrival order, then one accumulated look intent if the mouse moved.
    pub fn drain_intents(&mut self) -> Vec<Intent> {
        let mut intents: Vec<Intent> = self.intents.drain(..).collect();
        let (dx, dy) = std::mem::take(&mut self.mouse_delta);
        if dx != 0.0 || dy != 0.0 {
            intents.push(Intent::Look {
                yaw_degrees: -dx * self.look_degrees_per_pixel,
                pitch_degrees: -dy * self.look_degrees_per_pixel,
            });
        }
        intents
    }

    fn apply_key_binding(&mut self, key: &Key) {
        if let Some(binding_key) = InputKeyBinding::from_event_key(key) {
            let actions: Vec<_> = self.bindings.actions_for_key(&binding_key).collect();
            self.intents.extend(actions.into_iter().map(InputAction::intent));
        }
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::with_bindings(InputBindings::default())
    }
}

/// Key identity for a textual token such as `"w"`, `"space"` or `"arrowleft"`.
pub fn key_from_token(token: &str) -> Option<Key> {
    match InputKeyBinding::from_config_value(token).ok()? {
        InputKeyBinding::Character(ch) => Some(Key::Character(ch.as_str().into())),
        InputKeyBinding::Named(named) => Some(Key::Named(named.to_named_key())),
    }
}

#[derive(Debug, Clone)]
struct InputBindings {
    key_to_actions: HashMap<InputKeyBinding, Vec<InputAction>>,
}

impl InputBindings {
    fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<InputConfigFile>(&contents) {
                Ok(config) => Self::from_config(config, &path.display().to_string()),
                Err(err) => {
                    log::warn!("[input] Failed to parse {}: {err}. Falling back to default bindings.", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("[input] Failed to read {}: {err}. Falling back to default bindings.", path.display());
                Self::default()
            }
        }
    }

    fn from_config(config: InputConfigFile, origin: &str) -> Self {
        let overrides = config.into_overrides(origin);
        Self::with_overrides(overrides)
    }

    fn with_overrides(overrides: HashMap<InputAction, Vec<InputKeyBinding>>) -> Self {
        let mut action_map = Self::default_action_map();
        for (action, keys) in overrides {
            if keys.is_empty() {
                continue;
            }
            action_map.insert(action, keys);
        }
        Self::from_action_map(action_map)
    }

    fn default_action_map() -> HashMap<InputAction, Vec<InputKeyBinding>> {
        use InputAction::*;
        let mut map = HashMap::new();
        map.insert(
            ViewpointForward,
            vec![InputKeyBinding::character("w"), InputKeyBinding::named(NamedKeyCode::ArrowUp)],
        );
        map.insert(
            ViewpointBackward,
            vec![InputKeyBinding::character("s"), InputKeyBinding::named(NamedKeyCode::ArrowDown)],
        );
        map.insert(
            ItemBackward,
            vec![InputKeyBinding::character("a"), InputKeyBinding::named(NamedKeyCode::ArrowLeft)],
        );
        map.insert(
            ItemForward,
            vec![InputKeyBinding::character("d"), InputKeyBinding::named(NamedKeyCode::ArrowRight)],
        );
        map.insert(ToggleLook, vec![InputKeyBinding::named(NamedKeyCode::Space)]);
        map.insert(OpenSearch, vec![InputKeyBinding::character("i")]);
        map.insert(DismissInstructions, vec![InputKeyBinding::named(NamedKeyCode::Enter)]);
        map
    }

    fn from_action_map(action_map: HashMap<InputAction, Vec<InputKeyBinding>>) -> Self {
        let mut key_to_actions: HashMap<InputKeyBinding, Vec<InputAction>> = HashMap::new();
        for (action, keys) in action_map {
            for key in keys {
                key_to_actions.entry(key).or_default().push(action);
            }
        }
        Self { key_to_actions }
    }

    fn actions_for_key(&self, key: &InputKeyBinding) -> impl Iterator<Item = InputAction> + '_ {
        self.key_to_actions.get(key).into_iter().flatten().copied()
    }
}

impl Default for InputBindings {
    fn default() -> Self {
        Self::from_action_map(Self::default_action_map())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum InputKeyBinding {
    Character(String),
    Named(NamedKeyCode),
}

impl InputKeyBinding {
    fn character(ch: &str) -> Self {
        Self::Character(ch.to_lowercase())
    }

    fn named(named: NamedKeyCode) -> Self {
        Self::Named(named)
    }

    fn from_event_key(key: &Key) -> Option<Self> {
        match key {
            Key::Character(ch) => {
                let s = ch.to_string();
                if s == " " {
                    Some(Self::Named(NamedKeyCode::Space))
                } else if s.is_empty() {
                    None
                } else {
                    Some(Self::Character(s.to_lowercase()))
                }
            }
            Key::Named(named) => NamedKeyCode::from_named_key(named).map(Self::Named),
            _ => None,
        }
    }

    fn from_config_value(raw: &str) -> Result<Self, ()> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(());
        }
        if let Some(named) = NamedKeyCode::from_str(&normalized) {
            return Ok(Self::Named(named));
        }
        if normalized.chars().count() == 1 {
            return Ok(Self::Character(normalized));
        }
        Err(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum NamedKeyCode {
    Space,
    Enter,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl NamedKeyCode {
    fn from_named_key(key: &NamedKey) -> Option<Self> {
        match key {
            NamedKey::Space => Some(Self::Space),
            NamedKey::Enter => Some(Self::Enter),
            NamedKey::ArrowUp => Some(Self::ArrowUp),
            NamedKey::ArrowDown => Some(Self::ArrowDown),
            NamedKey::ArrowLeft => Some(Self::ArrowLeft),
            NamedKey::ArrowRight => Some(Self::ArrowRight),
            _ => None,
        }
    }

    fn to_named_key(self) -> NamedKey {
        match self {
            Self::Space => NamedKey::Space,
            Self::Enter => NamedKey::Enter,
            Self::ArrowUp => NamedKey::ArrowUp,
            Self::ArrowDown => NamedKey::ArrowDown,
            Self::ArrowLeft => NamedKey::ArrowLeft,
            Self::ArrowRight => NamedKey::ArrowRight,
        }
    }

    fn from_str(value: &str) -> Option<Self> {
        match value {
            "space" => Some(Self::Space),
            "enter" | "return" => Some(Self::Enter),
            "up" | "arrowup" | "arrow_up" => Some(Self::ArrowUp),
            "down" | "arrowdown" | "arrow_down" => Some(Self::ArrowDown),
            "left" | "arrowleft" | "arrow_left" => Some(Self::ArrowLeft),
            "right" | "arrowright" | "arrow_right" => Some(Self::ArrowRight),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum InputAction {
    ViewpointForward,
    ViewpointBackward,
    ItemForward,
    ItemBackward,
    ToggleLook,
    OpenSearch,
    DismissInstructions,
}

impl InputAction {
    fn from_str(value: &str) -> Option<Self> {
        match value {
            "viewpoint_forward" => Some(Self::ViewpointForward),
            "viewpoint_backward" => Some(Self::ViewpointBackward),
            "item_forward" => Some(Self::ItemForward),
            "item_backward" => Some(Self::ItemBackward),
            "toggle_look" => Some(Self::ToggleLook),
            "open_search" => Some(Self::OpenSearch),
            "dismiss_instructions" => Some(Self::DismissInstructions),
            _ => None,
        }
    }

    fn intent(self) -> Intent {
        match self {
            Self::ViewpointForward => Intent::Viewpoint(Step::Forward),
            Self::ViewpointBackward => Intent::Viewpoint(Step::Backward),
            Self::ItemForward => Intent::Item(Step::Forward),
            Self::ItemBackward => Intent::Item(Step::Backward),
            Self::ToggleLook => Intent::ToggleLook,
            Self::OpenSearch => Intent::OpenSearch,
            Self::DismissInstructions => Intent::DismissInstructions,
        }
    }
}

#[derive(Debug, Deserialize)]
struct InputConfigFile {
    #[serde(default)]
    bindings: HashMap<String, Vec<String>>,
}

impl InputConfigFile {
    fn into_overrides(self, origin: &str) -> HashMap<InputAction, Vec<InputKeyBinding>> {
        let mut overrides = HashMap::new();
        for (action_name, keys) in self.bindings {
            let action_key = action_name.trim().to_lowercase();
            match InputAction::from_str(&action_key) {
                Some(action) => {
                    let mut parsed = Vec::new();
                    for key in keys {
                        match InputKeyBinding::from_config_value(&key) {
                            Ok(binding) => parsed.push(binding),
                            Err(_) => log::warn!(
                                "[input] {origin}: unknown key '{key}' for action '{action_name}', ignoring."
                            ),
                        }
                    }
                    if parsed.is_empty() {
                        log::warn!("[input] {origin}: action '{action_name}' has no valid keys, keeping defaults.");
                        continue;
                    }
                    overrides.insert(action, parsed);
                }
                None => log::warn!("[input] {origin}: unknown action '{action_name}', ignoring."),
            }
        }
        overrides
    }
}

pub enum InputEvent {
    Key { key: Key, pressed: bool },
    MouseMove { dx: f32, dy: f32 },
}

impl InputEvent {
    pub fn key_press(key: Key) -> Self {
        InputEvent::Key { key, pressed: true }
    }
}
