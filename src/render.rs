//! Command interface to the scene renderer and the image loader.
//!
//! The navigator never inspects renderer state; it only issues intent commands. Every command must
//! be safe to repeat.

use crate::artwork::ItemView;
use crate::viewpoint::Pose;
use std::collections::VecDeque;
use std::fmt;
use std::path::Path;

pub trait SceneRenderer {
    fn show_item(&mut self, item: &ItemView);
    fn show_image(&mut self, reference: &str, footprint: Footprint);
    fn clear_item(&mut self);
    fn set_camera_pose(&mut self, pose: Pose);
    fn set_look_enabled(&mut self, enabled: bool);
    fn set_search_overlay(&mut self, visible: bool);
    fn set_instructions_visible(&mut self, visible: bool);
}

/// Size of the image plane in scene units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub width: f32,
    pub height: f32,
}

impl Footprint {
    /// Wide images are capped by `max_width`, tall and square ones by `max_height`.
    pub fn fit(pixel_width: u32, pixel_height: u32, max_width: f32, max_height: f32) -> Option<Self> {
        if pixel_width == 0 || pixel_height == 0 {
            return None;
        }
        let aspect = pixel_width as f32 / pixel_height as f32;
        if aspect > 1.0 {
            Some(Self { width: max_width, height: max_width / aspect })
        } else {
            Some(Self { width: max_height * aspect, height: max_height })
        }
    }
}

impl fmt::Display for Footprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}x{:.3}", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReport {
    pub reference: String,
    pub outcome: Result<(u32, u32), String>,
}

/// Resolves natural image dimensions. Results are delivered later through `drain_reports`.
pub trait ImageLoader {
    fn request(&mut self, reference: &str);
    fn drain_reports(&mut self) -> Vec<ImageReport>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    ShowItem(ItemView),
    ShowImage { reference: String, footprint: Footprint },
    ClearItem,
    SetCameraPose(Pose),
    SetLookEnabled(bool),
    SetSearchOverlay(bool),
    SetInstructionsVisible(bool),
}

/// Keeps every command it receives. Used by tests and the headless shell.
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    commands: Vec<RenderCommand>,
    echo: bool,
}

impl RecordingRenderer {
    /// Also logs each command at info level.
    pub fn echoing() -> Self {
        Self { commands: Vec::new(), echo: true }
    }

    fn record(&mut self, command: RenderCommand) {
        if self.echo {
            log::info!("[render] {command:?}");
        }
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn last_pose(&self) -> Option<Pose> {
        self.commands.iter().rev().find_map(|cmd| match cmd {
            RenderCommand::SetCameraPose(pose) => Some(*pose),
            _ => None,
        })
    }

    pub fn pose_writes(&self) -> usize {
        self.commands.iter().filter(|cmd| matches!(cmd, RenderCommand::SetCameraPose(_))).count()
    }

    /// The item currently on screen: the last `ShowItem` unless a `ClearItem` came after it.
    pub fn shown_item(&self) -> Option<&ItemView> {
        for cmd in self.commands.iter().rev() {
            match cmd {
                RenderCommand::ShowItem(item) => return Some(item),
                RenderCommand::ClearItem => return None,
                _ => {}
            }
        }
        None
    }

    pub fn overlay_visible(&self) -> bool {
        self.commands
            .iter()
            .rev()
            .find_map(|cmd| match cmd {
                RenderCommand::SetSearchOverlay(visible) => Some(*visible),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn instructions_visible(&self) -> bool {
        self.commands
            .iter()
            .rev()
            .find_map(|cmd| match cmd {
                RenderCommand::SetInstructionsVisible(visible) => Some(*visible),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn count(&self, command: &RenderCommand) -> usize {
        self.commands.iter().filter(|cmd| *cmd == command).count()
    }
}

impl SceneRenderer for RecordingRenderer {
    fn show_item(&mut self, item: &ItemView) {
        self.record(RenderCommand::ShowItem(item.clone()));
    }

    fn show_image(&mut self, reference: &str, footprint: Footprint) {
        self.record(RenderCommand::ShowImage { reference: reference.to_string(), footprint });
    }

    fn clear_item(&mut self) {
        self.record(RenderCommand::ClearItem);
    }

    fn set_camera_pose(&mut self, pose: Pose) {
        self.record(RenderCommand::SetCameraPose(pose));
    }

    fn set_look_enabled(&mut self, enabled: bool) {
        self.record(RenderCommand::SetLookEnabled(enabled));
    }

    fn set_search_overlay(&mut self, visible: bool) {
        self.record(RenderCommand::SetSearchOverlay(visible));
    }

    fn set_instructions_visible(&mut self, visible: bool) {
        self.record(RenderCommand::SetInstructionsVisible(visible));
    }
}

/// Reads image headers from local paths. Non-path references (URLs) are reported as failures.
#[derive(Debug, Default)]
pub struct FsImageLoader {
    pending: VecDeque<ImageReport>,
}

impl FsImageLoader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageLoader for FsImageLoader {
    fn request(&mut self, reference: &str) {
        let outcome = if reference.contains("://") {
            Err(format!("unsupported remote reference '{reference}'"))
        } else {
            image::image_dimensions(Path::new(reference)).map_err(|err| err.to_string())
        };
        self.pending.push_back(ImageReport { reference: reference.to_string(), outcome });
    }

    fn drain_reports(&mut self) -> Vec<ImageReport> {
        self.pending.drain(..).collect()
    }
}

/// Loader whose answers are scripted by the caller.
#[derive(Debug, Default)]
pub struct ManualImageLoader {
    requested: Vec<String>,
    pending: VecDeque<ImageReport>,
}

impl ManualImageLoader {
    pub fn requested(&self) -> &[String] {
        &self.requested
    }

    pub fn resolve(&mut self, reference: &str, width: u32, height: u32) {
        self.pending.push_back(ImageReport { reference: reference.to_string(), outcome: Ok((width, height)) });
    }

    pub fn fail(&mut self, reference: &str, reason: &str) {
        self.pending.push_back(ImageReport { reference: reference.to_string(), outcome: Err(reason.to_string()) });
    }
}

impl ImageLoader for ManualImageLoader {
    fn request(&mut self, reference: &str) {
        self.requested.push(reference.to_string());
    }

    fn drain_reports(&mut self) -> Vec<ImageReport> {
        self.pending.drain(..).collect()
    }
}
