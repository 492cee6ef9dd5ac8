use crate::transition::Easing;
use crate::viewpoint::Pose;
use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vec3Data {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3Data {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<Vec3Data> for Vec3 {
    fn from(value: Vec3Data) -> Self {
        Vec3::new(value.x, value.y, value.z)
    }
}

impl From<Vec3> for Vec3Data {
    fn from(value: Vec3) -> Self {
        Self { x: value.x, y: value.y, z: value.z }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseData {
    pub position: Vec3Data,
    #[serde(default)]
    pub rotation: Vec3Data,
}

impl From<PoseData> for Pose {
    fn from(value: PoseData) -> Self {
        Pose::new(value.position.into(), value.rotation.into())
    }
}

const fn pose(position: (f32, f32, f32), rotation: (f32, f32, f32)) -> PoseData {
    PoseData {
        position: Vec3Data::new(position.0, position.1, position.2),
        rotation: Vec3Data::new(rotation.0, rotation.1, rotation.2),
    }
}

/// Touring sequence of the reference gallery room; the last entry overlooks the search panel.
const DEFAULT_VIEWPOINTS: [PoseData; 10] = [
    pose((0.0, 1.6, 2.0), (0.0, 0.0, 0.0)),
    pose((0.0, 1.6, 0.5), (0.0, 0.0, 0.0)),
    pose((0.0, 1.6, 2.0), (0.0, 0.0, 0.0)),
    pose((2.0, 1.3, 0.1), (0.0, 45.0, 0.0)),
    pose((0.0, 1.6, 2.0), (0.0, 0.0, 0.0)),
    pose((-2.0, 1.3, 0.1), (0.0, -45.0, 0.0)),
    pose((0.0, 1.6, 2.0), (0.0, 0.0, 0.0)),
    pose((0.0, 0.0, 0.0), (0.0, 0.0, 0.0)),
    pose((0.0, 1.6, 2.0), (0.0, 0.0, 0.0)),
    pose((0.0, 1.3, 4.0), (-45.0, 0.0, 0.0)),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingKind {
    Linear,
    EaseInOutQuad,
    EaseInOutCubic,
}

impl From<EasingKind> for Easing {
    fn from(kind: EasingKind) -> Self {
        match kind {
            EasingKind::Linear => Easing::Linear,
            EasingKind::EaseInOutQuad => Easing::EaseInOutQuad,
            EasingKind::EaseInOutCubic => Easing::EaseInOutCubic,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionConfig {
    #[serde(default = "TransitionConfig::default_duration_ms")]
    pub duration_ms: u64,
    #[serde(default = "TransitionConfig::default_easing")]
    pub easing: EasingKind,
}

impl TransitionConfig {
    const fn default_duration_ms() -> u64 {
        1000
    }

    fn default_easing() -> EasingKind {
        EasingKind::EaseInOutQuad
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self { duration_ms: Self::default_duration_ms(), easing: Self::default_easing() }
    }
}

/// What happens to a pending search-modal opening when the mode changes during the settle delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SettlePolicy {
    #[default]
    AlwaysFire,
    CancelOnModeChange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "SearchConfig::default_viewpoint_index")]
    pub viewpoint_index: usize,
    #[serde(default = "SearchConfig::default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default)]
    pub settle_policy: SettlePolicy,
}

impl SearchConfig {
    const fn default_viewpoint_index() -> usize {
        9
    }

    const fn default_settle_delay_ms() -> u64 {
        1000
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            viewpoint_index: Self::default_viewpoint_index(),
            settle_delay_ms: Self::default_settle_delay_ms(),
            settle_policy: SettlePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "DisplayConfig::default_max_width")]
    pub max_width: f32,
    #[serde(default = "DisplayConfig::default_max_height")]
    pub max_height: f32,
}

impl DisplayConfig {
    const fn default_max_width() -> f32 {
        4.0
    }

    const fn default_max_height() -> f32 {
        3.0
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { max_width: Self::default_max_width(), max_height: Self::default_max_height() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    #[serde(default = "GalleryConfig::default_viewpoints")]
    pub viewpoints: Vec<PoseData>,
    #[serde(default)]
    pub transition: TransitionConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub collection_path: Option<PathBuf>,
    #[serde(default)]
    pub bindings_path: Option<PathBuf>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            viewpoints: Self::default_viewpoints(),
            transition: TransitionConfig::default(),
            search: SearchConfig::default(),
            display: DisplayConfig::default(),
            collection_path: None,
            bindings_path: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GalleryConfigOverrides {
    pub collection_path: Option<PathBuf>,
    pub bindings_path: Option<PathBuf>,
    pub transition_ms: Option<u64>,
}

impl GalleryConfig {
    fn default_viewpoints() -> Vec<PoseData> {
        DEFAULT_VIEWPOINTS.to_vec()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!("Config load error: {err:#}. Falling back to defaults.");
                Self::default()
            }
        }
    }

    pub fn poses(&self) -> Vec<Pose> {
        self.viewpoints.iter().copied().map(Pose::from).collect()
    }

    pub fn apply_overrides(&mut self, overrides: &GalleryConfigOverrides) {
        if let Some(path) = &overrides.collection_path {
            self.collection_path = Some(path.clone());
        }
        if let Some(path) = &overrides.bindings_path {
            self.bindings_path = Some(path.clone());
        }
        if let Some(ms) = overrides.transition_ms {
            self.transition.duration_ms = ms;
            self.search.settle_delay_ms = ms;
        }
    }
}

impl GalleryConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.collection_path.is_none() && self.bindings_path.is_none() && self.transition_ms.is_none()
    }

    pub fn applied_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.collection_path.is_some() {
            fields.push("collection");
        }
        if self.bindings_path.is_some() {
            fields.push("bindings");
        }
        if self.transition_ms.is_some() {
            fields.push("transition_ms");
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_reference_room() {
        let cfg = GalleryConfig::default();
        assert_eq!(cfg.viewpoints.len(), 10);
        assert_eq!(cfg.search.viewpoint_index, 9);
        assert_eq!(cfg.transition.duration(), Duration::from_millis(1000));
        assert_eq!(cfg.search.settle_delay(), cfg.transition.duration());
        let search = cfg.poses()[9];
        assert_eq!(search.position, Vec3::new(0.0, 1.3, 4.0));
        assert_eq!(search.rotation, Vec3::new(-45.0, 0.0, 0.0));
    }

    #[test]
    fn partial_file_keeps_field_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp config");
        write!(file, r#"{{"search":{{"settle_delay_ms":250,"settle_policy":"cancel_on_mode_change"}}}}"#)
            .expect("write config");
        let cfg = GalleryConfig::load(file.path()).expect("load config");
        assert_eq!(cfg.search.settle_delay_ms, 250);
        assert_eq!(cfg.search.settle_policy, SettlePolicy::CancelOnModeChange);
        assert_eq!(cfg.search.viewpoint_index, 9);
        assert_eq!(cfg.viewpoints.len(), 10);
        assert_eq!(cfg.display.max_width, 4.0);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp config");
        write!(file, "{{ not json").expect("write config");
        assert!(GalleryConfig::load(file.path()).is_err());
        let cfg = GalleryConfig::load_or_default(file.path());
        assert_eq!(cfg.viewpoints.len(), 10);
    }

    #[test]
    fn overrides_replace_paths_and_timings() {
        let mut cfg = GalleryConfig::default();
        let overrides = GalleryConfigOverrides {
            collection_path: Some(PathBuf::from("paintings.json")),
            bindings_path: None,
            transition_ms: Some(400),
        };
        cfg.apply_overrides(&overrides);
        assert_eq!(cfg.collection_path.as_deref(), Some(Path::new("paintings.json")));
        assert_eq!(cfg.transition.duration_ms, 400);
        assert_eq!(cfg.search.settle_delay_ms, 400);
        assert_eq!(overrides.applied_fields(), vec!["collection", "transition_ms"]);
    }
}
