use crate::error::NavigatorError;
use crate::{wrap_index, Step};
use glam::Vec3;

/// Camera placement: position in scene units, rotation as Euler angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Pose {
    pub const fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    pub fn approx_eq(&self, other: &Pose, epsilon: f32) -> bool {
        self.position.abs_diff_eq(other.position, epsilon) && self.rotation.abs_diff_eq(other.rotation, epsilon)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO)
    }
}

/// Fixed touring sequence of vantage points with a wrapping cursor.
#[derive(Debug, Clone)]
pub struct ViewpointCycle {
    poses: Vec<Pose>,
    current: usize,
    search_index: usize,
}

impl ViewpointCycle {
    pub fn new(poses: Vec<Pose>, search_index: usize) -> Result<Self, NavigatorError> {
        if poses.is_empty() {
            return Err(NavigatorError::EmptyViewpoints);
        }
        if search_index >= poses.len() {
            return Err(NavigatorError::OutOfRange { index: search_index, len: poses.len() });
        }
        Ok(Self { poses, current: 0, search_index })
    }

    pub fn advance(&mut self, step: Step) -> Pose {
        self.current = wrap_index(self.current, self.poses.len(), step);
        self.poses[self.current]
    }

    /// Direct set that bypasses stepping; used for the search viewpoint.
    pub fn jump_to(&mut self, index: usize) -> Result<Pose, NavigatorError> {
        let pose = *self.poses.get(index).ok_or(NavigatorError::OutOfRange { index, len: self.poses.len() })?;
        self.current = index;
        Ok(pose)
    }

    pub fn current(&self) -> Pose {
        self.poses[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn search_index(&self) -> usize {
        self.search_index
    }
}
