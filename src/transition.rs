//! Pose interpolation driven by an external per-frame clock.
//!
//! A transition is a plain value sampled at a timestamp. Replacing it cancels it; there are no
//! timers to tear down.

use crate::render::SceneRenderer;
use crate::viewpoint::Pose;
use glam::Vec3;
use std::time::Duration;

const PITCH_LIMIT_DEGREES: f32 = 89.0;

#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in-out: accelerates through the first half, mirrors it in the second.
#[inline]
pub fn ease_in_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    EaseInOutQuad,
    EaseInOutCubic,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => linear(t),
            Easing::EaseInOutQuad => ease_in_out_quad(t),
            Easing::EaseInOutCubic => ease_in_out_cubic(t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: Vec3,
    pub to: Vec3,
    pub started_at: Duration,
    pub duration: Duration,
    pub easing: Easing,
}

impl Transition {
    pub fn new(from: Vec3, to: Vec3, started_at: Duration, duration: Duration, easing: Easing) -> Self {
        Self { from, to, started_at, duration, easing }
    }

    /// Raw progress in `[0, 1]`. Zero-length transitions are complete immediately.
    pub fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn sample(&self, now: Duration) -> Vec3 {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        self.from.lerp(self.to, self.easing.apply(t))
    }

    pub fn is_complete(&self, now: Duration) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Owns the live camera pose and at most one position and one rotation transition.
#[derive(Debug, Clone)]
pub struct TransitionEngine {
    live: Pose,
    position: Option<Transition>,
    rotation: Option<Transition>,
    duration: Duration,
    easing: Easing,
}

impl TransitionEngine {
    pub fn new(initial: Pose, duration: Duration, easing: Easing) -> Self {
        Self { live: initial, position: None, rotation: None, duration, easing }
    }

    /// Pose as it would be rendered at `now`, without advancing anything.
    pub fn live_pose(&self, now: Duration) -> Pose {
        Pose {
            position: self.position.map_or(self.live.position, |t| t.sample(now)),
            rotation: self.rotation.map_or(self.live.rotation, |t| t.sample(now)),
        }
    }

    /// Replaces any in-flight transitions with ones heading to `target`, starting from the live pose.
    pub fn start(&mut self, target: Pose, now: Duration) {
        let live = self.live_pose(now);
        self.live = live;
        self.position = Some(Transition::new(live.position, target.position, now, self.duration, self.easing));
        self.rotation = Some(Transition::new(live.rotation, target.rotation, now, self.duration, self.easing));
    }

    /// Advances active transitions and writes the interpolated pose. Returns whether anything is
    /// still animating. Does nothing when idle.
    pub fn tick(&mut self, now: Duration, renderer: &mut dyn SceneRenderer) -> bool {
        if !self.is_animating() {
            return false;
        }
        let pose = self.live_pose(now);
        self.live = pose;
        renderer.set_camera_pose(pose);
        if self.position.is_some_and(|t| t.is_complete(now)) {
            self.position = None;
        }
        if self.rotation.is_some_and(|t| t.is_complete(now)) {
            self.rotation = None;
        }
        self.is_animating()
    }

    /// Free-look steering: yaw/pitch deltas in degrees. Takes over rotation from any transition.
    pub fn apply_look(&mut self, yaw_degrees: f32, pitch_degrees: f32, now: Duration) -> Pose {
        let live = self.live_pose(now);
        self.rotation = None;
        self.live.rotation = Vec3::new(
            (live.rotation.x + pitch_degrees).clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES),
            live.rotation.y + yaw_degrees,
            live.rotation.z,
        );
        self.live_pose(now)
    }

    pub fn is_animating(&self) -> bool {
        self.position.is_some() || self.rotation.is_some()
    }

    pub fn position_transition(&self) -> Option<&Transition> {
        self.position.as_ref()
    }

    pub fn rotation_transition(&self) -> Option<&Transition> {
        self.rotation.as_ref()
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingRenderer;
    use approx::assert_relative_eq;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn pose(x: f32, yaw: f32) -> Pose {
        Pose::new(Vec3::new(x, 1.6, 2.0), Vec3::new(0.0, yaw, 0.0))
    }

    #[test]
    fn easing_is_symmetric_and_pinned() {
        for easing in [Easing::Linear, Easing::EaseInOutQuad, Easing::EaseInOutCubic] {
            assert_relative_eq!(easing.apply(0.0), 0.0);
            assert_relative_eq!(easing.apply(1.0), 1.0);
            assert_relative_eq!(easing.apply(0.5), 0.5, epsilon = 1e-6);
            assert_relative_eq!(easing.apply(0.2), 1.0 - easing.apply(0.8), epsilon = 1e-6);
        }
        assert!(ease_in_out_quad(0.25) < 0.25, "starts slow");
        assert!(ease_in_out_quad(0.75) > 0.75, "ends slow");
    }

    #[test]
    fn tick_reaches_target_and_goes_idle() {
        let mut engine = TransitionEngine::new(pose(0.0, 0.0), ms(1000), Easing::EaseInOutQuad);
        let mut renderer = RecordingRenderer::default();
        engine.start(pose(4.0, 90.0), ms(0));

        assert!(engine.tick(ms(500), &mut renderer));
        let mid = renderer.last_pose().expect("pose written");
        assert_relative_eq!(mid.position.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(mid.rotation.y, 45.0, epsilon = 1e-4);

        assert!(!engine.tick(ms(1000), &mut renderer));
        assert!(renderer.last_pose().expect("pose").approx_eq(&pose(4.0, 90.0), 1e-6));

        let writes = renderer.pose_writes();
        assert!(!engine.tick(ms(1500), &mut renderer));
        assert_eq!(renderer.pose_writes(), writes, "idle tick writes nothing");
    }

    #[test]
    fn restart_samples_live_value() {
        let mut engine = TransitionEngine::new(pose(0.0, 0.0), ms(1000), Easing::EaseInOutQuad);
        let mut renderer = RecordingRenderer::default();
        engine.start(pose(10.0, 0.0), ms(0));
        engine.tick(ms(100), &mut renderer);

        let live_at_cancel = engine.live_pose(ms(300));
        engine.start(pose(-10.0, 30.0), ms(300));

        let position = engine.position_transition().expect("position transition");
        assert_eq!(position.from, live_at_cancel.position);
        assert_eq!(position.started_at, ms(300));
        assert_eq!(engine.rotation_transition().expect("rotation").from, live_at_cancel.rotation);
        assert!(engine.live_pose(ms(300)).approx_eq(&live_at_cancel, 1e-6), "no visible jump");
    }

    #[test]
    fn zero_duration_snaps_on_next_tick() {
        let mut engine = TransitionEngine::new(pose(0.0, 0.0), Duration::ZERO, Easing::Linear);
        let mut renderer = RecordingRenderer::default();
        engine.start(pose(3.0, 10.0), ms(50));
        assert!(!engine.tick(ms(50), &mut renderer));
        assert_eq!(renderer.last_pose(), Some(pose(3.0, 10.0)));
    }

    #[test]
    fn look_takes_over_rotation_but_not_position() {
        let mut engine = TransitionEngine::new(pose(0.0, 0.0), ms(1000), Easing::Linear);
        engine.start(pose(10.0, 90.0), ms(0));
        let steered = engine.apply_look(5.0, 200.0, ms(500));
        assert!(engine.rotation_transition().is_none());
        assert!(engine.position_transition().is_some());
        assert_relative_eq!(steered.rotation.y, 50.0, epsilon = 1e-4);
        assert_relative_eq!(steered.rotation.x, PITCH_LIMIT_DEGREES);
    }
}
