//! Additional math helpers layered on top of `glam`.

use glam::{Mat4, Vec3};

/// World translation of each global joint transform.
pub fn joint_translations(frames: &[Mat4]) -> Vec<Vec3> {
    frames.iter().map(|frame| frame.w_axis.truncate()).collect()
}
