use crate::{
    quat,
    skeleton::{AnimationKey, NodeAnimation},
    transform::RigidTransform,
};
use nalgebra_glm as glm;

/// Helper to calculate the parameter used for interpolation. Keys with the
/// same time give a finite weight clamped to the valid range.
fn weight(start: f32, end: f32, current: f32) -> f32 {
    const EPSILON: f32 = 0.0005;
    ((current - start) / (end - start).max(EPSILON)).clamp(0.0f32, 1.0f32)
}

/// Finds the keys either side of `time` and the weight of the second one.
///
/// The second key is the first one whose time is at or after `time`. Before
/// the first key the first key is used on its own, and after the last key
/// the last key is used on its own. Time is not looped here.
fn bracket(
    keys: &[AnimationKey],
    time: f32,
) -> Option<(&AnimationKey, &AnimationKey, f32)> {
    let last = keys.last()?;
    match keys.iter().position(|k| k.time >= time) {
        None => Some((last, last, 0.0)),
        Some(0) => Some((&keys[0], &keys[0], 0.0)),
        Some(i) => {
            let (k0, k1) = (&keys[i - 1], &keys[i]);
            Some((k0, k1, weight(k0.time, k1.time, time)))
        }
    }
}

/// Linearly interpolated translation at `time`. Returns `None` only for an
/// empty key list.
#[must_use]
pub fn sample_translation(keys: &[AnimationKey], time: f32) -> Option<glm::Vec3> {
    bracket(keys, time).map(|(k0, k1, t)| {
        glm::lerp(&k0.as_translation(), &k1.as_translation(), t)
    })
}

/// Spherically interpolated rotation at `time`. Returns `None` only for an
/// empty key list.
#[must_use]
pub fn sample_rotation(keys: &[AnimationKey], time: f32) -> Option<glm::Quat> {
    bracket(keys, time)
        .map(|(k0, k1, t)| quat::slerp(&k0.as_rotation(), &k1.as_rotation(), t))
}

/// Local transform of an animated node at `time`, rotation then translation
#[must_use]
pub fn animated_transform<T: RigidTransform>(
    animation: &NodeAnimation,
    time: f32,
) -> Option<T> {
    let translation = sample_translation(&animation.translation_keys, time)?;
    let rotation = sample_rotation(&animation.rotation_keys, time)?;
    Some(T::from_rotation_translation(&rotation, &translation))
}
