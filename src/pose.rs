mod buffer;
mod clock;
mod evaluator;

// Re-exports
pub use {
    buffer::{BoneOutput, BoneTransforms},
    clock::{wrap, AnimationClock},
    evaluator::{evaluate, Pose, PoseEvaluator},
};
