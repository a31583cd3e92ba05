//! Per frame bone transforms for skinned meshes.
//!
//! A `SkinnedModel` describes a node hierarchy, its keyframe animations and
//! the bones that deform the mesh. A `PoseEvaluator` advances a looping clip
//! clock and walks the hierarchy to produce one skinning transform per bone,
//! either as 4x4 matrices or as dual quaternions, ready to be uploaded to a
//! shader as a flat float array.
pub mod animation;
pub mod dualquat;
pub mod pose;
pub mod quat;
pub mod skeleton;
pub mod skin_error;
pub mod transform;
pub mod types;
