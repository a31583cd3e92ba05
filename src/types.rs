use crate::skin_error::SkinError;
use serde::{Deserialize, Serialize};

/// Capacity of the per bone output buffers. A model must have strictly fewer
/// bones than this. The skinning shader uniform arrays are sized to match.
pub const MAX_BONES: usize = 60;

/// Representation used for the bone transforms handed to the renderer
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum SkinningMethod {
    /// Linear blend skinning with 4x4 matrices
    Matrix,
    /// Dual quaternion blending
    #[default]
    DualQuat,
}

/// Settings for a `PoseEvaluator`. Any field missing from a YAML document
/// keeps its default.
#[derive(Serialize, Deserialize, Copy, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct PoseOptions {
    /// Length of the looping clip in seconds
    pub clip_duration: f32,
    /// Multiplier applied to frame time before advancing the clip
    pub time_scalar: f32,
    /// The whole skeleton is moved down by this much to recentre it
    pub root_offset_y: f32,
    /// Representation used for the bone transforms
    pub method: SkinningMethod,
}

impl Default for PoseOptions {
    fn default() -> Self {
        Self {
            clip_duration: 1.26f32,
            time_scalar: 0.1f32,
            root_offset_y: 30.0f32,
            method: SkinningMethod::default(),
        }
    }
}

impl PoseOptions {
    /// Reads options from a YAML document
    ///
    /// # Errors
    /// May return `SkinError`
    pub fn from_yaml(s: &str) -> Result<Self, SkinError> {
        Ok(serde_yaml::from_str(s)?)
    }
}
