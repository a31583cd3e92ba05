use crate::quat;
use bytemuck::{Pod, Zeroable};
use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};

/// Vertex as stored by the asset tool. `bones` packs the bone ids and weights
/// in the format the skinning shader expects.
#[repr(C)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod, Serialize, Deserialize,
)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub bones: [f32; 4],
    pub uv: [f32; 2],
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
    pub albedo_texture: String,
}

/// One keyframe. `value` is a translation in x,y,z or a rotation quaternion
/// in x,y,z,w depending on which key list it is in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationKey {
    pub value: glm::Vec4,
    pub time: f32,
}

impl AnimationKey {
    #[must_use]
    pub fn translation(time: f32, t: &glm::Vec3) -> Self {
        Self {
            value: glm::vec4(t.x, t.y, t.z, 0.0),
            time,
        }
    }

    #[must_use]
    pub fn rotation(time: f32, q: &glm::Quat) -> Self {
        Self {
            value: q.coords,
            time,
        }
    }

    #[must_use]
    pub fn as_translation(&self) -> glm::Vec3 {
        glm::vec4_to_vec3(&self.value)
    }

    #[must_use]
    pub fn as_rotation(&self) -> glm::Quat {
        quat::new(self.value.x, self.value.y, self.value.z, self.value.w)
    }
}

/// Key lists for one animated node. Times within each list are expected to
/// be non-decreasing. The two lists are sampled independently.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeAnimation {
    pub translation_keys: Vec<AnimationKey>,
    pub rotation_keys: Vec<AnimationKey>,
}

fn identity() -> glm::Mat4 {
    glm::Mat4::identity()
}

/// A node of the hierarchy. Nodes without a bone are pivots that only pass
/// their transform on to their children. Nodes without an animation use
/// `default_transform` every frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelNode {
    pub name: String,
    #[serde(default)]
    pub children: Vec<usize>,
    #[serde(default = "identity")]
    pub default_transform: glm::Mat4,
    #[serde(default)]
    pub animation: Option<usize>,
    #[serde(default)]
    pub bone: Option<usize>,
}

impl Default for ModelNode {
    fn default() -> Self {
        Self {
            name: String::new(),
            children: Vec::new(),
            default_transform: identity(),
            animation: None,
            bone: None,
        }
    }
}

/// `offset` is the inverse bind pose, taking a vertex from model space into
/// the bone's space at rest
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub offset: glm::Mat4,
}

impl Default for Bone {
    fn default() -> Self {
        Self { offset: identity() }
    }
}

/// Unvalidated model contents, as read from a file or assembled in code.
/// Convert to a `SkinnedModel` before use.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelData {
    #[serde(default)]
    pub meshes: Vec<Mesh>,
    #[serde(default)]
    pub animations: Vec<NodeAnimation>,
    pub nodes: Vec<ModelNode>,
    #[serde(default)]
    pub bones: Vec<Bone>,
}

/// Line end point for drawing the skeleton. The position is the origin with
/// the bone index in `w`, to be moved by that bone's debug matrix.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod)]
pub struct DebugVertex {
    pub position: [f32; 4],
}
