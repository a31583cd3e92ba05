mod model;
mod types;

// Re-exports
pub use {
    model::SkinnedModel,
    types::{
        AnimationKey, Bone, DebugVertex, Mesh, ModelData, ModelNode,
        NodeAnimation, Vertex,
    },
};
