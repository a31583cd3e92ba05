use super::types::{
    Bone, DebugVertex, Mesh, ModelData, ModelNode, NodeAnimation,
};
use crate::{skin_error::SkinError, types::MAX_BONES};
use ahash::{HashMap, HashMapExt};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, path::Path};

/// A validated skinned model. The node tree is rooted at node 0 and encoded
/// with indices into the node list.
///
/// The only ways to get one are `new`, `from_yaml`, `load` or deserializing,
/// all of which check that every index is in range, that the hierarchy is a
/// tree and that the bone count fits in the output buffers. It is not
/// modified afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "ModelData", into = "ModelData")]
pub struct SkinnedModel {
    data: ModelData,
    names: HashMap<String, usize>,
}

impl TryFrom<ModelData> for SkinnedModel {
    type Error = SkinError;

    fn try_from(data: ModelData) -> Result<Self, Self::Error> {
        Self::new(data)
    }
}

impl From<SkinnedModel> for ModelData {
    fn from(model: SkinnedModel) -> Self {
        model.data
    }
}

impl SkinnedModel {
    /// Validates model data
    ///
    /// # Errors
    /// Returns `SkinError` describing the first problem found
    pub fn new(data: ModelData) -> Result<Self, SkinError> {
        validate(&data)?;
        let mut names = HashMap::new();
        for (index, node) in data.nodes.iter().enumerate() {
            // First node wins if names repeat
            names.entry(node.name.clone()).or_insert(index);
        }
        info!(
            "Model has {} nodes, {} bones, {} animations, {} meshes",
            data.nodes.len(),
            data.bones.len(),
            data.animations.len(),
            data.meshes.len()
        );
        Ok(Self { data, names })
    }

    /// Reads and validates a model from a YAML document
    ///
    /// # Errors
    /// May return `SkinError`
    pub fn from_yaml(s: &str) -> Result<Self, SkinError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Reads and validates a model from a YAML file
    ///
    /// # Errors
    /// May return `SkinError`
    pub fn load(path: &Path) -> Result<Self, SkinError> {
        let s = std::fs::read_to_string(path)?;
        Self::from_yaml(&s)
    }

    #[must_use]
    pub fn meshes(&self) -> &[Mesh] {
        &self.data.meshes
    }

    #[must_use]
    pub fn animations(&self) -> &[NodeAnimation] {
        &self.data.animations
    }

    #[must_use]
    pub fn nodes(&self) -> &[ModelNode] {
        &self.data.nodes
    }

    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.data.bones
    }

    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.data.bones.len()
    }

    /// Index of the first node with the given name
    #[must_use]
    pub fn node_index(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    /// Builds the line list for drawing the skeleton. Each parent to child
    /// link where both nodes have a bone gives a start and end vertex.
    #[must_use]
    pub fn skeleton_lines(&self) -> Vec<DebugVertex> {
        let nodes = &self.data.nodes;
        let mut lines = Vec::new();
        for node in nodes {
            let Some(parent_bone) = node.bone else {
                continue;
            };
            for &child in &node.children {
                if let Some(child_bone) = nodes[child].bone {
                    lines.push(bone_vertex(parent_bone));
                    lines.push(bone_vertex(child_bone));
                }
            }
        }
        lines
    }
}

// Bone indices are below `MAX_BONES` so they are exact as f32
#[allow(clippy::cast_precision_loss)]
fn bone_vertex(bone: usize) -> DebugVertex {
    DebugVertex {
        position: [0.0, 0.0, 0.0, bone as f32],
    }
}

fn validate(data: &ModelData) -> Result<(), SkinError> {
    if data.nodes.is_empty() {
        return Err(SkinError::NoRootNode);
    }
    if data.bones.len() >= MAX_BONES {
        return Err(SkinError::TooManyBones(data.bones.len()));
    }

    let mut bone_users = vec![0usize; data.bones.len()];
    for (node, info) in data.nodes.iter().enumerate() {
        if let Some(&child) =
            info.children.iter().find(|&&c| c >= data.nodes.len())
        {
            return Err(SkinError::ChildIndexOutOfRange { node, child });
        }
        if let Some(animation) = info.animation {
            if animation >= data.animations.len() {
                return Err(SkinError::AnimationIndexOutOfRange {
                    node,
                    animation,
                });
            }
        }
        if let Some(bone) = info.bone {
            let users = bone_users
                .get_mut(bone)
                .ok_or(SkinError::BoneIndexOutOfRange { node, bone })?;
            *users += 1;
            if *users == 2 {
                warn!("bone {bone} is used by more than one node");
            }
        }
    }

    for (index, animation) in data.animations.iter().enumerate() {
        if animation.translation_keys.is_empty()
            || animation.rotation_keys.is_empty()
        {
            return Err(SkinError::NoKeyframes(index));
        }
    }

    for (mesh, info) in data.meshes.iter().enumerate() {
        if let Some(&index) = info
            .indices
            .iter()
            .find(|&&i| usize::from(i) >= info.vertices.len())
        {
            return Err(SkinError::MeshIndexOutOfRange { mesh, index });
        }
    }

    // Walk from the root. Meeting a node twice means either a cycle or a node
    // with two parents, neither of which is a tree.
    let mut visited = vec![false; data.nodes.len()];
    visited[0] = true;
    let mut queue = VecDeque::from([0usize]);
    while let Some(node) = queue.pop_front() {
        for &child in &data.nodes[node].children {
            if visited[child] {
                return Err(SkinError::CyclicHierarchy(child));
            }
            visited[child] = true;
            queue.push_back(child);
        }
    }
    let unreachable = visited.iter().filter(|&&v| !v).count();
    if unreachable > 0 {
        warn!("{unreachable} nodes are not reachable from the root");
    }

    Ok(())
}
