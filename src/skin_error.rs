use std::{error, fmt};

/// Unified error type
///
/// Model data problems are reported when a `SkinnedModel` is built so that
/// pose evaluation can assume a well formed hierarchy. The evaluator still
/// checks bone slots as it writes them and returns an error instead of
/// writing outside its buffers.
#[derive(Debug)]
pub enum SkinError {
    NoRootNode,
    TooManyBones(usize),
    BoneIndexOutOfRange { node: usize, bone: usize },
    ChildIndexOutOfRange { node: usize, child: usize },
    AnimationIndexOutOfRange { node: usize, animation: usize },
    CyclicHierarchy(usize),
    NoKeyframes(usize),
    MeshIndexOutOfRange { mesh: usize, index: u16 },
    BoneCountMismatch { expected: usize, found: usize },
    InvalidDuration(f32),
    SerdeYamlError(Box<serde_yaml::Error>),
    StdIoError(std::io::Error),
}

impl error::Error for SkinError {}

impl fmt::Display for SkinError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NoRootNode => write!(f, "model has no nodes"),
            Self::TooManyBones(a) => write!(
                f,
                "model has {a} bones but must have fewer than {}",
                crate::types::MAX_BONES
            ),
            Self::BoneIndexOutOfRange { node, bone } => {
                write!(f, "node {node} refers to missing bone {bone}")
            }
            Self::ChildIndexOutOfRange { node, child } => {
                write!(f, "node {node} refers to missing child {child}")
            }
            Self::AnimationIndexOutOfRange { node, animation } => {
                write!(f, "node {node} refers to missing animation {animation}")
            }
            Self::CyclicHierarchy(a) => {
                write!(f, "node {a} is reachable more than once from the root")
            }
            Self::NoKeyframes(a) => {
                write!(f, "animation {a} has an empty key list")
            }
            Self::MeshIndexOutOfRange { mesh, index } => {
                write!(f, "mesh {mesh} refers to missing vertex {index}")
            }
            Self::BoneCountMismatch { expected, found } => write!(
                f,
                "bone buffers hold {expected} bones but model has {found}"
            ),
            Self::InvalidDuration(a) => {
                write!(f, "clip duration {a} must be finite and positive")
            }
            Self::SerdeYamlError(e) => {
                write!(f, "serde_yaml::Error: {e}")
            }
            Self::StdIoError(e) => write!(f, "std::io::Error: {}", e.kind()),
        }
    }
}

impl From<serde_yaml::Error> for SkinError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::SerdeYamlError(Box::new(e))
    }
}

impl From<std::io::Error> for SkinError {
    fn from(e: std::io::Error) -> Self {
        Self::StdIoError(e)
    }
}
