use crate::{
    dualquat::DualQuat, skin_error::SkinError, transform::RigidTransform,
    types::MAX_BONES, types::SkinningMethod,
};
use nalgebra_glm as glm;

/// Per bone transforms with fixed capacity. Only the first `len` entries are
/// live, and only those can be read or written.
#[derive(Clone, Copy, Debug)]
pub struct BoneTransforms<T> {
    data: [T; MAX_BONES],
    len: usize,
}

impl<T: RigidTransform> BoneTransforms<T> {
    /// Creates a buffer of `len` identity transforms
    ///
    /// # Errors
    /// Returns `SkinError::TooManyBones` unless `len` is less than `MAX_BONES`
    pub fn new(len: usize) -> Result<Self, SkinError> {
        if len >= MAX_BONES {
            return Err(SkinError::TooManyBones(len));
        }
        Ok(Self {
            data: std::array::from_fn(|_| T::identity()),
            len,
        })
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data[..self.len]
    }

    /// Mutable access to a live entry
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data[..self.len].get_mut(index)
    }

    /// The live entries as one contiguous float array
    #[must_use]
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(self.as_slice())
    }
}

/// Bone transforms in whichever representation was evaluated
#[derive(Clone, Copy, Debug)]
pub enum BoneOutput<'a> {
    Matrix(&'a [glm::Mat4]),
    DualQuat(&'a [DualQuat]),
}

impl<'a> BoneOutput<'a> {
    #[must_use]
    pub const fn method(&self) -> SkinningMethod {
        match self {
            Self::Matrix(_) => SkinningMethod::Matrix,
            Self::DualQuat(_) => SkinningMethod::DualQuat,
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Self::Matrix(m) => m.len(),
            Self::DualQuat(d) => d.len(),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat float view for upload as a uniform array. Matrices are 16 floats
    /// each in column order, dual quaternions 8 floats each (real then dual).
    #[must_use]
    pub fn as_floats(&self) -> &'a [f32] {
        match *self {
            Self::Matrix(m) => bytemuck::cast_slice(m),
            Self::DualQuat(d) => bytemuck::cast_slice(d),
        }
    }

    /// One bone's transform as a matrix
    #[must_use]
    pub fn to_mat4(&self, index: usize) -> Option<glm::Mat4> {
        match self {
            Self::Matrix(m) => m.get(index).copied(),
            Self::DualQuat(d) => d.get(index).map(RigidTransform::to_mat4),
        }
    }

    /// Every bone's transform as a matrix
    #[must_use]
    pub fn to_mat4_vec(&self) -> Vec<glm::Mat4> {
        match self {
            Self::Matrix(m) => m.to_vec(),
            Self::DualQuat(d) => d.iter().map(RigidTransform::to_mat4).collect(),
        }
    }
}
