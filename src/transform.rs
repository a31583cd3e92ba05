//! The operations the pose evaluator needs from a transform representation.
//!
//! Both 4x4 matrices and dual quaternions implement `RigidTransform`, so the
//! hierarchy walk is written once and the representation is chosen by a type
//! parameter. Offsets and default node transforms are always stored as
//! matrices, which is why conversion from a matrix is part of the trait.
use crate::{
    dualquat::{self, DualQuat},
    quat,
};
use bytemuck::Pod;
use nalgebra_glm as glm;

pub trait RigidTransform: Copy + Pod + std::fmt::Debug {
    /// No motion
    fn identity() -> Self;

    /// `self * rhs`, which applies `rhs` first
    #[must_use]
    fn compose(&self, rhs: &Self) -> Self;

    /// Converts a rigid 4x4 matrix
    fn from_mat4(m: &glm::Mat4) -> Self;

    /// Converts to a rigid 4x4 matrix
    fn to_mat4(&self) -> glm::Mat4;

    /// Rotation followed by translation
    fn from_rotation_translation(
        rotation: &glm::Quat,
        translation: &glm::Vec3,
    ) -> Self;

    /// Applies the transform to a point
    fn transform_point(&self, p: &glm::Vec3) -> glm::Vec3;
}

impl RigidTransform for glm::Mat4 {
    fn identity() -> Self {
        Self::identity()
    }

    fn compose(&self, rhs: &Self) -> Self {
        self * rhs
    }

    fn from_mat4(m: &glm::Mat4) -> Self {
        *m
    }

    fn to_mat4(&self) -> glm::Mat4 {
        *self
    }

    fn from_rotation_translation(
        rotation: &glm::Quat,
        translation: &glm::Vec3,
    ) -> Self {
        let mut m = quat::to_mat4(rotation);
        m[(0, 3)] = translation.x;
        m[(1, 3)] = translation.y;
        m[(2, 3)] = translation.z;
        m
    }

    fn transform_point(&self, p: &glm::Vec3) -> glm::Vec3 {
        let v = self * glm::vec4(p.x, p.y, p.z, 1.0);
        glm::vec3(v.x, v.y, v.z)
    }
}

impl RigidTransform for DualQuat {
    fn identity() -> Self {
        Self::identity()
    }

    fn compose(&self, rhs: &Self) -> Self {
        dualquat::mul(self, rhs)
    }

    fn from_mat4(m: &glm::Mat4) -> Self {
        dualquat::from_mat4(m)
    }

    fn to_mat4(&self) -> glm::Mat4 {
        dualquat::to_mat4(self)
    }

    fn from_rotation_translation(
        rotation: &glm::Quat,
        translation: &glm::Vec3,
    ) -> Self {
        Self::new(rotation, translation)
    }

    fn transform_point(&self, p: &glm::Vec3) -> glm::Vec3 {
        dualquat::transform_point(self, p)
    }
}

/// Translation only matrix
#[must_use]
pub fn translation(t: &glm::Vec3) -> glm::Mat4 {
    glm::translation(t)
}

#[cfg(test)]
mod tests {
    use super::RigidTransform;
    use crate::{dualquat::DualQuat, quat};
    use nalgebra_glm as glm;

    const EPSILON: f32 = 0.0001_f32;

    fn both<T: RigidTransform>() -> glm::Vec3 {
        let a = T::from_rotation_translation(
            &quat::from_axis_angle(&glm::vec3(0.0, 1.0, 0.0), 0.9),
            &glm::vec3(1.0, 2.0, 3.0),
        );
        let b = T::from_mat4(&super::translation(&glm::vec3(0.5, 0.0, -1.0)));
        a.compose(&b).transform_point(&glm::vec3(-2.0, 0.25, 4.0))
    }

    #[test]
    fn representations_agree() {
        let m = both::<glm::Mat4>();
        let d = both::<DualQuat>();
        let c = glm::equal_eps(&m, &d, EPSILON);
        assert!(c.x && c.y && c.z);
    }

    #[test]
    fn identity_transform_point() {
        let p = glm::vec3(3.0f32, -4.0, 5.0);
        let dq = <DualQuat as RigidTransform>::identity();
        assert_eq!(RigidTransform::transform_point(&dq, &p), p);
        // Matrices have an inherent `transform_point` taking a point type
        let m = <glm::Mat4 as RigidTransform>::identity();
        assert_eq!(RigidTransform::transform_point(&m, &p), p);
    }
}
