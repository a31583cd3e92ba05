use crate::quat;
use bytemuck::{Pod, Zeroable};
use nalgebra_glm as glm;

/// Dual quaternion
///
/// GLM has support in the `GLM_GTX_dual_quaternion` extension but this does not
/// seem to be available in the `nalgebra_glm` implementation. So the
/// functionality is implemented here on top of the `quat` module.
///
/// The layout is exactly eight `f32` values (real x,y,z,w then dual x,y,z,w)
/// with no padding, so a slice of these can be handed to a shader as a flat
/// float array with `bytemuck::cast_slice`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Zeroable, Pod)]
pub struct DualQuat {
    pub real: glm::Quat,
    pub dual: glm::Quat,
}

const _: () = assert!(std::mem::size_of::<DualQuat>() == 32);

impl Default for DualQuat {
    fn default() -> Self {
        Self::identity()
    }
}

impl DualQuat {
    /// Creates a unit dual quaternion that rotates by `rotation` and then
    /// translates by `translation`
    #[must_use]
    pub fn new(rotation: &glm::Quat, translation: &glm::Vec3) -> Self {
        // The dual part is based on d = 1/2 * t * r where t is the "pure"
        // quaternion version of the translation
        let half = quat::from_vector(&(translation * 0.5f32));
        Self {
            real: *rotation,
            dual: quat::mul(&half, rotation),
        }
    }

    /// No motion
    #[must_use]
    pub fn identity() -> Self {
        Self {
            // Real part contains the rotation
            real: quat::identity(),
            // Dual part contains the translation but is also effected by
            // the rotation
            dual: glm::quat(0.0, 0.0, 0.0, 0.0),
        }
    }
}

/// Conversion to GLSL shader ready mat2x4
impl From<DualQuat> for [[f32; 4]; 2] {
    fn from(dq: DualQuat) -> [[f32; 4]; 2] {
        [
            [dq.real.i, dq.real.j, dq.real.k, dq.real.w],
            [dq.dual.i, dq.dual.j, dq.dual.k, dq.dual.w],
        ]
    }
}

/// Conversion from a column major 4x4 rigid transform array
impl From<[[f32; 4]; 4]> for DualQuat {
    fn from(arr: [[f32; 4]; 4]) -> Self {
        let m: glm::Mat4 = arr.into();
        from_mat4(&m)
    }
}

#[must_use]
pub fn add(q1: &DualQuat, q2: &DualQuat) -> DualQuat {
    DualQuat {
        real: quat::add(&q1.real, &q2.real),
        dual: quat::add(&q1.dual, &q2.dual),
    }
}

/// Composition `q1 * q2`, which applies `q2` first and then `q1`
#[must_use]
pub fn mul(q1: &DualQuat, q2: &DualQuat) -> DualQuat {
    // ϵ squared is zero so only three of the four products remain
    DualQuat {
        real: quat::mul(&q1.real, &q2.real),
        dual: quat::add(
            &quat::mul(&q1.real, &q2.dual),
            &quat::mul(&q1.dual, &q2.real),
        ),
    }
}

/// Quaternion conjugate of both parts
#[must_use]
pub fn conjugate(q: &DualQuat) -> DualQuat {
    DualQuat {
        real: quat::conjugate(&q.real),
        dual: quat::conjugate(&q.dual),
    }
}

/// Combined quaternion and dual number conjugate. This is the one to use on
/// the right hand side of the sandwich product that transforms a point.
#[must_use]
pub fn conjugate_dual(q: &DualQuat) -> DualQuat {
    DualQuat {
        real: quat::conjugate(&q.real),
        dual: glm::quat(q.dual.i, q.dual.j, q.dual.k, -q.dual.w),
    }
}

/// Embeds a point in the dual part for use with `transform_point`
#[must_use]
pub fn from_vector(v: &glm::Vec3) -> DualQuat {
    DualQuat {
        real: quat::identity(),
        dual: quat::from_vector(v),
    }
}

/// Extracts a point embedded by `from_vector`
#[must_use]
pub fn to_vector(q: &DualQuat) -> glm::Vec3 {
    quat::to_vector(&q.dual)
}

/// Applies the rigid transform to a point using the sandwich product
#[must_use]
pub fn transform_point(q: &DualQuat, p: &glm::Vec3) -> glm::Vec3 {
    to_vector(&mul(&mul(q, &from_vector(p)), &conjugate_dual(q)))
}

/// Splits a unit dual quaternion into its rotation and translation
#[must_use]
pub fn decompose(q: &DualQuat) -> (glm::Quat, glm::Vec3) {
    let t = quat::mul(&quat::scale(&q.dual, 2.0), &quat::conjugate(&q.real));
    (q.real, quat::to_vector(&t))
}

/// Converts a rigid transform matrix (rotation and translation only) to a
/// unit dual quaternion. The rotation block must be a proper rotation, see
/// `quat::from_mat3`.
#[must_use]
pub fn from_mat4(m: &glm::Mat4) -> DualQuat {
    let rotation = quat::from_mat4(m);
    let half = glm::quat(
        m[(0, 3)] * 0.5,
        m[(1, 3)] * 0.5,
        m[(2, 3)] * 0.5,
        0.0,
    );
    DualQuat {
        real: rotation,
        dual: quat::mul(&half, &rotation),
    }
}

/// Converts a unit dual quaternion to a 4x4 rigid transform matrix
#[must_use]
pub fn to_mat4(q: &DualQuat) -> glm::Mat4 {
    let (rotation, translation) = decompose(q);
    let mut m = quat::to_mat4(&rotation);
    m[(0, 3)] = translation.x;
    m[(1, 3)] = translation.y;
    m[(2, 3)] = translation.z;
    m
}

/// Dual quaternion linear blending of two transforms with weight `t` on `q2`.
/// The blend is done on the short arc and the result is normalized so it stays
/// a rigid transform.
#[must_use]
pub fn dlb(q1: &DualQuat, q2: &DualQuat, t: f32) -> DualQuat {
    let w2 = if quat::dot(&q1.real, &q2.real) < 0.0 {
        -t
    } else {
        t
    };
    let blend = DualQuat {
        real: quat::add(
            &quat::scale(&q1.real, 1.0 - t),
            &quat::scale(&q2.real, w2),
        ),
        dual: quat::add(
            &quat::scale(&q1.dual, 1.0 - t),
            &quat::scale(&q2.dual, w2),
        ),
    };
    normalize(&blend)
}

/// Scales both parts by the inverse length of the real part. A zero length
/// real part is returned unchanged.
#[must_use]
pub fn normalize(q: &DualQuat) -> DualQuat {
    let len = quat::dot(&q.real, &q.real).sqrt();
    if len <= f32::EPSILON {
        return *q;
    }
    DualQuat {
        real: quat::scale(&q.real, 1.0 / len),
        dual: quat::scale(&q.dual, 1.0 / len),
    }
}
