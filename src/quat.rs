//! Quaternion algebra used for rotations
//!
//! These functions operate on `glm::Quat` (x, y, z, w storage order) but
//! implement the algebra directly instead of going through the nalgebra
//! operators, so that the exact formulas used for skinning are visible here and
//! are shared by the dual quaternion code.
//!
//! Quaternions used as rotations are expected to be unit length. Nothing here
//! normalizes its input.
use nalgebra_glm as glm;

/// Dot product above which `slerp` falls back to normalized linear blending
const SLERP_LINEAR_THRESHOLD: f32 = 0.9995;

/// Creates a quaternion from components stored verbatim
#[must_use]
pub fn new(x: f32, y: f32, z: f32, w: f32) -> glm::Quat {
    glm::quat(x, y, z, w)
}

/// The no rotation quaternion (0, 0, 0, 1)
#[must_use]
pub fn identity() -> glm::Quat {
    glm::quat(0.0, 0.0, 0.0, 1.0)
}

/// Creates a unit quaternion for a rotation of `angle` radians about `axis`
/// using the right hand rule. `axis` must already be unit length.
#[must_use]
pub fn from_axis_angle(axis: &glm::Vec3, angle: f32) -> glm::Quat {
    let half = angle * 0.5;
    let (s, c) = half.sin_cos();
    glm::quat(s * axis.x, s * axis.y, s * axis.z, c)
}

/// Embeds a vector as a "pure" quaternion with a zero scalar part
#[must_use]
pub fn from_vector(v: &glm::Vec3) -> glm::Quat {
    glm::quat(v.x, v.y, v.z, 0.0)
}

/// Extracts the vector part of a quaternion
#[must_use]
pub fn to_vector(q: &glm::Quat) -> glm::Vec3 {
    glm::vec3(q.i, q.j, q.k)
}

/// Component wise sum
#[must_use]
pub fn add(a: &glm::Quat, b: &glm::Quat) -> glm::Quat {
    glm::quat(a.i + b.i, a.j + b.j, a.k + b.k, a.w + b.w)
}

/// Multiplies every component by a scalar
#[must_use]
pub fn scale(q: &glm::Quat, s: f32) -> glm::Quat {
    glm::quat(q.i * s, q.j * s, q.k * s, q.w * s)
}

/// Hamilton product `a * b`. Not commutative.
#[must_use]
pub fn mul(a: &glm::Quat, b: &glm::Quat) -> glm::Quat {
    glm::quat(
        a.j * b.k - a.k * b.j + a.w * b.i + a.i * b.w,
        a.k * b.i - a.i * b.k + a.w * b.j + a.j * b.w,
        a.i * b.j - a.j * b.i + a.w * b.k + a.k * b.w,
        a.w * b.w - a.i * b.i - a.j * b.j - a.k * b.k,
    )
}

/// Negates the vector part. For a unit quaternion this is the inverse.
#[must_use]
pub fn conjugate(q: &glm::Quat) -> glm::Quat {
    glm::quat(-q.i, -q.j, -q.k, q.w)
}

/// Four component dot product
#[must_use]
pub fn dot(a: &glm::Quat, b: &glm::Quat) -> f32 {
    a.i * b.i + a.j * b.j + a.k * b.k + a.w * b.w
}

/// Rotates a vector with the sandwich product `q * v * conjugate(q)`
#[must_use]
pub fn rotate(q: &glm::Quat, v: &glm::Vec3) -> glm::Vec3 {
    to_vector(&mul(&mul(q, &from_vector(v)), &conjugate(q)))
}

/// Spherical linear interpolation along the shortest arc. When the inputs are
/// nearly parallel a normalized linear blend is used instead, since the arc
/// formula divides by the sine of a tiny angle.
#[must_use]
pub fn slerp(a: &glm::Quat, b: &glm::Quat, t: f32) -> glm::Quat {
    let mut cos_theta = dot(a, b);
    let b = if cos_theta < 0.0 {
        cos_theta = -cos_theta;
        scale(b, -1.0)
    } else {
        *b
    };

    if cos_theta > SLERP_LINEAR_THRESHOLD {
        let q = add(&scale(a, 1.0 - t), &scale(&b, t));
        let len = dot(&q, &q).sqrt();
        return scale(&q, 1.0 / len);
    }

    let theta = cos_theta.clamp(-1.0, 1.0).acos();
    let sin_theta = theta.sin();
    let wa = ((1.0 - t) * theta).sin() / sin_theta;
    let wb = (t * theta).sin() / sin_theta;
    add(&scale(a, wa), &scale(&b, wb))
}

/// Converts a unit quaternion to a 3x3 rotation matrix. The result is
/// meaningless for a quaternion that is not unit length.
#[must_use]
pub fn to_mat3(q: &glm::Quat) -> glm::Mat3 {
    let (x, y, z, w) = (q.i, q.j, q.k, q.w);
    // `Mat3::new` takes its arguments in row order
    glm::Mat3::new(
        1.0 - 2.0 * (y * y + z * z),
        2.0 * (x * y - w * z),
        2.0 * (x * z + w * y),
        2.0 * (x * y + w * z),
        1.0 - 2.0 * (x * x + z * z),
        2.0 * (y * z - w * x),
        2.0 * (x * z - w * y),
        2.0 * (y * z + w * x),
        1.0 - 2.0 * (x * x + y * y),
    )
}

/// Converts a unit quaternion to a 4x4 rotation matrix with no translation
#[must_use]
pub fn to_mat4(q: &glm::Quat) -> glm::Mat4 {
    glm::mat3_to_mat4(&to_mat3(q))
}

/// Converts a proper rotation matrix (orthogonal, determinant +1) to a unit
/// quaternion.
///
/// The branch is chosen so that the divisor `s` comes from the largest of the
/// trace and the three diagonal elements. Input that is not a proper rotation
/// gives an unspecified (possibly non-finite) result.
#[must_use]
pub fn from_mat3(m: &glm::Mat3) -> glm::Quat {
    let trace = m[(0, 0)] + m[(1, 1)] + m[(2, 2)];
    if trace > 0.0 {
        let s = (trace + 1.0).sqrt() * 2.0;
        glm::quat(
            (m[(2, 1)] - m[(1, 2)]) / s,
            (m[(0, 2)] - m[(2, 0)]) / s,
            (m[(1, 0)] - m[(0, 1)]) / s,
            0.25 * s,
        )
    } else if m[(0, 0)] > m[(1, 1)] && m[(0, 0)] > m[(2, 2)] {
        let s = (m[(0, 0)] - m[(1, 1)] - m[(2, 2)] + 1.0).sqrt() * 2.0;
        glm::quat(
            0.25 * s,
            (m[(0, 1)] + m[(1, 0)]) / s,
            (m[(0, 2)] + m[(2, 0)]) / s,
            (m[(2, 1)] - m[(1, 2)]) / s,
        )
    } else if m[(1, 1)] > m[(2, 2)] {
        let s = (m[(1, 1)] - m[(0, 0)] - m[(2, 2)] + 1.0).sqrt() * 2.0;
        glm::quat(
            (m[(0, 1)] + m[(1, 0)]) / s,
            0.25 * s,
            (m[(1, 2)] + m[(2, 1)]) / s,
            (m[(0, 2)] - m[(2, 0)]) / s,
        )
    } else {
        let s = (m[(2, 2)] - m[(0, 0)] - m[(1, 1)] + 1.0).sqrt() * 2.0;
        glm::quat(
            (m[(0, 2)] + m[(2, 0)]) / s,
            (m[(1, 2)] + m[(2, 1)]) / s,
            0.25 * s,
            (m[(1, 0)] - m[(0, 1)]) / s,
        )
    }
}

/// Converts the rotation block of a 4x4 matrix to a unit quaternion. Any
/// translation is ignored. See `from_mat3` for the input requirements.
#[must_use]
pub fn from_mat4(m: &glm::Mat4) -> glm::Quat {
    from_mat3(&glm::mat4_to_mat3(m))
}
