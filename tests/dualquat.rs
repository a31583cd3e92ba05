//! Tests for dualquat module
//!
//! Most checks compare a dual quaternion against the equivalent 4x4 matrix
//! built with nalgebra, since that is the representation the skinning
//! results have to agree with.
//!
//! Plain values like `glm::quat(1.0, 2.0, 3.0, 4.0)` are used where the maths
//! does not need a unit dual quaternion, because they are easy to check by
//! hand. The compiler infers f32 for them from the `DualQuat` fields.

use dqskin::{
    dualquat::{self, DualQuat},
    quat,
};
use log::info;
use nalgebra_glm as glm;
use std::sync::Once;

const EPSILON: f32 = 0.0001f32; // Small value for float comparisons
static INIT: Once = Once::new();

/// Initializes logging in a "once per test run" manner. Call at the start of
/// each test that needs logging.
fn init_tests() {
    INIT.call_once(|| {
        env_logger::init();
    });
}

/// A unit dual quaternion times its conjugate is the identity
fn check_unit(dq: &DualQuat) {
    let unit = dualquat::mul(dq, &dualquat::conjugate(dq));
    compare(&unit, &DualQuat::identity());
}

fn compare(dq1: &DualQuat, dq2: &DualQuat) {
    let c = glm::quat_equal_eps(&dq1.real, &dq2.real, EPSILON);
    assert!(c.x && c.y && c.z && c.w, "{dq1:?} != {dq2:?}");
    let c = glm::quat_equal_eps(&dq1.dual, &dq2.dual, EPSILON);
    assert!(c.x && c.y && c.z && c.w, "{dq1:?} != {dq2:?}");
}

fn compare_mat4(m1: &glm::Mat4, m2: &glm::Mat4) {
    let c = glm::equal_columns_eps(m1, m2, EPSILON);
    assert!(c.x && c.y && c.z && c.w, "{m1:?} != {m2:?}");
}

fn compare_vec3(v1: &glm::Vec3, v2: &glm::Vec3) {
    let c = glm::equal_eps(v1, v2, EPSILON);
    assert!(c.x && c.y && c.z, "{v1:?} != {v2:?}");
}

/// Rotation by `rot` followed by translation by `trans`, as a matrix
fn rigid_matrix(rot: &glm::Quat, trans: &glm::Vec3) -> glm::Mat4 {
    glm::translation(trans) * glm::quat_to_mat4(rot)
}

/// Tests `DualQuat::default` and `DualQuat::identity`
#[test]
fn identity() {
    let dq = DualQuat::default();
    assert_eq!(dq, DualQuat::identity());
    assert_eq!(dq.real, glm::Quat::identity());
    assert_eq!(dq.dual, glm::quat(0.0f32, 0.0f32, 0.0f32, 0.0f32));

    let p = glm::vec3(3.0f32, -2.0f32, 0.5f32);
    assert_eq!(dualquat::transform_point(&dq, &p), p);
    assert_eq!(dualquat::to_mat4(&dq), glm::Mat4::identity());
}

/// Tests `DualQuat::new`
#[test]
fn new() {
    init_tests();

    let rot = quat::from_axis_angle(
        &glm::normalize(&glm::vec3(0.62f32, -0.25f32, 0.74f32)),
        -1.491f32,
    );
    let trans = glm::vec3(-12.6f32, 4.2f32, 0.004f32);
    let dq = DualQuat::new(&rot, &trans);
    info!("new dq={:?}", dq);

    check_unit(&dq);

    // d = 1/2 * t * r with t the translation as a pure quaternion
    let pure = glm::quat(trans.x, trans.y, trans.z, 0.0f32);
    let expected = DualQuat {
        real: rot,
        dual: 0.5f32 * pure * rot,
    };
    compare(&dq, &expected);

    let (r, t) = dualquat::decompose(&dq);
    assert_eq!(r, rot);
    compare_vec3(&t, &trans);
}

/// Tests conversion to a GLSL mat2x4 friendly array
#[test]
fn from_for_glsl() {
    let dq = DualQuat {
        real: glm::quat(1.0, 2.0, 3.0, 4.0),
        dual: glm::quat(5.0, 6.0, 7.0, 8.0),
    };
    let m: [[f32; 4]; 2] = dq.into();
    assert_eq!(m, [[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0]]);

    // Same order as the flat float view used for uniform uploads
    let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&dq));
    assert_eq!(floats[..4], m[0]);
    assert_eq!(floats[4..], m[1]);
}

/// Tests conversion from a column major matrix array
#[test]
fn from_for_array() {
    init_tests();

    // Rounded matrix entries are not quite orthonormal, so build the rigid
    // transform and take its columns
    let m = glm::translation(&glm::vec3(5.0f32, 7.0f32, 9.0f32))
        * glm::rotation(-1.2043f32, &glm::vec3(1.0f32, 0.0f32, 0.0f32));
    let arr: [[f32; 4]; 4] = m.into();
    assert_eq!(arr[3], [5.0f32, 7.0f32, 9.0f32, 1.0f32]);
    let dq1 = dualquat::from_mat4(&m);
    let dq2: DualQuat = arr.into();
    info!("from_for_array dq1={:?} dq2={:?}", dq1, dq2);
    compare(&dq1, &dq2);

    let (_, t) = dualquat::decompose(&dq2);
    compare_vec3(&t, &glm::vec3(5.0, 7.0, 9.0));

    // Not a rigid transform, so the result means nothing, but it must still
    // come out finite
    let arr: [[f32; 4]; 4] = [
        [3.0f32, 0.0f32, 8.0f32, 0.0f32],
        [0.0f32, 4.0f32, 5.0f32, 0.0f32],
        [9.0f32, 6.0f32, 7.0f32, 0.0f32],
        [0.0f32, 1.0f32, 2.0f32, 1.0f32],
    ];
    let dq: DualQuat = arr.into();
    let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&dq));
    assert!(floats.iter().all(|f| f.is_finite()));
}

/// Tests `dualquat::add`, which is component wise
#[test]
fn add() {
    let dq1 = DualQuat {
        real: glm::quat(1.0, 2.0, 3.0, 4.0),
        dual: glm::quat(-1.0, -2.0, -3.0, -4.0),
    };
    let dq2 = DualQuat {
        real: glm::quat(4.0, 3.0, 2.0, 1.0),
        dual: glm::quat(-4.0, -3.0, -2.0, -1.0),
    };
    let res = dualquat::add(&dq1, &dq2);
    assert_eq!(res.real, glm::quat(5.0, 5.0, 5.0, 5.0));
    assert_eq!(res.dual, glm::quat(-5.0, -5.0, -5.0, -5.0));
}

/// Tests `dualquat::mul`
#[test]
fn mul() {
    // [r1 * r2] + [r1 * d2 + d1 * r2]ϵ
    let dq1 = DualQuat {
        real: glm::quat(1.0, 2.0, 3.0, 4.0),
        dual: glm::quat(-1.0, -2.0, -3.0, -4.0),
    };
    let dq2 = DualQuat {
        real: glm::quat(4.0, 3.0, 2.0, 1.0),
        dual: glm::quat(-4.0, -3.0, -2.0, -1.0),
    };
    let res = dualquat::mul(&dq1, &dq2);
    assert_eq!(res.real, glm::quat(12.0, 24.0, 6.0, -12.0));
    assert_eq!(res.dual, glm::quat(-24.0, -48.0, -12.0, 24.0));

    // Agrees with nalgebra's quaternion product
    assert_eq!(res.real, dq1.real * dq2.real);
}

/// Composition applies the right hand transform first, like matrices
#[test]
fn mul_composes_like_matrices() {
    let rot_a = quat::from_axis_angle(&glm::vec3(0.0, 0.0, 1.0), 0.9);
    let trans_a = glm::vec3(1.0f32, 2.0, 3.0);
    let rot_b = quat::from_axis_angle(&glm::vec3(1.0, 0.0, 0.0), -0.4);
    let trans_b = glm::vec3(-4.0f32, 0.5, 2.0);

    let dq = dualquat::mul(
        &DualQuat::new(&rot_a, &trans_a),
        &DualQuat::new(&rot_b, &trans_b),
    );
    check_unit(&dq);
    let m = rigid_matrix(&rot_a, &trans_a) * rigid_matrix(&rot_b, &trans_b);
    compare_mat4(&dualquat::to_mat4(&dq), &m);
}

/// Tests `dualquat::conjugate` and `dualquat::conjugate_dual`
#[test]
fn conjugate() {
    let dq = DualQuat {
        real: glm::quat(1.0, 2.0, 3.0, 4.0),
        dual: glm::quat(5.0, 6.0, 7.0, 8.0),
    };

    // Quaternion conjugate of each part
    let conj = dualquat::conjugate(&dq);
    assert_eq!(conj.real, glm::quat(-1.0, -2.0, -3.0, 4.0));
    assert_eq!(conj.dual, glm::quat(-5.0, -6.0, -7.0, 8.0));
    assert_eq!(conj.real, glm::quat_conjugate(&dq.real));

    // Quaternion and dual number conjugate together, which negates only the
    // scalar of the dual part
    let conj = dualquat::conjugate_dual(&dq);
    assert_eq!(conj.real, glm::quat(-1.0, -2.0, -3.0, 4.0));
    assert_eq!(conj.dual, glm::quat(5.0, 6.0, 7.0, -8.0));
}

/// Tests `dualquat::transform_point` with a translation only
#[test]
fn transform_translation() {
    let dq = DualQuat::new(&quat::identity(), &glm::vec3(10.0, -2.0, 0.5));
    let p = dualquat::transform_point(&dq, &glm::vec3(1.0, 1.0, 1.0));
    compare_vec3(&p, &glm::vec3(11.0, -1.0, 1.5));
}

/// Tests `dualquat::transform_point` with a rotation only
#[test]
fn transform_rotation() {
    let rot =
        quat::from_axis_angle(&glm::vec3(0.0, 1.0, 0.0), std::f32::consts::FRAC_PI_2);
    let dq = DualQuat::new(&rot, &glm::vec3(0.0, 0.0, 0.0));
    let p = dualquat::transform_point(&dq, &glm::vec3(1.0, 0.0, 0.0));
    compare_vec3(&p, &glm::vec3(0.0, 0.0, -1.0));
}

/// Tests `dualquat::transform_point` with rotation then translation
#[test]
fn transform_rotation_translation() {
    init_tests();

    let rot = quat::from_axis_angle(
        &glm::normalize(&glm::vec3(0.3, -1.0, 0.25)),
        2.2,
    );
    let trans = glm::vec3(-3.5f32, 8.0f32, 1.25f32);
    let dq = DualQuat::new(&rot, &trans);

    let p = glm::vec3(0.75f32, -1.5f32, 4.0f32);
    let by_dq = dualquat::transform_point(&dq, &p);
    let by_matrix =
        glm::vec4_to_vec3(&(rigid_matrix(&rot, &trans) * glm::vec4(p.x, p.y, p.z, 1.0)));
    info!("transform_rotation_translation {:?} {:?}", by_dq, by_matrix);
    compare_vec3(&by_dq, &by_matrix);
    compare_vec3(&by_dq, &(quat::rotate(&rot, &p) + trans));
}

/// Tests `dualquat::to_mat4`
#[test]
fn to_mat4() {
    init_tests();

    // Rotation only matches glm's conversion
    for (angle, axis) in [
        (0.752f32, glm::vec3(0.0f32, 0.0, 1.0)),
        (-0.314f32, glm::vec3(1.0f32, 0.0, 0.0)),
        (0.0808f32, glm::vec3(0.0f32, 1.0, 0.0)),
    ] {
        let dq = DualQuat::new(
            &quat::from_axis_angle(&axis, angle),
            &glm::vec3(0.0, 0.0, 0.0),
        );
        compare_mat4(&dualquat::to_mat4(&dq), &glm::quat_to_mat4(&dq.real));
    }

    let rot = quat::from_axis_angle(
        &glm::vec3(0.811107f32, 0.486664f32, 0.324443f32),
        std::f32::consts::FRAC_PI_3,
    );
    let trans = glm::vec3(14.2f32, -3.36f32, 18.9f32);
    let m1 = rigid_matrix(&rot, &trans);
    let m2 = dualquat::to_mat4(&DualQuat::new(&rot, &trans));
    info!("to_mat4 m1={:?} m2={:?}", m1, m2);
    compare_mat4(&m1, &m2);
}

/// Tests `dualquat::from_mat4`
#[test]
fn from_mat4() {
    let m1 = glm::Mat4::identity();
    let m1 = glm::translate(&m1, &glm::vec3(31.0f32, -19.25f32, -0.34f32));
    let m1 = glm::rotate_z(&m1, -0.261f32);
    let m1 = glm::rotate_x(&m1, 1.42f32);

    let dq = dualquat::from_mat4(&m1);
    check_unit(&dq);
    compare_mat4(&dualquat::to_mat4(&dq), &m1);
}

/// Tests `dualquat::dlb` blending between two rotations
#[test]
fn dlb() {
    let z = glm::vec3(0.0f32, 0.0, 1.0);
    let a = DualQuat::new(&quat::identity(), &glm::vec3(0.0, 0.0, 0.0));
    let b = DualQuat::new(
        &quat::from_axis_angle(&z, std::f32::consts::FRAC_PI_2),
        &glm::vec3(0.0, 0.0, 0.0),
    );

    compare(&dualquat::dlb(&a, &b, 0.0), &a);
    compare(&dualquat::dlb(&a, &b, 1.0), &b);

    let half = dualquat::dlb(&a, &b, 0.5);
    check_unit(&half);
    let expected = quat::from_axis_angle(&z, std::f32::consts::FRAC_PI_4);
    let c = glm::quat_equal_eps(&half.real, &expected, EPSILON);
    assert!(c.x && c.y && c.z && c.w);
}
