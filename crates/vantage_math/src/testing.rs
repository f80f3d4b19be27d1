//! Helpers for tests.

use crate::{ClipConvention, Matrix4, MatrixProperties};
use nalgebra::{Matrix3, UnitQuaternion, Vector3, Vector4};
use proptest::prelude::*;

const ORTHONORMALITY_TOLERANCE: f64 = 1e-9;

/// Asserts that every property of the matrix holds for its elements and that
/// the properties are consistent with each other.
#[track_caller]
pub(crate) fn assert_properties_hold(matrix: &Matrix4) {
    let properties = matrix.properties();
    assert!(
        properties.is_consistent(),
        "inconsistent properties {properties:?}"
    );

    // Every exact pattern can be checked by inference, which only finds
    // orthonormality in the trivial case
    let exact = MatrixProperties::infer(matrix.elements());
    let claimed_exact = properties.difference(MatrixProperties::ORTHONORMAL);
    assert!(
        exact.contains(claimed_exact),
        "properties {properties:?} claimed, but only {exact:?} hold for\n{matrix}"
    );

    if properties.contains(MatrixProperties::ORTHONORMAL) {
        let block = matrix.matrix3();
        let deviation = (block.transpose() * block - Matrix3::identity()).abs().max();
        assert!(
            deviation <= ORTHONORMALITY_TOLERANCE,
            "ORTHONORMAL claimed, but the 3x3 block deviates by {deviation:e} for\n{matrix}"
        );
    }
}

prop_compose! {
    pub(crate) fn translation_strategy(max_coord: f64)(
        x in -max_coord..max_coord,
        y in -max_coord..max_coord,
        z in -max_coord..max_coord,
    ) -> Vector3<f64> {
        Vector3::new(x, y, z)
    }
}

prop_compose! {
    pub(crate) fn rotation_strategy()(
        roll in -std::f64::consts::PI..std::f64::consts::PI,
        pitch in -std::f64::consts::FRAC_PI_2..std::f64::consts::FRAC_PI_2,
        yaw in -std::f64::consts::PI..std::f64::consts::PI,
    ) -> UnitQuaternion<f64> {
        UnitQuaternion::from_euler_angles(roll, pitch, yaw)
    }
}

prop_compose! {
    pub(crate) fn scale_strategy()(
        x in 0.1..10.0_f64,
        y in 0.1..10.0,
        z in 0.1..10.0,
        flip in any::<bool>(),
    ) -> Vector3<f64> {
        Vector3::new(if flip { -x } else { x }, y, z)
    }
}

prop_compose! {
    pub(crate) fn translation_matrix_strategy()(
        translation in translation_strategy(1e2),
    ) -> Matrix4 {
        Matrix4::translation(translation.x, translation.y, translation.z)
    }
}

prop_compose! {
    pub(crate) fn rigid_matrix_strategy()(
        translation in translation_strategy(1e2),
        rotation in rotation_strategy(),
    ) -> Matrix4 {
        Matrix4::translation_rotate(&translation, &rotation)
    }
}

prop_compose! {
    pub(crate) fn affine_matrix_strategy()(
        translation in translation_strategy(1e2),
        rotation in rotation_strategy(),
        scale in scale_strategy(),
    ) -> Matrix4 {
        Matrix4::translation_rotate_scale(&translation, &rotation, &scale)
    }
}

prop_compose! {
    pub(crate) fn perspective_matrix_strategy()(
        fov_y in 0.2..2.5,
        aspect_ratio in 0.25..4.0,
        near in 0.01..1.0,
        depth in 1.0..1e3,
        convention in prop_oneof![
            Just(ClipConvention::OPENGL),
            Just(ClipConvention::VULKAN),
            Just(ClipConvention::DIRECTX),
        ],
    ) -> Matrix4 {
        Matrix4::perspective(fov_y, aspect_ratio, near, near + depth, convention)
    }
}

prop_compose! {
    pub(crate) fn frustum_matrix_strategy()(
        left in -2.0..-0.1,
        right in 0.1..2.0,
        bottom in -2.0..-0.1,
        top in 0.1..2.0,
        near in 0.01..1.0,
        depth in 1.0..1e3,
    ) -> Matrix4 {
        Matrix4::frustum(left, right, bottom, top, near, near + depth, ClipConvention::OPENGL)
    }
}

prop_compose! {
    /// A well-conditioned matrix whose elements follow no pattern.
    pub(crate) fn general_matrix_strategy()(
        translation in translation_strategy(1.0),
        rotation in rotation_strategy(),
        scale in prop::array::uniform3(0.5..2.0),
        last_row in prop::array::uniform3(-0.1..0.1),
    ) -> Matrix4 {
        let mut matrix =
            Matrix4::translation_rotate_scale(&translation, &rotation, &Vector3::from(scale));
        matrix.set_row(3, &Vector4::new(last_row[0], last_row[1], last_row[2], 2.0));
        matrix
    }
}

/// Any of the matrix kinds the properties distinguish, including the
/// identity.
pub(crate) fn any_matrix_strategy() -> impl Strategy<Value = Matrix4> {
    prop_oneof![
        Just(Matrix4::identity()),
        translation_matrix_strategy(),
        rigid_matrix_strategy(),
        affine_matrix_strategy(),
        perspective_matrix_strategy(),
        frustum_matrix_strategy(),
        general_matrix_strategy(),
    ]
}
