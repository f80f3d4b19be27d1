//! Translation, scaling, rotation and reflection, both as builders and
//! applied to existing transforms.

use super::{IDENTITY_ELEMENTS, Matrix4, kernels::mul_3x3};
use crate::properties::MatrixProperties;
use nalgebra::{Point3, UnitQuaternion, UnitVector3, Vector3, Vector4};

/// Rotation about the given unit axis as a column-major 3x3 block.
pub(super) fn axis_angle_3x3(angle: f64, axis: &UnitVector3<f64>) -> [f64; 9] {
    let (sin, cos) = angle.sin_cos();
    let one_minus_cos = 1.0 - cos;
    let (x, y, z) = (axis.x, axis.y, axis.z);
    let (xy, xz, yz) = (x * y, x * z, y * z);
    [
        cos + x * x * one_minus_cos,
        xy * one_minus_cos + z * sin,
        xz * one_minus_cos - y * sin,
        xy * one_minus_cos - z * sin,
        cos + y * y * one_minus_cos,
        yz * one_minus_cos + x * sin,
        xz * one_minus_cos + y * sin,
        yz * one_minus_cos - x * sin,
        cos + z * z * one_minus_cos,
    ]
}

pub(super) fn rotation_x_3x3(angle: f64) -> [f64; 9] {
    let (sin, cos) = angle.sin_cos();
    [1.0, 0.0, 0.0, 0.0, cos, sin, 0.0, -sin, cos]
}

pub(super) fn rotation_y_3x3(angle: f64) -> [f64; 9] {
    let (sin, cos) = angle.sin_cos();
    [cos, 0.0, -sin, 0.0, 1.0, 0.0, sin, 0.0, cos]
}

pub(super) fn rotation_z_3x3(angle: f64) -> [f64; 9] {
    let (sin, cos) = angle.sin_cos();
    [cos, sin, 0.0, -sin, cos, 0.0, 0.0, 0.0, 1.0]
}

/// Rotation represented by the unit quaternion as a column-major 3x3 block.
pub(super) fn quaternion_3x3(rotation: &UnitQuaternion<f64>) -> [f64; 9] {
    let (w, x, y, z) = (rotation.w, rotation.i, rotation.j, rotation.k);
    let (xx, yy, zz) = (x * x, y * y, z * z);
    let (xy, xz, yz) = (x * y, x * z, y * z);
    let (xw, yw, zw) = (x * w, y * w, z * w);
    [
        1.0 - 2.0 * (yy + zz),
        2.0 * (xy + zw),
        2.0 * (xz - yw),
        2.0 * (xy - zw),
        1.0 - 2.0 * (xx + zz),
        2.0 * (yz + xw),
        2.0 * (xz + yw),
        2.0 * (yz - xw),
        1.0 - 2.0 * (xx + yy),
    ]
}

fn all_unit_magnitude(x: f64, y: f64, z: f64) -> bool {
    x.abs() == 1.0 && y.abs() == 1.0 && z.abs() == 1.0
}

impl Matrix4 {
    /// Creates the affine transform with the given column-major 3x3 block
    /// and no translation, known to be orthonormal.
    pub(super) fn from_rotation_3x3(rotation: &[f64; 9]) -> Self {
        let mut elements = IDENTITY_ELEMENTS;
        for column in 0..3 {
            elements[column * 4..column * 4 + 3]
                .copy_from_slice(&rotation[column * 3..column * 3 + 3]);
        }
        Self::with_properties(elements, MatrixProperties::RIGID_MATRIX)
    }

    /// Creates a translation matrix.
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        let mut elements = IDENTITY_ELEMENTS;
        elements[12] = x;
        elements[13] = y;
        elements[14] = z;
        Self::with_properties(elements, MatrixProperties::TRANSLATION_MATRIX)
    }

    /// Creates a non-uniform scaling matrix.
    pub fn scaling(x: f64, y: f64, z: f64) -> Self {
        let mut elements = IDENTITY_ELEMENTS;
        elements[0] = x;
        elements[5] = y;
        elements[10] = z;
        let mut properties = MatrixProperties::infer(&elements);
        if all_unit_magnitude(x, y, z) {
            properties |= MatrixProperties::ORTHONORMAL;
        }
        Self::with_properties(elements, properties)
    }

    /// Creates a uniform scaling matrix.
    #[inline]
    pub fn uniform_scaling(scale: f64) -> Self {
        Self::scaling(scale, scale, scale)
    }

    /// Creates a rotation of `angle` radians about the given axis,
    /// counterclockwise when looking along the axis towards the origin.
    pub fn rotation(angle: f64, axis: &UnitVector3<f64>) -> Self {
        Self::from_rotation_3x3(&axis_angle_3x3(angle, axis))
    }

    #[inline]
    pub fn from_axis_angle(axis: &UnitVector3<f64>, angle: f64) -> Self {
        Self::rotation(angle, axis)
    }

    /// Creates a rotation of `angle` radians about the x-axis.
    pub fn rotation_x(angle: f64) -> Self {
        Self::from_rotation_3x3(&rotation_x_3x3(angle))
    }

    /// Creates a rotation of `angle` radians about the y-axis.
    pub fn rotation_y(angle: f64) -> Self {
        Self::from_rotation_3x3(&rotation_y_3x3(angle))
    }

    /// Creates a rotation of `angle` radians about the z-axis.
    pub fn rotation_z(angle: f64) -> Self {
        Self::from_rotation_3x3(&rotation_z_3x3(angle))
    }

    /// Creates the rotation `Rx * Ry * Rz`, which rotates about the z-axis
    /// first.
    pub fn rotation_xyz(angle_x: f64, angle_y: f64, angle_z: f64) -> Self {
        Self::from_rotation_3x3(&xyz_3x3(angle_x, angle_y, angle_z))
    }

    /// Creates the rotation `Rz * Ry * Rx`, which rotates about the x-axis
    /// first.
    pub fn rotation_zyx(angle_z: f64, angle_y: f64, angle_x: f64) -> Self {
        Self::from_rotation_3x3(&zyx_3x3(angle_z, angle_y, angle_x))
    }

    /// Creates the rotation `Ry * Rx * Rz`, which rotates about the z-axis
    /// first.
    pub fn rotation_yxz(angle_y: f64, angle_x: f64, angle_z: f64) -> Self {
        Self::from_rotation_3x3(&yxz_3x3(angle_y, angle_x, angle_z))
    }

    /// Creates the rotation represented by the unit quaternion.
    pub fn from_quaternion(rotation: &UnitQuaternion<f64>) -> Self {
        Self::from_rotation_3x3(&quaternion_3x3(rotation))
    }

    /// Creates the rotation `T(origin) * R * T(-origin)` about the given
    /// point.
    pub fn rotation_around(rotation: &UnitQuaternion<f64>, origin: &Point3<f64>) -> Self {
        Self::translation(origin.x, origin.y, origin.z)
            .rotated_quaternion(rotation)
            .translated(-origin.x, -origin.y, -origin.z)
    }

    /// Creates the rigid transform `T * R`.
    pub fn translation_rotate(translation: &Vector3<f64>, rotation: &UnitQuaternion<f64>) -> Self {
        let mut matrix = Self::from_quaternion(rotation);
        matrix.elements[12..15].copy_from_slice(translation.as_slice());
        matrix
    }

    /// Creates the transform `T * R * S`.
    pub fn translation_rotate_scale(
        translation: &Vector3<f64>,
        rotation: &UnitQuaternion<f64>,
        scale: &Vector3<f64>,
    ) -> Self {
        let rotation = quaternion_3x3(rotation);
        let mut elements = IDENTITY_ELEMENTS;
        for column in 0..3 {
            for row in 0..3 {
                elements[column * 4 + row] = rotation[column * 3 + row] * scale[column];
            }
        }
        elements[12..15].copy_from_slice(translation.as_slice());

        let mut properties = MatrixProperties::AFFINE;
        if all_unit_magnitude(scale.x, scale.y, scale.z) {
            properties |= MatrixProperties::ORTHONORMAL;
        }
        Self::with_properties(elements, properties)
    }

    /// Creates the inverse of `T * R * S` directly from its components.
    pub fn translation_rotate_scale_inverted(
        translation: &Vector3<f64>,
        rotation: &UnitQuaternion<f64>,
        scale: &Vector3<f64>,
    ) -> Self {
        let rotation = quaternion_3x3(rotation);
        let mut elements = IDENTITY_ELEMENTS;
        for column in 0..3 {
            for row in 0..3 {
                elements[column * 4 + row] = rotation[row * 3 + column] / scale[row];
            }
        }
        for row in 0..3 {
            elements[12 + row] = -(elements[row] * translation.x
                + elements[4 + row] * translation.y
                + elements[8 + row] * translation.z);
        }

        let mut properties = MatrixProperties::AFFINE;
        if all_unit_magnitude(scale.x, scale.y, scale.z) {
            properties |= MatrixProperties::ORTHONORMAL;
        }
        Self::with_properties(elements, properties)
    }

    /// Creates a reflection about the plane `a*x + b*y + c*z + d = 0` given
    /// as `(a, b, c, d)`. The plane equation is normalized first.
    pub fn reflection(plane: &Vector4<f64>) -> Self {
        let inv_length = 1.0 / plane.xyz().norm();
        let (a, b, c, d) = (
            plane.x * inv_length,
            plane.y * inv_length,
            plane.z * inv_length,
            plane.w * inv_length,
        );
        let (da, db, dc) = (-2.0 * a, -2.0 * b, -2.0 * c);

        #[rustfmt::skip]
        let elements = [
            da * a + 1.0, db * a,       dc * a,       0.0,
            da * b,       db * b + 1.0, dc * b,       0.0,
            da * c,       db * c,       dc * c + 1.0, 0.0,
            da * d,       db * d,       dc * d,       1.0,
        ];
        Self::with_properties(elements, MatrixProperties::RIGID_MATRIX)
    }

    /// Creates a reflection about the plane through `point` with the given
    /// normal.
    pub fn reflection_about(normal: &UnitVector3<f64>, point: &Point3<f64>) -> Self {
        let d = -normal.dot(&point.coords);
        Self::reflection(&Vector4::new(normal.x, normal.y, normal.z, d))
    }

    /// Computes `self * T`, applying the translation before this transform.
    pub fn translated(&self, x: f64, y: f64, z: f64) -> Self {
        if self.properties.contains(MatrixProperties::IDENTITY) {
            return Self::translation(x, y, z);
        }
        let mut elements = self.elements;
        for row in 0..4 {
            elements[12 + row] = self.elements[row] * x
                + self.elements[4 + row] * y
                + self.elements[8 + row] * z
                + self.elements[12 + row];
        }
        let properties =
            self.properties & !(MatrixProperties::PERSPECTIVE | MatrixProperties::IDENTITY);
        Self::with_properties(elements, properties)
    }

    /// Computes `T * self`, applying the translation after this transform.
    pub fn translated_local(&self, x: f64, y: f64, z: f64) -> Self {
        if self.properties.contains(MatrixProperties::IDENTITY) {
            return Self::translation(x, y, z);
        }
        let mut elements = self.elements;
        for column in 0..4 {
            let w = self.elements[column * 4 + 3];
            elements[column * 4] += x * w;
            elements[column * 4 + 1] += y * w;
            elements[column * 4 + 2] += z * w;
        }
        let properties =
            self.properties & !(MatrixProperties::PERSPECTIVE | MatrixProperties::IDENTITY);
        Self::with_properties(elements, properties)
    }

    /// Computes `self * S`, applying the scaling before this transform.
    pub fn scaled(&self, x: f64, y: f64, z: f64) -> Self {
        if self.properties.contains(MatrixProperties::IDENTITY) {
            return Self::scaling(x, y, z);
        }
        let mut elements = self.elements;
        for (column, factor) in [x, y, z].into_iter().enumerate() {
            for value in &mut elements[column * 4..column * 4 + 4] {
                *value *= factor;
            }
        }
        Self::with_properties(elements, self.scaled_properties(x, y, z))
    }

    /// Computes `self * S` for a uniform scaling.
    #[inline]
    pub fn scaled_uniform(&self, scale: f64) -> Self {
        self.scaled(scale, scale, scale)
    }

    /// Computes `S * self`, applying the scaling after this transform.
    pub fn scaled_local(&self, x: f64, y: f64, z: f64) -> Self {
        if self.properties.contains(MatrixProperties::IDENTITY) {
            return Self::scaling(x, y, z);
        }
        let mut elements = self.elements;
        for column in 0..4 {
            elements[column * 4] *= x;
            elements[column * 4 + 1] *= y;
            elements[column * 4 + 2] *= z;
        }
        Self::with_properties(elements, self.scaled_properties(x, y, z))
    }

    /// Computes `self * T(origin) * S * T(-origin)`, scaling about the given
    /// point.
    pub fn scaled_around(&self, scale: &Vector3<f64>, origin: &Point3<f64>) -> Self {
        self.translated(origin.x, origin.y, origin.z)
            .scaled(scale.x, scale.y, scale.z)
            .translated(-origin.x, -origin.y, -origin.z)
    }

    fn scaled_properties(&self, x: f64, y: f64, z: f64) -> MatrixProperties {
        let mut cleared =
            MatrixProperties::PERSPECTIVE | MatrixProperties::IDENTITY | MatrixProperties::TRANSLATION;
        if !all_unit_magnitude(x, y, z) {
            cleared |= MatrixProperties::ORTHONORMAL;
        }
        self.properties & !cleared
    }

    /// Computes `self * R` for the given column-major 3x3 rotation block.
    fn rotated_by(&self, rotation: &[f64; 9]) -> Self {
        let properties = self.properties;

        if properties.contains(MatrixProperties::IDENTITY) {
            return Self::from_rotation_3x3(rotation);
        }

        if properties.contains(MatrixProperties::TRANSLATION) {
            let mut matrix = Self::from_rotation_3x3(rotation);
            matrix.elements[12..15].copy_from_slice(&self.elements[12..15]);
            return matrix;
        }

        // The affine kernel leaves the last row untouched
        let rows = if properties.contains(MatrixProperties::AFFINE) {
            3
        } else {
            4
        };

        let mut elements = self.elements;
        for column in 0..3 {
            for row in 0..rows {
                elements[column * 4 + row] = self.elements[row] * rotation[column * 3]
                    + self.elements[4 + row] * rotation[column * 3 + 1]
                    + self.elements[8 + row] * rotation[column * 3 + 2];
            }
        }

        let properties = properties
            & !(MatrixProperties::IDENTITY
                | MatrixProperties::PERSPECTIVE
                | MatrixProperties::TRANSLATION);
        Self::with_properties(elements, properties)
    }

    /// Computes `R * self` for the given column-major 3x3 rotation block.
    fn rotated_local_by(&self, rotation: &[f64; 9]) -> Self {
        if self.properties.contains(MatrixProperties::IDENTITY) {
            return Self::from_rotation_3x3(rotation);
        }

        let mut elements = self.elements;
        for column in 0..4 {
            let values = &self.elements[column * 4..column * 4 + 3];
            for row in 0..3 {
                elements[column * 4 + row] = rotation[row] * values[0]
                    + rotation[3 + row] * values[1]
                    + rotation[6 + row] * values[2];
            }
        }

        let properties =
            self.properties & (MatrixProperties::AFFINE | MatrixProperties::ORTHONORMAL);
        Self::with_properties(elements, properties)
    }

    /// Computes `self * R` for a rotation of `angle` radians about the given
    /// axis.
    pub fn rotated(&self, angle: f64, axis: &UnitVector3<f64>) -> Self {
        self.rotated_by(&axis_angle_3x3(angle, axis))
    }

    /// Computes `self * Rx`.
    pub fn rotated_x(&self, angle: f64) -> Self {
        self.rotated_by(&rotation_x_3x3(angle))
    }

    /// Computes `self * Ry`.
    pub fn rotated_y(&self, angle: f64) -> Self {
        self.rotated_by(&rotation_y_3x3(angle))
    }

    /// Computes `self * Rz`.
    pub fn rotated_z(&self, angle: f64) -> Self {
        self.rotated_by(&rotation_z_3x3(angle))
    }

    /// Computes `self * Rx * Ry * Rz`.
    pub fn rotated_xyz(&self, angle_x: f64, angle_y: f64, angle_z: f64) -> Self {
        self.rotated_by(&xyz_3x3(angle_x, angle_y, angle_z))
    }

    /// Computes `self * Rz * Ry * Rx`.
    pub fn rotated_zyx(&self, angle_z: f64, angle_y: f64, angle_x: f64) -> Self {
        self.rotated_by(&zyx_3x3(angle_z, angle_y, angle_x))
    }

    /// Computes `self * Ry * Rx * Rz`.
    pub fn rotated_yxz(&self, angle_y: f64, angle_x: f64, angle_z: f64) -> Self {
        self.rotated_by(&yxz_3x3(angle_y, angle_x, angle_z))
    }

    /// Computes `self * R` for the rotation represented by the quaternion.
    pub fn rotated_quaternion(&self, rotation: &UnitQuaternion<f64>) -> Self {
        self.rotated_by(&quaternion_3x3(rotation))
    }

    /// Computes `self * T(origin) * R * T(-origin)`, rotating about the
    /// given point.
    pub fn rotated_around(&self, rotation: &UnitQuaternion<f64>, origin: &Point3<f64>) -> Self {
        self.translated(origin.x, origin.y, origin.z)
            .rotated_quaternion(rotation)
            .translated(-origin.x, -origin.y, -origin.z)
    }

    /// Computes `R * self` for a rotation of `angle` radians about the given
    /// axis.
    pub fn rotated_local(&self, angle: f64, axis: &UnitVector3<f64>) -> Self {
        self.rotated_local_by(&axis_angle_3x3(angle, axis))
    }

    /// Computes `Rx * self`.
    pub fn rotated_local_x(&self, angle: f64) -> Self {
        self.rotated_local_by(&rotation_x_3x3(angle))
    }

    /// Computes `Ry * self`.
    pub fn rotated_local_y(&self, angle: f64) -> Self {
        self.rotated_local_by(&rotation_y_3x3(angle))
    }

    /// Computes `Rz * self`.
    pub fn rotated_local_z(&self, angle: f64) -> Self {
        self.rotated_local_by(&rotation_z_3x3(angle))
    }

    /// Computes `R * self` for the rotation represented by the quaternion.
    pub fn rotated_local_quaternion(&self, rotation: &UnitQuaternion<f64>) -> Self {
        self.rotated_local_by(&quaternion_3x3(rotation))
    }

    /// Computes `self * F` for a reflection `F` about the given plane.
    pub fn reflected(&self, plane: &Vector4<f64>) -> Self {
        self.multiplied(&Self::reflection(plane))
    }
}

fn xyz_3x3(angle_x: f64, angle_y: f64, angle_z: f64) -> [f64; 9] {
    mul_3x3(
        &rotation_x_3x3(angle_x),
        &mul_3x3(&rotation_y_3x3(angle_y), &rotation_z_3x3(angle_z)),
    )
}

fn zyx_3x3(angle_z: f64, angle_y: f64, angle_x: f64) -> [f64; 9] {
    mul_3x3(
        &rotation_z_3x3(angle_z),
        &mul_3x3(&rotation_y_3x3(angle_y), &rotation_x_3x3(angle_x)),
    )
}

fn yxz_3x3(angle_y: f64, angle_x: f64, angle_z: f64) -> [f64; 9] {
    mul_3x3(
        &rotation_y_3x3(angle_y),
        &mul_3x3(&rotation_x_3x3(angle_x), &rotation_z_3x3(angle_z)),
    )
}

impl_in_place_variants!(
    Matrix4,
    translate => translated(x: f64, y: f64, z: f64);
    translate_local => translated_local(x: f64, y: f64, z: f64);
    scale => scaled(x: f64, y: f64, z: f64);
    scale_uniform => scaled_uniform(scale: f64);
    scale_local => scaled_local(x: f64, y: f64, z: f64);
    scale_around => scaled_around(scale: &Vector3<f64>, origin: &Point3<f64>);
    rotate => rotated(angle: f64, axis: &UnitVector3<f64>);
    rotate_x => rotated_x(angle: f64);
    rotate_y => rotated_y(angle: f64);
    rotate_z => rotated_z(angle: f64);
    rotate_xyz => rotated_xyz(angle_x: f64, angle_y: f64, angle_z: f64);
    rotate_zyx => rotated_zyx(angle_z: f64, angle_y: f64, angle_x: f64);
    rotate_yxz => rotated_yxz(angle_y: f64, angle_x: f64, angle_z: f64);
    rotate_quaternion => rotated_quaternion(rotation: &UnitQuaternion<f64>);
    rotate_around => rotated_around(rotation: &UnitQuaternion<f64>, origin: &Point3<f64>);
    rotate_local => rotated_local(angle: f64, axis: &UnitVector3<f64>);
    rotate_local_x => rotated_local_x(angle: f64);
    rotate_local_y => rotated_local_y(angle: f64);
    rotate_local_z => rotated_local_z(angle: f64);
    rotate_local_quaternion => rotated_local_quaternion(rotation: &UnitQuaternion<f64>);
    reflect => reflected(plane: &Vector4<f64>);
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClipConvention, testing::assert_properties_hold};
    use approx::assert_abs_diff_eq;
    use nalgebra::Rotation3;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPSILON: f64 = 1e-12;

    fn axis() -> UnitVector3<f64> {
        UnitVector3::new_normalize(Vector3::new(1.0, -2.0, 0.5))
    }

    fn quaternion() -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&axis(), 0.8)
    }

    #[test]
    fn rotating_quarter_turn_about_x_maps_y_to_z() {
        let image = Matrix4::rotation_x(FRAC_PI_2).transform_vector(&Vector3::y());
        assert_abs_diff_eq!(image, Vector3::z(), epsilon = EPSILON);
    }

    #[test]
    fn rotating_quarter_turn_about_y_maps_z_to_x() {
        let image = Matrix4::rotation_y(FRAC_PI_2).transform_vector(&Vector3::z());
        assert_abs_diff_eq!(image, Vector3::x(), epsilon = EPSILON);
    }

    #[test]
    fn rotating_quarter_turn_about_z_maps_x_to_y() {
        let image = Matrix4::rotation_z(FRAC_PI_2).transform_vector(&Vector3::x());
        assert_abs_diff_eq!(image, Vector3::y(), epsilon = EPSILON);
    }

    #[test]
    fn axis_angle_rotation_matches_nalgebra() {
        let rotation = Matrix4::rotation(1.3, &axis());
        let expected = Rotation3::from_axis_angle(&axis(), 1.3).to_homogeneous();
        assert_abs_diff_eq!(rotation, Matrix4::from_nalgebra(&expected), epsilon = EPSILON);
        assert_eq!(rotation.properties(), MatrixProperties::RIGID_MATRIX);
        assert_eq!(Matrix4::from_axis_angle(&axis(), 1.3), rotation);
    }

    #[test]
    fn quaternion_rotation_matches_nalgebra() {
        let rotation = Matrix4::from_quaternion(&quaternion());
        let expected = Matrix4::from_nalgebra(&quaternion().to_homogeneous());
        assert_abs_diff_eq!(rotation, expected, epsilon = EPSILON);
    }

    #[test]
    fn composed_rotations_match_products_of_single_axis_rotations() {
        let (x, y, z) = (0.3, -1.1, 2.0);
        let rx = Matrix4::rotation_x(x);
        let ry = Matrix4::rotation_y(y);
        let rz = Matrix4::rotation_z(z);
        assert_abs_diff_eq!(
            Matrix4::rotation_xyz(x, y, z),
            rx.mul_generic(&ry).mul_generic(&rz),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            Matrix4::rotation_zyx(z, y, x),
            rz.mul_generic(&ry).mul_generic(&rx),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            Matrix4::rotation_yxz(y, x, z),
            ry.mul_generic(&rx).mul_generic(&rz),
            epsilon = EPSILON
        );
    }

    #[test]
    fn translating_applies_translation_before_transform() {
        let m = Matrix4::rotation_z(FRAC_PI_2).translated(1.0, 0.0, 0.0);
        let origin = m.transform_point(&Point3::origin());
        assert_abs_diff_eq!(origin, Point3::new(0.0, 1.0, 0.0), epsilon = EPSILON);
        assert_properties_hold(&m);
    }

    #[test]
    fn translating_locally_applies_translation_after_transform() {
        let m = Matrix4::rotation_z(FRAC_PI_2).translated_local(1.0, 0.0, 0.0);
        let origin = m.transform_point(&Point3::origin());
        assert_abs_diff_eq!(origin, Point3::new(1.0, 0.0, 0.0), epsilon = EPSILON);
        assert_eq!(m.properties(), MatrixProperties::RIGID_MATRIX);
    }

    #[test]
    fn translating_identity_gives_translation_matrix() {
        let m = Matrix4::identity().translated(1.0, 2.0, 3.0);
        assert_eq!(m, Matrix4::translation(1.0, 2.0, 3.0));
        assert_eq!(m.properties(), MatrixProperties::TRANSLATION_MATRIX);
    }

    #[test]
    fn translating_perspective_matches_generic_product() {
        let projection = Matrix4::perspective(1.0, 1.5, 0.1, 10.0, ClipConvention::OPENGL);
        let translated = projection.translated(1.0, -2.0, 3.0);
        let expected = projection.mul_generic(&Matrix4::translation(1.0, -2.0, 3.0));
        assert_abs_diff_eq!(translated, expected, epsilon = EPSILON);
        assert_properties_hold(&translated);
    }

    #[test]
    fn scaling_by_unit_magnitudes_keeps_orthonormal() {
        let m = Matrix4::rotation_x(0.5).scaled(-1.0, 1.0, -1.0);
        assert_eq!(m.properties(), MatrixProperties::RIGID_MATRIX);
        assert_properties_hold(&m);
    }

    #[test]
    fn scaling_by_non_unit_factor_clears_orthonormal() {
        let m = Matrix4::rotation_x(0.5).scaled(2.0, 1.0, 1.0);
        assert_eq!(m.properties(), MatrixProperties::AFFINE);
    }

    #[test]
    fn scaling_locally_matches_product_with_scaling_on_left() {
        let m = Matrix4::rotation(0.4, &axis()).translated(1.0, 2.0, 3.0);
        let expected = Matrix4::scaling(2.0, 3.0, 4.0).mul_generic(&m);
        assert_abs_diff_eq!(m.scaled_local(2.0, 3.0, 4.0), expected, epsilon = EPSILON);
    }

    #[test]
    fn scaling_around_point_keeps_point_fixed() {
        let origin = Point3::new(1.0, 2.0, -1.0);
        let m = Matrix4::identity().scaled_around(&Vector3::new(2.0, 3.0, 0.5), &origin);
        assert_abs_diff_eq!(m.transform_point(&origin), origin, epsilon = EPSILON);
    }

    #[test]
    fn rotating_translation_keeps_translation() {
        let m = Matrix4::translation(1.0, 2.0, 3.0).rotated_y(0.7);
        assert_eq!(m.translation_vector(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(m.properties(), MatrixProperties::RIGID_MATRIX);
        assert_abs_diff_eq!(
            m,
            Matrix4::translation(1.0, 2.0, 3.0).mul_generic(&Matrix4::rotation_y(0.7)),
            epsilon = EPSILON
        );
    }

    #[test]
    fn rotating_affine_matches_generic_product() {
        let m = Matrix4::scaling(2.0, 1.0, 3.0).translated(1.0, 0.0, 0.0);
        let rotated = m.rotated(0.9, &axis());
        let expected = m.mul_generic(&Matrix4::rotation(0.9, &axis()));
        assert_abs_diff_eq!(rotated, expected, epsilon = EPSILON);
        assert_eq!(rotated.properties(), MatrixProperties::AFFINE);
    }

    #[test]
    fn rotating_perspective_matches_generic_product() {
        let projection = Matrix4::perspective(1.0, 1.5, 0.1, 10.0, ClipConvention::VULKAN);
        let rotated = projection.rotated_quaternion(&quaternion());
        let expected = projection.mul_generic(&Matrix4::from_quaternion(&quaternion()));
        assert_abs_diff_eq!(rotated, expected, epsilon = EPSILON);
        assert!(rotated.properties().is_empty());
    }

    #[test]
    fn rotating_locally_matches_product_with_rotation_on_left() {
        let m = Matrix4::translation(1.0, 2.0, 3.0).scaled(1.0, 2.0, 1.0);
        let expected = Matrix4::rotation_z(0.6).mul_generic(&m);
        assert_abs_diff_eq!(m.rotated_local_z(0.6), expected, epsilon = EPSILON);
        assert_properties_hold(&m.rotated_local_z(0.6));
    }

    #[test]
    fn rotating_around_point_keeps_point_fixed() {
        let origin = Point3::new(3.0, -1.0, 2.0);
        let m = Matrix4::rotation_around(&quaternion(), &origin);
        assert_abs_diff_eq!(m.transform_point(&origin), origin, epsilon = EPSILON);
        assert_properties_hold(&m);
    }

    #[test]
    fn rotating_by_full_turn_gives_identity() {
        let m = Matrix4::identity().rotated(2.0 * PI, &axis());
        assert_abs_diff_eq!(m, Matrix4::identity(), epsilon = EPSILON);
    }

    #[test]
    fn reflecting_keeps_points_on_plane_and_mirrors_others() {
        // The plane y = 1
        let reflection = Matrix4::reflection(&Vector4::new(0.0, 2.0, 0.0, -2.0));
        let on_plane = Point3::new(5.0, 1.0, -3.0);
        assert_abs_diff_eq!(reflection.transform_point(&on_plane), on_plane, epsilon = EPSILON);
        assert_abs_diff_eq!(
            reflection.transform_point(&Point3::new(0.0, 3.0, 0.0)),
            Point3::new(0.0, -1.0, 0.0),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(reflection.determinant(), -1.0, epsilon = EPSILON);
        assert_properties_hold(&reflection);
    }

    #[test]
    fn reflecting_twice_gives_identity() {
        let plane = Vector4::new(1.0, 1.0, 0.0, 0.5);
        let m = Matrix4::identity().reflected(&plane).reflected(&plane);
        assert_abs_diff_eq!(m, Matrix4::identity(), epsilon = EPSILON);
    }

    #[test]
    fn reflection_about_point_and_normal_matches_plane_equation() {
        let normal = UnitVector3::new_normalize(Vector3::new(0.0, 0.0, 1.0));
        let reflection = Matrix4::reflection_about(&normal, &Point3::new(0.0, 0.0, 2.0));
        assert_abs_diff_eq!(
            reflection,
            Matrix4::reflection(&Vector4::new(0.0, 0.0, 1.0, -2.0)),
            epsilon = EPSILON
        );
    }

    #[test]
    fn translation_rotate_scale_composes_components() {
        let translation = Vector3::new(1.0, -2.0, 0.5);
        let scale = Vector3::new(2.0, 0.5, 3.0);
        let m = Matrix4::translation_rotate_scale(&translation, &quaternion(), &scale);
        let expected = Matrix4::translation(1.0, -2.0, 0.5)
            .mul_generic(&Matrix4::from_quaternion(&quaternion()))
            .mul_generic(&Matrix4::scaling(2.0, 0.5, 3.0));
        assert_abs_diff_eq!(m, expected, epsilon = EPSILON);

        let inverse = Matrix4::translation_rotate_scale_inverted(&translation, &quaternion(), &scale);
        assert_abs_diff_eq!(inverse, m.inverted_generic(), epsilon = EPSILON);
        assert_properties_hold(&inverse);
    }

    #[test]
    fn translation_rotate_gives_rigid_transform() {
        let m = Matrix4::translation_rotate(&Vector3::new(1.0, 2.0, 3.0), &quaternion());
        assert_eq!(m.properties(), MatrixProperties::RIGID_MATRIX);
        assert_eq!(m.translation_vector(), Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn in_place_chain_matches_by_value_chain() {
        let mut m = Matrix4::identity();
        m.translate(1.0, 2.0, 3.0)
            .rotate_x(0.3)
            .scale(2.0, 2.0, 2.0)
            .rotate_local(0.2, &axis());
        let expected = Matrix4::identity()
            .translated(1.0, 2.0, 3.0)
            .rotated_x(0.3)
            .scaled(2.0, 2.0, 2.0)
            .rotated_local(0.2, &axis());
        assert_eq!(m, expected);
        assert_eq!(m.properties(), expected.properties());
    }
}
