//! View transforms that orient a camera.

use super::{IDENTITY_ELEMENTS, Matrix4};
use crate::{convention::Handedness, properties::MatrixProperties};
use nalgebra::{Point3, Vector3};

/// Builds an orthonormal basis whose third axis points along `direction`,
/// with the second axis as close to `up` as possible. Returns the axes as
/// `[left, up, direction]`.
fn orthonormal_basis(direction: &Vector3<f64>, up: &Vector3<f64>) -> [Vector3<f64>; 3] {
    let direction = direction.normalize();
    let left = up.cross(&direction).normalize();
    let up = direction.cross(&left);
    [left, up, direction]
}

/// Creates the rigid transform with the given axes as the rows of its
/// rotation, translated so that `eye` maps to the origin.
fn view_matrix(axes: &[Vector3<f64>; 3], eye: &Vector3<f64>) -> Matrix4 {
    let mut elements = IDENTITY_ELEMENTS;
    for (row, axis) in axes.iter().enumerate() {
        elements[row] = axis.x;
        elements[4 + row] = axis.y;
        elements[8 + row] = axis.z;
        elements[12 + row] = -axis.dot(eye);
    }
    Matrix4::with_properties(elements, MatrixProperties::RIGID_MATRIX)
}

impl Matrix4 {
    /// Creates a view transform for a camera at `eye` looking at `center`,
    /// with `up` giving the rough upward direction. In a right-handed view
    /// space the camera looks along the negative z-axis, in a left-handed
    /// one along the positive z-axis.
    ///
    /// If `up` is parallel to the viewing direction the result has
    /// non-finite elements.
    pub fn look_at(
        eye: &Point3<f64>,
        center: &Point3<f64>,
        up: &Vector3<f64>,
        handedness: Handedness,
    ) -> Self {
        let backward = match handedness {
            Handedness::Right => eye - center,
            Handedness::Left => center - eye,
        };
        view_matrix(&orthonormal_basis(&backward, up), &eye.coords)
    }

    /// Creates a view transform for a camera at the origin looking along
    /// `direction`.
    pub fn look_along(direction: &Vector3<f64>, up: &Vector3<f64>, handedness: Handedness) -> Self {
        let backward = match handedness {
            Handedness::Right => -direction,
            Handedness::Left => *direction,
        };
        view_matrix(&orthonormal_basis(&backward, up), &Vector3::zeros())
    }

    /// Creates a rotation that maps the positive z-axis onto `direction`,
    /// with the positive y-axis mapped as close to `up` as possible.
    pub fn rotation_towards(direction: &Vector3<f64>, up: &Vector3<f64>) -> Self {
        let axes = orthonormal_basis(direction, up);
        let mut elements = IDENTITY_ELEMENTS;
        for (column, axis) in axes.iter().enumerate() {
            elements[column * 4..column * 4 + 3].copy_from_slice(axis.as_slice());
        }
        Self::with_properties(elements, MatrixProperties::RIGID_MATRIX)
    }

    /// Computes `self * V` for the view transform `V` built by
    /// [`Self::look_at`].
    pub fn mul_look_at(
        &self,
        eye: &Point3<f64>,
        center: &Point3<f64>,
        up: &Vector3<f64>,
        handedness: Handedness,
    ) -> Self {
        self.multiplied(&Self::look_at(eye, center, up, handedness))
    }

    /// Computes `self * V` for the view transform `V` built by
    /// [`Self::look_along`].
    pub fn mul_look_along(
        &self,
        direction: &Vector3<f64>,
        up: &Vector3<f64>,
        handedness: Handedness,
    ) -> Self {
        self.multiplied(&Self::look_along(direction, up, handedness))
    }

    /// Computes `self * R` for the rotation built by
    /// [`Self::rotation_towards`].
    pub fn rotated_towards(&self, direction: &Vector3<f64>, up: &Vector3<f64>) -> Self {
        self.multiplied(&Self::rotation_towards(direction, up))
    }
}

impl_in_place_variants!(
    Matrix4,
    rotate_towards => rotated_towards(direction: &Vector3<f64>, up: &Vector3<f64>);
);
