//! Operations that route to a specialized kernel based on the properties.

use super::{IDENTITY_ELEMENTS, Matrix4, kernels::AffineInverse};
use crate::properties::MatrixProperties;
use anyhow::{Result, bail};

impl Matrix4 {
    /// Computes `self * rhs`, the transform applying `rhs` first and then
    /// `self`, using the cheapest kernel the properties of the operands
    /// allow.
    pub fn multiplied(&self, rhs: &Self) -> Self {
        let left = self.properties;
        let right = rhs.properties;

        if left.contains(MatrixProperties::IDENTITY) {
            *rhs
        } else if right.contains(MatrixProperties::IDENTITY) {
            *self
        } else if left.contains(MatrixProperties::TRANSLATION)
            && right.contains(MatrixProperties::AFFINE)
        {
            self.mul_translation_affine(rhs)
        } else if left.contains(MatrixProperties::AFFINE)
            && right.contains(MatrixProperties::AFFINE)
        {
            self.mul_affine(rhs)
        } else if left.contains(MatrixProperties::PERSPECTIVE)
            && right.contains(MatrixProperties::AFFINE)
        {
            self.mul_perspective_affine(rhs)
        } else if right.contains(MatrixProperties::AFFINE) {
            self.mul_affine_r(rhs)
        } else {
            self.mul_generic(rhs)
        }
    }

    /// Computes `lhs * self`, the transform applying `self` first and then
    /// `lhs`.
    #[inline]
    pub fn multiplied_local(&self, lhs: &Self) -> Self {
        lhs.multiplied(self)
    }

    /// Computes the inverse using the cheapest kernel the properties allow.
    /// A singular matrix gives non-finite elements; use
    /// [`Self::try_inverted`] to detect that case.
    pub fn inverted(&self) -> Self {
        let properties = self.properties;

        if properties.contains(MatrixProperties::IDENTITY) {
            Self::identity()
        } else if properties.contains(MatrixProperties::TRANSLATION) {
            self.inverted_translation()
        } else if properties.contains(MatrixProperties::ORTHONORMAL) {
            self.inverted_orthonormal()
        } else if properties.contains(MatrixProperties::AFFINE) {
            self.inverted_affine()
        } else if properties.contains(MatrixProperties::PERSPECTIVE) {
            self.inverted_perspective()
        } else {
            self.inverted_generic()
        }
    }

    /// Computes the inverse, or returns an error if the determinant is zero
    /// or not finite.
    pub fn try_inverted(&self) -> Result<Self> {
        let determinant = self.determinant();
        if determinant == 0.0 || !determinant.is_finite() {
            log::debug!(
                "Refusing to invert matrix with determinant {}:\n{}",
                determinant,
                self
            );
            bail!("Matrix is not invertible (determinant is {})", determinant);
        }
        Ok(self.inverted())
    }

    /// Computes the transpose. Only the identity keeps its affine
    /// properties.
    pub fn transposed(&self) -> Self {
        if self.properties.contains(MatrixProperties::IDENTITY) {
            return *self;
        }
        let m = &self.elements;
        let mut elements = [0.0; 16];
        for column in 0..4 {
            for row in 0..4 {
                elements[column * 4 + row] = m[row * 4 + column];
            }
        }
        Self::with_properties(elements, self.properties & MatrixProperties::PERSPECTIVE)
    }

    /// Transposes the upper-left 3x3 block, leaving the other elements
    /// untouched.
    pub fn transposed_3x3(&self) -> Self {
        let mut elements = self.elements;
        for column in 0..3 {
            for row in 0..3 {
                elements[column * 4 + row] = self.elements[row * 4 + column];
            }
        }
        Self::with_properties(elements, self.properties)
    }

    /// Computes the matrix for transforming surface normals: the inverse
    /// transpose of the upper-left 3x3 block, embedded in an affine matrix
    /// without translation.
    pub fn normal_matrix(&self) -> Self {
        let properties = self.properties;

        if properties.contains(MatrixProperties::IDENTITY) {
            Self::identity()
        } else if properties.contains(MatrixProperties::ORTHONORMAL) {
            let mut elements = IDENTITY_ELEMENTS;
            for column in 0..3 {
                elements[column * 4..column * 4 + 3]
                    .copy_from_slice(&self.elements[column * 4..column * 4 + 3]);
            }
            Self::with_properties(elements, MatrixProperties::RIGID_MATRIX)
        } else {
            let inverse = AffineInverse::of(&self.elements);
            let mut elements = IDENTITY_ELEMENTS;
            for column in 0..3 {
                for row in 0..3 {
                    elements[column * 4 + row] = inverse.linear[row * 3 + column];
                }
            }
            Self::with_properties(elements, MatrixProperties::AFFINE)
        }
    }

    /// Scales each of the first three columns of the upper-left 3x3 block
    /// to unit length.
    pub fn normalized_3x3(&self) -> Self {
        if self.properties.contains(MatrixProperties::TRANSLATION) {
            return *self;
        }
        let mut elements = self.elements;
        for column in 0..3 {
            let values = &mut elements[column * 4..column * 4 + 3];
            let inv_length = 1.0 / values.iter().map(|value| value * value).sum::<f64>().sqrt();
            for value in values {
                *value *= inv_length;
            }
        }
        let properties = self.properties
            & (MatrixProperties::AFFINE
                | MatrixProperties::TRANSLATION
                | MatrixProperties::IDENTITY
                | MatrixProperties::ORTHONORMAL);
        Self::with_properties(elements, properties)
    }

    /// Computes the determinant, using the 3x3 determinant for affine
    /// matrices.
    pub fn determinant(&self) -> f64 {
        if self.properties.contains(MatrixProperties::AFFINE) {
            return self.determinant_affine();
        }

        #[rustfmt::skip]
        let [
            m00, m01, m02, m03,
            m10, m11, m12, m13,
            m20, m21, m22, m23,
            m30, m31, m32, m33,
        ] = self.elements;

        (m00 * m11 - m01 * m10) * (m22 * m33 - m23 * m32)
            + (m02 * m10 - m00 * m12) * (m21 * m33 - m23 * m31)
            + (m00 * m13 - m03 * m10) * (m21 * m32 - m22 * m31)
            + (m01 * m12 - m02 * m11) * (m20 * m33 - m23 * m30)
            + (m03 * m11 - m01 * m13) * (m20 * m32 - m22 * m30)
            + (m02 * m13 - m03 * m12) * (m20 * m31 - m21 * m30)
    }

    /// Computes the determinant of the upper-left 3x3 block.
    pub fn determinant_3x3(&self) -> f64 {
        let m = &self.elements;
        (m[0] * m[5] - m[1] * m[4]) * m[10]
            + (m[2] * m[4] - m[0] * m[6]) * m[9]
            + (m[1] * m[6] - m[2] * m[5]) * m[8]
    }

    /// Computes the determinant assuming the matrix is affine, which equals
    /// the determinant of the upper-left 3x3 block.
    #[inline]
    pub fn determinant_affine(&self) -> f64 {
        self.determinant_3x3()
    }
}

impl_in_place_variants!(
    Matrix4,
    multiply => multiplied(rhs: &Matrix4);
    multiply_local => multiplied_local(lhs: &Matrix4);
    invert => inverted();
    transpose => transposed();
    transpose_3x3 => transposed_3x3();
    normalize_3x3 => normalized_3x3();
);
