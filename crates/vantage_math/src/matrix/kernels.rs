//! Specialized multiplication and inversion kernels.
//!
//! Every kernel assumes a structural pattern of its operands and assigns the
//! properties of its result directly. The kernels do not check their
//! assumptions, so they produce wrong results if called on matrices that do
//! not have the stated pattern. [`Matrix4::multiplied`] and
//! [`Matrix4::inverted`] pick the right kernel from the properties.

use super::{IDENTITY_ELEMENTS, Matrix4};
use crate::properties::MatrixProperties;

/// The inverse of an affine transform, split into the inverse of the
/// upper-left 3x3 block (stored column-major) and the inverse translation.
#[derive(Clone, Copy, Debug)]
pub(super) struct AffineInverse {
    pub(super) linear: [f64; 9],
    pub(super) translation: [f64; 3],
}

impl AffineInverse {
    /// Inverts the affine part of the given elements through the cofactors
    /// of the 3x3 block.
    pub(super) fn of(elements: &[f64; 16]) -> Self {
        #[rustfmt::skip]
        let [
            m00, m01, m02, _,
            m10, m11, m12, _,
            m20, m21, m22, _,
            m30, m31, m32, _,
        ] = *elements;

        let c00 = m11 * m22 - m12 * m21;
        let c01 = m12 * m20 - m10 * m22;
        let c02 = m10 * m21 - m11 * m20;
        let inv_det = 1.0 / (m00 * c00 + m01 * c01 + m02 * c02);

        let linear = [
            c00 * inv_det,
            (m02 * m21 - m01 * m22) * inv_det,
            (m01 * m12 - m02 * m11) * inv_det,
            c01 * inv_det,
            (m00 * m22 - m02 * m20) * inv_det,
            (m02 * m10 - m00 * m12) * inv_det,
            c02 * inv_det,
            (m01 * m20 - m00 * m21) * inv_det,
            (m00 * m11 - m01 * m10) * inv_det,
        ];

        let translation = [0, 1, 2].map(|row| {
            -(linear[row] * m30 + linear[3 + row] * m31 + linear[6 + row] * m32)
        });

        Self {
            linear,
            translation,
        }
    }

    /// Applies the inverse transform to the given point.
    pub(super) fn transform_point(&self, point: [f64; 3]) -> [f64; 3] {
        [0, 1, 2].map(|row| {
            self.linear[row] * point[0]
                + self.linear[3 + row] * point[1]
                + self.linear[6 + row] * point[2]
                + self.translation[row]
        })
    }
}

/// Computes `a * b` for two matrices given as column-major elements.
#[inline]
pub(super) fn mul_elements(a: &[f64; 16], b: &[f64; 16]) -> [f64; 16] {
    let mut result = [0.0; 16];
    for column in 0..4 {
        let b_column = &b[column * 4..column * 4 + 4];
        for row in 0..4 {
            result[column * 4 + row] = a[row] * b_column[0]
                + a[4 + row] * b_column[1]
                + a[8 + row] * b_column[2]
                + a[12 + row] * b_column[3];
        }
    }
    result
}

/// Computes `a * b` for two 3x3 matrices given as column-major elements.
#[inline]
pub(super) fn mul_3x3(a: &[f64; 9], b: &[f64; 9]) -> [f64; 9] {
    let mut result = [0.0; 9];
    for column in 0..3 {
        for row in 0..3 {
            result[column * 3 + row] = a[row] * b[column * 3]
                + a[3 + row] * b[column * 3 + 1]
                + a[6 + row] * b[column * 3 + 2];
        }
    }
    result
}

impl Matrix4 {
    /// Computes `self * rhs` with the full 64 multiply-adds, assuming
    /// nothing about either matrix.
    pub fn mul_generic(&self, rhs: &Self) -> Self {
        Self::with_properties(
            mul_elements(&self.elements, &rhs.elements),
            MatrixProperties::empty(),
        )
    }

    /// Computes `self * rhs` assuming both matrices are affine.
    pub fn mul_affine(&self, rhs: &Self) -> Self {
        let a = &self.elements;
        let b = &rhs.elements;
        let mut result = [0.0; 16];
        for column in 0..4 {
            for row in 0..3 {
                result[column * 4 + row] = a[row] * b[column * 4]
                    + a[4 + row] * b[column * 4 + 1]
                    + a[8 + row] * b[column * 4 + 2];
            }
        }
        for row in 0..3 {
            result[12 + row] += a[12 + row];
        }
        result[15] = 1.0;

        let properties = MatrixProperties::AFFINE
            | (self.properties & rhs.properties & MatrixProperties::ORTHONORMAL);
        Self::with_properties(result, properties)
    }

    /// Computes `self * rhs` assuming only `rhs` is affine.
    pub fn mul_affine_r(&self, rhs: &Self) -> Self {
        let a = &self.elements;
        let b = &rhs.elements;
        let mut result = [0.0; 16];
        for column in 0..4 {
            for row in 0..4 {
                result[column * 4 + row] = a[row] * b[column * 4]
                    + a[4 + row] * b[column * 4 + 1]
                    + a[8 + row] * b[column * 4 + 2];
            }
        }
        for row in 0..4 {
            result[12 + row] += a[12 + row];
        }

        let properties = self.properties
            & !(MatrixProperties::IDENTITY
                | MatrixProperties::PERSPECTIVE
                | MatrixProperties::TRANSLATION
                | MatrixProperties::ORTHONORMAL);
        Self::with_properties(result, properties)
    }

    /// Computes `self * rhs` assuming `self` is a pure translation and `rhs`
    /// is affine.
    pub fn mul_translation_affine(&self, rhs: &Self) -> Self {
        let mut result = rhs.elements;
        for row in 0..3 {
            result[12 + row] += self.elements[12 + row];
        }
        result[3] = 0.0;
        result[7] = 0.0;
        result[11] = 0.0;
        result[15] = 1.0;

        let properties =
            MatrixProperties::AFFINE | (rhs.properties & MatrixProperties::ORTHONORMAL);
        Self::with_properties(result, properties)
    }

    /// Computes `self * rhs` assuming `self` is a symmetric perspective
    /// projection and `rhs` is affine.
    pub fn mul_perspective_affine(&self, rhs: &Self) -> Self {
        let a = &self.elements;
        let b = &rhs.elements;
        let (a00, a11, a22, a23, a32) = (a[0], a[5], a[10], a[11], a[14]);

        let mut result = [0.0; 16];
        for column in 0..4 {
            let b_column = &b[column * 4..column * 4 + 4];
            result[column * 4] = a00 * b_column[0];
            result[column * 4 + 1] = a11 * b_column[1];
            result[column * 4 + 2] = a22 * b_column[2];
            result[column * 4 + 3] = a23 * b_column[2];
        }
        result[14] += a32;

        Self::with_properties(result, MatrixProperties::empty())
    }

    /// Computes `self * rhs` assuming `self` is an orthographic projection
    /// (a diagonal 3x3 block with a translation) and `rhs` is affine.
    pub fn mul_ortho_affine(&self, rhs: &Self) -> Self {
        let a = &self.elements;
        let b = &rhs.elements;
        let diagonal = [a[0], a[5], a[10]];

        let mut result = [0.0; 16];
        for column in 0..4 {
            for row in 0..3 {
                result[column * 4 + row] = diagonal[row] * b[column * 4 + row];
            }
        }
        for row in 0..3 {
            result[12 + row] += a[12 + row];
        }
        result[15] = 1.0;

        Self::with_properties(result, MatrixProperties::AFFINE)
    }

    /// Inverts the matrix through its 2x2 sub-determinants, assuming
    /// nothing about it. A singular matrix gives non-finite elements.
    pub fn inverted_generic(&self) -> Self {
        #[rustfmt::skip]
        let [
            m00, m01, m02, m03,
            m10, m11, m12, m13,
            m20, m21, m22, m23,
            m30, m31, m32, m33,
        ] = self.elements;

        let a = m00 * m11 - m01 * m10;
        let b = m00 * m12 - m02 * m10;
        let c = m00 * m13 - m03 * m10;
        let d = m01 * m12 - m02 * m11;
        let e = m01 * m13 - m03 * m11;
        let f = m02 * m13 - m03 * m12;
        let g = m20 * m31 - m21 * m30;
        let h = m20 * m32 - m22 * m30;
        let i = m20 * m33 - m23 * m30;
        let j = m21 * m32 - m22 * m31;
        let k = m21 * m33 - m23 * m31;
        let l = m22 * m33 - m23 * m32;
        let inv_det = 1.0 / (a * l - b * k + c * j + d * i - e * h + f * g);

        #[rustfmt::skip]
        let elements = [
            ( m11 * l - m12 * k + m13 * j) * inv_det,
            (-m01 * l + m02 * k - m03 * j) * inv_det,
            ( m31 * f - m32 * e + m33 * d) * inv_det,
            (-m21 * f + m22 * e - m23 * d) * inv_det,
            (-m10 * l + m12 * i - m13 * h) * inv_det,
            ( m00 * l - m02 * i + m03 * h) * inv_det,
            (-m30 * f + m32 * c - m33 * b) * inv_det,
            ( m20 * f - m22 * c + m23 * b) * inv_det,
            ( m10 * k - m11 * i + m13 * g) * inv_det,
            (-m00 * k + m01 * i - m03 * g) * inv_det,
            ( m30 * e - m31 * c + m33 * a) * inv_det,
            (-m20 * e + m21 * c - m23 * a) * inv_det,
            (-m10 * j + m11 * h - m12 * g) * inv_det,
            ( m00 * j - m01 * h + m02 * g) * inv_det,
            (-m30 * d + m31 * b - m32 * a) * inv_det,
            ( m20 * d - m21 * b + m22 * a) * inv_det,
        ];

        Self::with_properties(elements, MatrixProperties::empty())
    }

    /// Inverts the matrix assuming it is affine.
    pub fn inverted_affine(&self) -> Self {
        let inverse = AffineInverse::of(&self.elements);
        let mut elements = IDENTITY_ELEMENTS;
        for column in 0..3 {
            elements[column * 4..column * 4 + 3]
                .copy_from_slice(&inverse.linear[column * 3..column * 3 + 3]);
        }
        elements[12..15].copy_from_slice(&inverse.translation);
        Self::with_properties(elements, MatrixProperties::AFFINE)
    }

    /// Inverts the matrix assuming it is affine with an orthonormal 3x3
    /// block, by transposing the block and rotating the negated translation.
    pub fn inverted_orthonormal(&self) -> Self {
        let m = &self.elements;
        let mut elements = IDENTITY_ELEMENTS;
        for column in 0..3 {
            for row in 0..3 {
                elements[column * 4 + row] = m[row * 4 + column];
            }
        }
        for row in 0..3 {
            elements[12 + row] =
                -(m[row * 4] * m[12] + m[row * 4 + 1] * m[13] + m[row * 4 + 2] * m[14]);
        }
        Self::with_properties(elements, MatrixProperties::RIGID_MATRIX)
    }

    /// Inverts the matrix assuming it is a pure translation.
    pub fn inverted_translation(&self) -> Self {
        let mut elements = IDENTITY_ELEMENTS;
        for row in 0..3 {
            elements[12 + row] = -self.elements[12 + row];
        }
        Self::with_properties(elements, MatrixProperties::TRANSLATION_MATRIX)
    }

    /// Inverts the matrix assuming it is a symmetric perspective projection.
    pub fn inverted_perspective(&self) -> Self {
        let m = &self.elements;
        let (m00, m11, m22, m23, m32) = (m[0], m[5], m[10], m[11], m[14]);
        let a = 1.0 / (m00 * m11);
        let l = -1.0 / (m23 * m32);

        let mut elements = [0.0; 16];
        elements[0] = m11 * a;
        elements[5] = m00 * a;
        elements[11] = -m23 * l;
        elements[14] = -m32 * l;
        elements[15] = m22 * l;

        Self::with_properties(elements, MatrixProperties::empty())
    }

    /// Inverts the matrix assuming it is a possibly off-center perspective
    /// projection, as built by [`Self::frustum`].
    pub fn inverted_frustum(&self) -> Self {
        let m = &self.elements;
        let (m00, m11, m20, m21, m22, m23, m32) = (m[0], m[5], m[8], m[9], m[10], m[11], m[14]);
        let inv_m00 = 1.0 / m00;
        let inv_m11 = 1.0 / m11;
        let inv_m23 = 1.0 / m23;
        let inv_m32 = 1.0 / m32;

        let mut elements = [0.0; 16];
        elements[0] = inv_m00;
        elements[5] = inv_m11;
        elements[11] = inv_m32;
        elements[12] = -m20 * inv_m00 * inv_m23;
        elements[13] = -m21 * inv_m11 * inv_m23;
        elements[14] = inv_m23;
        elements[15] = -m22 * inv_m23 * inv_m32;

        Self::with_properties(elements, MatrixProperties::empty())
    }

    /// Inverts the matrix assuming it is an orthographic projection: a
    /// diagonal 3x3 block with a translation.
    pub fn inverted_ortho(&self) -> Self {
        let m = &self.elements;
        let mut elements = IDENTITY_ELEMENTS;
        for axis in 0..3 {
            let inv_scale = 1.0 / m[axis * 5];
            elements[axis * 5] = inv_scale;
            elements[12 + axis] = -m[12 + axis] * inv_scale;
        }
        let properties =
            MatrixProperties::AFFINE | (self.properties & MatrixProperties::ORTHONORMAL);
        Self::with_properties(elements, properties)
    }

    /// Computes the inverse of `self * view`, assuming `self` is a
    /// symmetric perspective projection and `view` is affine.
    pub fn inverted_perspective_view(&self, view: &Self) -> Self {
        view.inverted_affine()
            .mul_generic(&self.inverted_perspective())
    }
}
