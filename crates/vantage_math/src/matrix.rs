//! Matrices.

mod dispatch;
mod kernels;
mod projection;
mod query;
mod transform;
mod view;

pub use query::{AffineSpan, Viewport};

use crate::properties::MatrixProperties;
use anyhow::{Result, bail};
use nalgebra::{Matrix3, Matrix3x4, Vector3, Vector4};
use std::fmt;

/// A 4x4 matrix of `f64` elements representing a homogeneous transform,
/// stored in column-major order together with a cached
/// [`MatrixProperties`] mask.
///
/// Element `mCR` lives in column `C` and row `R`, so `m30`, `m31` and `m32`
/// hold the translation of an affine transform. Vectors are treated as
/// columns and multiplied on the right, so in `a * b` the transform `b` is
/// applied first.
///
/// The properties are a guarantee about the elements: every operation keeps
/// them true, either by narrowing them or by recomputing them. Equality only
/// compares elements.
#[derive(Clone, Copy, Debug)]
pub struct Matrix4 {
    elements: [f64; 16],
    properties: MatrixProperties,
}

#[rustfmt::skip]
const IDENTITY_ELEMENTS: [f64; 16] = [
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 1.0, 0.0,
    0.0, 0.0, 0.0, 1.0,
];

impl Matrix4 {
    /// Creates the identity matrix.
    #[inline]
    pub const fn identity() -> Self {
        Self::with_properties(IDENTITY_ELEMENTS, MatrixProperties::IDENTITY_MATRIX)
    }

    /// Creates a matrix with all zeros.
    #[inline]
    pub const fn zeros() -> Self {
        Self::with_properties([0.0; 16], MatrixProperties::empty())
    }

    /// Creates a matrix with the given elements, listed column by column.
    /// The properties are inferred from the elements.
    #[rustfmt::skip]
    #[inline]
    pub fn new(
        m00: f64, m01: f64, m02: f64, m03: f64,
        m10: f64, m11: f64, m12: f64, m13: f64,
        m20: f64, m21: f64, m22: f64, m23: f64,
        m30: f64, m31: f64, m32: f64, m33: f64,
    ) -> Self {
        Self::from_cols_array([
            m00, m01, m02, m03,
            m10, m11, m12, m13,
            m20, m21, m22, m23,
            m30, m31, m32, m33,
        ])
    }

    /// Creates a matrix from the given column-major elements. The properties
    /// are inferred from the elements.
    #[inline]
    pub fn from_cols_array(elements: [f64; 16]) -> Self {
        Self::with_properties(elements, MatrixProperties::infer(&elements))
    }

    /// Creates a matrix with the given columns. The properties are inferred
    /// from the elements.
    pub fn from_columns(
        column_0: &Vector4<f64>,
        column_1: &Vector4<f64>,
        column_2: &Vector4<f64>,
        column_3: &Vector4<f64>,
    ) -> Self {
        let mut elements = [0.0; 16];
        for (column, vector) in [column_0, column_1, column_2, column_3].into_iter().enumerate() {
            elements[column * 4..column * 4 + 4].copy_from_slice(vector.as_slice());
        }
        Self::from_cols_array(elements)
    }

    /// Creates the affine transform with the given basis vectors as the
    /// images of the x-, y- and z-axes and the given translation.
    pub fn from_basis(
        x_axis: &Vector3<f64>,
        y_axis: &Vector3<f64>,
        z_axis: &Vector3<f64>,
        translation: &Vector3<f64>,
    ) -> Self {
        Self::from_columns(
            &x_axis.push(0.0),
            &y_axis.push(0.0),
            &z_axis.push(0.0),
            &translation.push(1.0),
        )
    }

    /// Creates the affine transform whose upper-left 3x3 block is the given
    /// matrix.
    pub fn from_matrix3(matrix: &Matrix3<f64>) -> Self {
        let mut elements = IDENTITY_ELEMENTS;
        for column in 0..3 {
            for row in 0..3 {
                elements[column * 4 + row] = matrix[(row, column)];
            }
        }
        Self::from_cols_array(elements)
    }

    /// Creates the affine transform whose upper three rows are given by the
    /// 3x4 matrix.
    pub fn from_affine(matrix: &Matrix3x4<f64>) -> Self {
        let mut elements = IDENTITY_ELEMENTS;
        for column in 0..4 {
            for row in 0..3 {
                elements[column * 4 + row] = matrix[(row, column)];
            }
        }
        Self::from_cols_array(elements)
    }

    /// Creates a matrix from 16 column-major values starting at `offset` in
    /// the given slice.
    ///
    /// # Panics
    /// If the slice holds fewer than `offset + 16` values.
    pub fn from_slice(values: &[f64], offset: usize) -> Self {
        let mut elements = [0.0; 16];
        elements.copy_from_slice(&values[offset..offset + 16]);
        Self::from_cols_array(elements)
    }

    /// Creates a matrix from 16 column-major single precision values
    /// starting at `offset` in the given slice.
    ///
    /// # Panics
    /// If the slice holds fewer than `offset + 16` values.
    pub fn from_slice_f32(values: &[f32], offset: usize) -> Self {
        let mut elements = [0.0; 16];
        for (element, &value) in elements.iter_mut().zip(&values[offset..offset + 16]) {
            *element = f64::from(value);
        }
        Self::from_cols_array(elements)
    }

    /// Creates a matrix from 16 column-major values starting at `offset` in
    /// the given slice, failing instead of panicking if the slice is too
    /// short.
    pub fn try_from_slice(values: &[f64], offset: usize) -> Result<Self> {
        let end = offset.checked_add(16).unwrap_or(usize::MAX);
        if values.len() < end {
            bail!(
                "Slice of length {} has no room for 16 matrix elements at offset {}",
                values.len(),
                offset
            );
        }
        Ok(Self::from_slice(values, offset))
    }

    /// Creates a matrix with the given elements and properties. The
    /// properties must hold for the elements.
    #[inline]
    pub(crate) const fn with_properties(
        elements: [f64; 16],
        properties: MatrixProperties,
    ) -> Self {
        Self {
            elements,
            properties,
        }
    }

    /// The properties known to hold for this matrix.
    #[inline]
    pub const fn properties(&self) -> MatrixProperties {
        self.properties
    }

    /// Recomputes the properties from the elements, replacing any
    /// properties known from construction. This forgets `ORTHONORMAL` unless
    /// the upper-left 3x3 block is exactly the identity.
    pub fn determine_properties(&mut self) -> &mut Self {
        self.properties = MatrixProperties::infer(&self.elements);
        self
    }

    /// Replaces the properties with the given ones without checking them.
    ///
    /// The elements must satisfy every pattern in `properties`. Operations
    /// pick their kernels based on the properties, so a false claim makes
    /// them produce results that are silently wrong.
    #[inline]
    pub fn assume(&mut self, properties: MatrixProperties) -> &mut Self {
        self.properties = properties;
        self
    }

    /// The elements in column-major order.
    #[inline]
    pub const fn elements(&self) -> &[f64; 16] {
        &self.elements
    }

    /// Copies the elements out in column-major order.
    #[inline]
    pub const fn to_cols_array(&self) -> [f64; 16] {
        self.elements
    }

    /// Copies the elements out in column-major order as single precision
    /// values.
    pub fn to_cols_array_f32(&self) -> [f32; 16] {
        self.elements.map(|element| element as f32)
    }

    /// The elements in column-major order as native-endian bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.elements)
    }

    /// Writes the elements in column-major order into the slice starting at
    /// `offset`.
    ///
    /// # Panics
    /// If the slice holds fewer than `offset + 16` values.
    pub fn write_to_slice(&self, destination: &mut [f64], offset: usize) {
        destination[offset..offset + 16].copy_from_slice(&self.elements);
    }

    /// Writes the elements in column-major order as single precision values
    /// into the slice starting at `offset`.
    ///
    /// # Panics
    /// If the slice holds fewer than `offset + 16` values.
    pub fn write_to_slice_f32(&self, destination: &mut [f32], offset: usize) {
        destination[offset..offset + 16].copy_from_slice(&self.to_cols_array_f32());
    }

    /// The element in the given column and row.
    ///
    /// # Panics
    /// If the indices are outside the matrix.
    #[inline]
    pub fn element(&self, column: usize, row: usize) -> f64 {
        assert!(
            column < 4 && row < 4,
            "matrix index ({column}, {row}) out of bounds"
        );
        self.elements[column * 4 + row]
    }

    /// The element in the given column and row, or an error if the indices
    /// are outside the matrix.
    pub fn try_element(&self, column: usize, row: usize) -> Result<f64> {
        if column >= 4 || row >= 4 {
            bail!("Matrix index ({}, {}) out of bounds", column, row);
        }
        Ok(self.elements[column * 4 + row])
    }

    /// Sets the element in the given column and row, clearing the
    /// properties the new value may violate.
    ///
    /// # Panics
    /// If the indices are outside the matrix.
    pub fn set_element(&mut self, column: usize, row: usize, value: f64) -> &mut Self {
        self.properties = self.properties.narrowed_for_write(column, row, value);
        self.elements[column * 4 + row] = value;
        self
    }

    /// The element at the given column-major index.
    ///
    /// # Panics
    /// If the index is outside the matrix.
    #[inline]
    pub fn element_at(&self, index: usize) -> f64 {
        self.elements[index]
    }

    /// Sets the element at the given column-major index, clearing the
    /// properties the new value may violate.
    ///
    /// # Panics
    /// If the index is outside the matrix.
    pub fn set_element_at(&mut self, index: usize, value: f64) -> &mut Self {
        assert!(index < 16, "matrix index {index} out of bounds");
        self.set_element(index / 4, index % 4, value)
    }

    /// The given column.
    ///
    /// # Panics
    /// If the index is outside the matrix.
    pub fn column(&self, column: usize) -> Vector4<f64> {
        assert!(column < 4, "matrix column {column} out of bounds");
        Vector4::from_column_slice(&self.elements[column * 4..column * 4 + 4])
    }

    /// The given row.
    ///
    /// # Panics
    /// If the index is outside the matrix.
    pub fn row(&self, row: usize) -> Vector4<f64> {
        assert!(row < 4, "matrix row {row} out of bounds");
        Vector4::new(
            self.elements[row],
            self.elements[4 + row],
            self.elements[8 + row],
            self.elements[12 + row],
        )
    }

    /// Replaces the given column and recomputes the properties.
    ///
    /// # Panics
    /// If the index is outside the matrix.
    pub fn set_column(&mut self, column: usize, values: &Vector4<f64>) -> &mut Self {
        assert!(column < 4, "matrix column {column} out of bounds");
        self.elements[column * 4..column * 4 + 4].copy_from_slice(values.as_slice());
        self.determine_properties()
    }

    /// Replaces the given row and recomputes the properties.
    ///
    /// # Panics
    /// If the index is outside the matrix.
    pub fn set_row(&mut self, row: usize, values: &Vector4<f64>) -> &mut Self {
        assert!(row < 4, "matrix row {row} out of bounds");
        for column in 0..4 {
            self.elements[column * 4 + row] = values[column];
        }
        self.determine_properties()
    }

    /// Replaces all elements and recomputes the properties.
    pub fn set_elements(&mut self, elements: [f64; 16]) -> &mut Self {
        *self = Self::from_cols_array(elements);
        self
    }

    /// Resets the matrix to the identity.
    pub fn set_identity(&mut self) -> &mut Self {
        *self = Self::identity();
        self
    }

    /// Resets all elements to zero.
    pub fn set_zero(&mut self) -> &mut Self {
        *self = Self::zeros();
        self
    }

    /// Overwrites the translation part `(m30, m31, m32)`, leaving the other
    /// elements untouched.
    pub fn set_translation(&mut self, translation: &Vector3<f64>) -> &mut Self {
        self.set_m30(translation.x)
            .set_m31(translation.y)
            .set_m32(translation.z)
    }

    /// Overwrites the upper-left 3x3 block, leaving the other elements
    /// untouched.
    pub fn set_matrix3(&mut self, matrix: &Matrix3<f64>) -> &mut Self {
        for column in 0..3 {
            for row in 0..3 {
                self.elements[column * 4 + row] = matrix[(row, column)];
            }
        }
        self.determine_properties()
    }

    /// The translation part `(m30, m31, m32)`.
    #[inline]
    pub fn translation_vector(&self) -> Vector3<f64> {
        Vector3::new(self.elements[12], self.elements[13], self.elements[14])
    }

    /// The upper-left 3x3 block.
    pub fn matrix3(&self) -> Matrix3<f64> {
        Matrix3::from_fn(|row, column| self.elements[column * 4 + row])
    }

    /// The upper three rows as a 3x4 matrix.
    pub fn affine_part(&self) -> Matrix3x4<f64> {
        Matrix3x4::from_fn(|row, column| self.elements[column * 4 + row])
    }

    /// Converts the matrix into an `nalgebra` matrix.
    pub fn to_nalgebra(&self) -> nalgebra::Matrix4<f64> {
        nalgebra::Matrix4::from_column_slice(&self.elements)
    }

    /// Converts the given `nalgebra` matrix, inferring the properties.
    pub fn from_nalgebra(matrix: &nalgebra::Matrix4<f64>) -> Self {
        Self::from_slice(matrix.as_slice(), 0)
    }

    /// Whether the last row is exactly `(0, 0, 0, 1)`, checked on the
    /// elements rather than the properties.
    #[inline]
    pub fn is_affine(&self) -> bool {
        self.elements[3] == 0.0
            && self.elements[7] == 0.0
            && self.elements[11] == 0.0
            && self.elements[15] == 1.0
    }

    /// Whether every element is finite.
    pub fn is_finite(&self) -> bool {
        self.elements.iter().all(|element| element.is_finite())
    }

    /// Applies the given function to every element and infers the
    /// properties of the result.
    pub fn map(&self, f: impl FnMut(f64) -> f64) -> Self {
        Self::from_cols_array(self.elements.map(f))
    }

    /// Combines corresponding elements of the two matrices with the given
    /// function and infers the properties of the result.
    pub fn zip_map(&self, other: &Self, mut f: impl FnMut(f64, f64) -> f64) -> Self {
        let mut elements = self.elements;
        for (element, &other) in elements.iter_mut().zip(&other.elements) {
            *element = f(*element, other);
        }
        Self::from_cols_array(elements)
    }

    /// Multiplies every element by the given factor.
    pub fn scale_elements(&self, factor: f64) -> Self {
        self.map(|element| element * factor)
    }

    /// Multiplies corresponding elements of the two matrices.
    pub fn mul_component_wise(&self, other: &Self) -> Self {
        self.zip_map(other, |a, b| a * b)
    }

    /// Linearly interpolates every element between this matrix (`t = 0`)
    /// and `other` (`t = 1`).
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        self.zip_map(other, |a, b| a + (b - a) * t)
    }

    /// Computes `self + other * factor` on the upper three rows, keeping the
    /// last row `(0, 0, 0, 1)`. Both matrices are assumed to be affine.
    pub fn fma_affine(&self, other: &Self, factor: f64) -> Self {
        let mut elements = self.elements;
        for column in 0..4 {
            for row in 0..3 {
                let index = column * 4 + row;
                elements[index] = other.elements[index].mul_add(factor, elements[index]);
            }
        }
        elements[3] = 0.0;
        elements[7] = 0.0;
        elements[11] = 0.0;
        elements[15] = 1.0;
        Self::from_cols_array(elements)
    }
}

impl_element_accessors!(
    Matrix4,
    m00, set_m00 => 0, 0;
    m01, set_m01 => 0, 1;
    m02, set_m02 => 0, 2;
    m03, set_m03 => 0, 3;
    m10, set_m10 => 1, 0;
    m11, set_m11 => 1, 1;
    m12, set_m12 => 1, 2;
    m13, set_m13 => 1, 3;
    m20, set_m20 => 2, 0;
    m21, set_m21 => 2, 1;
    m22, set_m22 => 2, 2;
    m23, set_m23 => 2, 3;
    m30, set_m30 => 3, 0;
    m31, set_m31 => 3, 1;
    m32, set_m32 => 3, 2;
    m33, set_m33 => 3, 3;
);

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl PartialEq for Matrix4 {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl From<nalgebra::Matrix4<f64>> for Matrix4 {
    fn from(matrix: nalgebra::Matrix4<f64>) -> Self {
        Self::from_nalgebra(&matrix)
    }
}

impl From<Matrix4> for nalgebra::Matrix4<f64> {
    fn from(matrix: Matrix4) -> Self {
        matrix.to_nalgebra()
    }
}

impl From<[f64; 16]> for Matrix4 {
    fn from(elements: [f64; 16]) -> Self {
        Self::from_cols_array(elements)
    }
}

impl fmt::Display for Matrix4 {
    /// Writes the matrix row by row in scientific notation, using the
    /// formatter's precision if given.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(3);
        for row in 0..4 {
            for column in 0..4 {
                if column > 0 {
                    write!(f, " ")?;
                }
                write!(
                    f,
                    "{:>width$.precision$e}",
                    self.elements[column * 4 + row],
                    width = precision + 7,
                )?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl_binop!(Mul, mul, Matrix4, Matrix4, Matrix4, |a, b| {
    a.multiplied(b)
});

impl_binop!(Mul, mul, Matrix4, Vector4<f64>, Vector4<f64>, |a, b| {
    a.transform(b)
});

impl_binop!(Mul, mul, Matrix4, f64, Matrix4, |a, b| {
    a.scale_elements(*b)
});

impl_binop!(Add, add, Matrix4, Matrix4, Matrix4, |a, b| {
    a.zip_map(b, |a, b| a + b)
});

impl_binop!(Sub, sub, Matrix4, Matrix4, Matrix4, |a, b| {
    a.zip_map(b, |a, b| a - b)
});

impl_unary_op!(Neg, neg, Matrix4, Matrix4, |a| { a.map(|element| -element) });

impl_binop_assign!(MulAssign, mul_assign, Matrix4, Matrix4, |a, b| {
    a.multiply(b);
});

impl_binop_assign!(AddAssign, add_assign, Matrix4, Matrix4, |a, b| {
    *a = a.zip_map(b, |a, b| a + b);
});

impl_binop_assign!(SubAssign, sub_assign, Matrix4, Matrix4, |a, b| {
    *a = a.zip_map(b, |a, b| a - b);
});

impl_abs_diff_eq!(Matrix4, |a, b, epsilon| {
    a.elements
        .iter()
        .zip(&b.elements)
        .all(|(a, b)| approx::AbsDiffEq::abs_diff_eq(a, b, epsilon))
});

impl_relative_eq!(Matrix4, |a, b, epsilon, max_relative| {
    a.elements
        .iter()
        .zip(&b.elements)
        .all(|(a, b)| approx::RelativeEq::relative_eq(a, b, epsilon, max_relative))
});

#[cfg(feature = "arbitrary")]
impl arbitrary::Arbitrary<'_> for Matrix4 {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let mut elements = [0.0; 16];
        for element in &mut elements {
            *element = f64::from(u.arbitrary::<i16>()?) / 256.0;
        }
        // Bias towards the patterns with dedicated kernels
        match u.int_in_range(0..=3)? {
            0 => {
                elements[3] = 0.0;
                elements[7] = 0.0;
                elements[11] = 0.0;
                elements[15] = 1.0;
            }
            1 => {
                let translation = [elements[12], elements[13], elements[14]];
                elements = IDENTITY_ELEMENTS;
                elements[12..15].copy_from_slice(&translation);
            }
            2 => {
                for index in [1, 2, 3, 4, 6, 7, 8, 9, 12, 13, 15] {
                    elements[index] = 0.0;
                }
            }
            _ => {}
        }
        Ok(Self::from_cols_array(elements))
    }

    fn size_hint(_depth: usize) -> (usize, Option<usize>) {
        let size = 16 * std::mem::size_of::<i16>() + 1;
        (size, Some(size))
    }
}
