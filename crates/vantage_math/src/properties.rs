//! Cached structural properties of transform matrices.

use bitflags::bitflags;

bitflags! {
    /// Bitflags encoding structural patterns that the elements of a
    /// [`Matrix4`](crate::Matrix4) are known to satisfy.
    ///
    /// A set flag is a guarantee about the elements, while an unset flag
    /// only means that nothing is known. Every flag other than
    /// `PERSPECTIVE` implies `AFFINE`, and `PERSPECTIVE` is never set
    /// together with `AFFINE`.
    #[repr(transparent)]
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MatrixProperties: u8 {
        /// The matrix is a symmetric perspective projection: the last
        /// column is `(0, 0, m23, 0)`, the first two columns only have their
        /// diagonal element set and the third column has zeros above the
        /// diagonal.
        const PERSPECTIVE = 1 << 0;
        /// The last row is exactly `(0, 0, 0, 1)`.
        const AFFINE = 1 << 1;
        /// The matrix is exactly the identity.
        const IDENTITY = 1 << 2;
        /// The upper-left 3x3 block is exactly the identity and the last row
        /// is `(0, 0, 0, 1)`.
        const TRANSLATION = 1 << 3;
        /// The upper-left 3x3 block is orthonormal and the last row is
        /// `(0, 0, 0, 1)`.
        const ORTHONORMAL = 1 << 4;
    }
}

impl MatrixProperties {
    /// The properties of the identity matrix.
    pub const IDENTITY_MATRIX: Self = Self::IDENTITY
        .union(Self::AFFINE)
        .union(Self::TRANSLATION)
        .union(Self::ORTHONORMAL);

    /// The properties of a pure translation matrix.
    pub const TRANSLATION_MATRIX: Self = Self::AFFINE
        .union(Self::TRANSLATION)
        .union(Self::ORTHONORMAL);

    /// The properties of a rigid transform (rotation, reflection and
    /// translation).
    pub const RIGID_MATRIX: Self = Self::AFFINE.union(Self::ORTHONORMAL);

    /// Determines the properties that the given column-major elements
    /// satisfy exactly. `ORTHONORMAL` is only inferred when the upper-left
    /// 3x3 block is exactly the identity, since orthonormality can not be
    /// established through exact comparison in general.
    pub fn infer(elements: &[f64; 16]) -> Self {
        #[rustfmt::skip]
        let [
            m00, m01, m02, m03,
            m10, m11, m12, m13,
            m20, m21, m22, m23,
            m30, m31, m32, m33,
        ] = *elements;

        let mut properties = Self::empty();

        if m03 == 0.0 && m13 == 0.0 {
            if m23 == 0.0 && m33 == 1.0 {
                properties |= Self::AFFINE;
                if m00 == 1.0
                    && m01 == 0.0
                    && m02 == 0.0
                    && m10 == 0.0
                    && m11 == 1.0
                    && m12 == 0.0
                    && m20 == 0.0
                    && m21 == 0.0
                    && m22 == 1.0
                {
                    properties |= Self::TRANSLATION | Self::ORTHONORMAL;
                    if m30 == 0.0 && m31 == 0.0 && m32 == 0.0 {
                        properties |= Self::IDENTITY;
                    }
                }
            } else if m01 == 0.0
                && m02 == 0.0
                && m10 == 0.0
                && m12 == 0.0
                && m20 == 0.0
                && m21 == 0.0
                && m30 == 0.0
                && m31 == 0.0
                && m33 == 0.0
            {
                properties |= Self::PERSPECTIVE;
            }
        }

        properties
    }

    /// Returns the subset of these properties that still holds after the
    /// element in the given column and row has been overwritten with
    /// `value`.
    ///
    /// # Panics
    /// If the indices are outside the matrix.
    pub fn narrowed_for_write(self, column: usize, row: usize, value: f64) -> Self {
        // Writing zero into the 3x3 block keeps the identity pattern of a
        // translation matrix, but may break orthonormality otherwise
        let keep_orthonormal_unless_translation = |properties: Self| {
            if properties.contains(Self::TRANSLATION) {
                properties
            } else {
                properties.difference(Self::ORTHONORMAL)
            }
        };

        match (column, row) {
            (0, 0) | (1, 1) | (2, 2) => {
                if value == 1.0 {
                    keep_orthonormal_unless_translation(self)
                } else {
                    self.difference(Self::IDENTITY | Self::TRANSLATION | Self::ORTHONORMAL)
                }
            }
            (0, 1) | (0, 2) | (1, 0) | (1, 2) | (2, 0) | (2, 1) => {
                if value == 0.0 {
                    keep_orthonormal_unless_translation(self)
                } else {
                    self.difference(
                        Self::IDENTITY
                            | Self::TRANSLATION
                            | Self::ORTHONORMAL
                            | Self::PERSPECTIVE,
                    )
                }
            }
            (0, 3) | (1, 3) => {
                if value == 0.0 {
                    self
                } else {
                    Self::empty()
                }
            }
            (2, 3) => {
                if value == 0.0 {
                    self
                } else {
                    self.difference(
                        Self::IDENTITY | Self::AFFINE | Self::TRANSLATION | Self::ORTHONORMAL,
                    )
                }
            }
            (3, 0) | (3, 1) => {
                if value == 0.0 {
                    self
                } else {
                    self.difference(Self::IDENTITY | Self::PERSPECTIVE)
                }
            }
            (3, 2) => {
                if value == 0.0 {
                    self
                } else {
                    self.difference(Self::IDENTITY)
                }
            }
            (3, 3) => {
                let mut properties = self;
                if value != 0.0 {
                    properties.remove(Self::PERSPECTIVE);
                }
                if value != 1.0 {
                    properties.remove(
                        Self::IDENTITY | Self::AFFINE | Self::TRANSLATION | Self::ORTHONORMAL,
                    );
                }
                properties
            }
            _ => panic!("matrix index ({column}, {row}) out of bounds"),
        }
    }

    /// Whether the flags are mutually consistent: every flag other than
    /// `PERSPECTIVE` requires `AFFINE`, `IDENTITY` requires every other
    /// affine flag and `PERSPECTIVE` excludes `AFFINE`.
    pub fn is_consistent(self) -> bool {
        let needs_affine = Self::IDENTITY | Self::TRANSLATION | Self::ORTHONORMAL;
        if self.intersects(needs_affine) && !self.contains(Self::AFFINE) {
            return false;
        }
        if self.contains(Self::IDENTITY) && !self.contains(Self::IDENTITY_MATRIX) {
            return false;
        }
        if self.contains(Self::TRANSLATION) && !self.contains(Self::ORTHONORMAL) {
            return false;
        }
        !self.contains(Self::PERSPECTIVE | Self::AFFINE)
    }
}
