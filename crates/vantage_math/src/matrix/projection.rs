//! Orthographic and perspective projections.

use super::Matrix4;
use crate::{
    convention::{ClipConvention, DepthRange, Handedness, INFINITE_PLANE_EPSILON},
    properties::MatrixProperties,
};

/// Which of the clipping planes of a perspective projection, if any, is
/// placed at infinity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum InfinitePlane {
    None,
    Near,
    Far,
}

impl InfinitePlane {
    fn of(near: f64, far: f64) -> Self {
        let far_is_infinite = far.is_infinite() && far > 0.0;
        let near_is_infinite = near.is_infinite() && near > 0.0;
        match (near_is_infinite, far_is_infinite) {
            (false, true) => Self::Far,
            (true, false) => Self::Near,
            (true, true) => {
                log::warn!(
                    "Perspective projection has both near and far plane at infinity"
                );
                Self::None
            }
            (false, false) => Self::None,
        }
    }
}

/// Computes the `m22` and `m32` elements of a perspective projection, which
/// map view-space depth to clip-space depth.
fn perspective_depth_terms(near: f64, far: f64, convention: ClipConvention) -> (f64, f64) {
    let zero_to_one = convention.depth_range.is_zero_to_one();
    let extent = convention.depth_range.extent();
    let epsilon = INFINITE_PLANE_EPSILON;

    match (InfinitePlane::of(near, far), convention.handedness) {
        (InfinitePlane::Far, Handedness::Right) => (epsilon - 1.0, (epsilon - extent) * near),
        (InfinitePlane::Far, Handedness::Left) => (1.0 - epsilon, (epsilon - extent) * near),
        (InfinitePlane::Near, Handedness::Right) => {
            let m22 = (if zero_to_one { 0.0 } else { 1.0 }) - epsilon;
            (m22, (extent - epsilon) * far)
        }
        (InfinitePlane::Near, Handedness::Left) => {
            let m22 = (if zero_to_one { 0.0 } else { -1.0 }) + epsilon;
            (m22, (extent - epsilon) * far)
        }
        (InfinitePlane::None, handedness) => {
            let numerator = if zero_to_one { far } else { far + near };
            let m22 = match handedness {
                Handedness::Right => numerator / (near - far),
                Handedness::Left => numerator / (far - near),
            };
            let m32 = (if zero_to_one { far } else { far + far }) * near / (near - far);
            (m22, m32)
        }
    }
}

/// Computes the `m22` and `m32` elements of an orthographic projection.
fn orthographic_depth_terms(near: f64, far: f64, convention: ClipConvention) -> (f64, f64) {
    let extent = convention.depth_range.extent();
    let m22 = match convention.handedness {
        Handedness::Right => extent / (near - far),
        Handedness::Left => extent / (far - near),
    };
    let m32 = match convention.depth_range {
        DepthRange::ZeroToOne => near / (near - far),
        DepthRange::NegativeOneToOne => (far + near) / (near - far),
    };
    (m22, m32)
}

fn perspective_properties(elements: &[f64; 16]) -> MatrixProperties {
    if elements[8] == 0.0 && elements[9] == 0.0 {
        MatrixProperties::PERSPECTIVE
    } else {
        MatrixProperties::empty()
    }
}

impl Matrix4 {
    /// Creates an orthographic projection mapping the box bounded by the
    /// given planes to the clip volume of the convention. The near and far
    /// distances are measured along the viewing direction.
    pub fn orthographic(
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        near: f64,
        far: f64,
        convention: ClipConvention,
    ) -> Self {
        let (m22, m32) = orthographic_depth_terms(near, far, convention);

        let mut elements = [0.0; 16];
        elements[0] = 2.0 / (right - left);
        elements[5] = 2.0 / (top - bottom);
        elements[10] = m22;
        elements[12] = (right + left) / (left - right);
        elements[13] = (top + bottom) / (bottom - top);
        elements[14] = m32;
        elements[15] = 1.0;

        Self::with_properties(elements, MatrixProperties::AFFINE)
    }

    /// Creates an orthographic projection of a box of the given width and
    /// height centered on the viewing axis.
    pub fn orthographic_symmetric(
        width: f64,
        height: f64,
        near: f64,
        far: f64,
        convention: ClipConvention,
    ) -> Self {
        let half_width = 0.5 * width;
        let half_height = 0.5 * height;
        Self::orthographic(
            -half_width,
            half_width,
            -half_height,
            half_height,
            near,
            far,
            convention,
        )
    }

    /// Creates an orthographic projection for 2D rendering, with the near
    /// and far planes at -1 and 1.
    pub fn orthographic_2d(
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        handedness: Handedness,
    ) -> Self {
        let mut elements = [0.0; 16];
        elements[0] = 2.0 / (right - left);
        elements[5] = 2.0 / (top - bottom);
        elements[10] = handedness.forward_sign();
        elements[12] = (right + left) / (left - right);
        elements[13] = (top + bottom) / (bottom - top);
        elements[15] = 1.0;

        Self::with_properties(elements, MatrixProperties::AFFINE)
    }

    /// Creates a perspective projection of the frustum whose near plane
    /// spans the given rectangle. The near and far distances are measured
    /// along the viewing direction, and either may be [`f64::INFINITY`].
    pub fn frustum(
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        near: f64,
        far: f64,
        convention: ClipConvention,
    ) -> Self {
        let (m22, m32) = perspective_depth_terms(near, far, convention);

        let mut elements = [0.0; 16];
        elements[0] = (near + near) / (right - left);
        elements[5] = (near + near) / (top - bottom);
        match convention.handedness {
            Handedness::Right => {
                elements[8] = (right + left) / (right - left);
                elements[9] = (top + bottom) / (top - bottom);
            }
            Handedness::Left => {
                elements[8] = (right + left) / (left - right);
                elements[9] = (top + bottom) / (bottom - top);
            }
        }
        elements[10] = m22;
        elements[11] = convention.handedness.forward_sign();
        elements[14] = m32;

        let properties = perspective_properties(&elements);
        Self::with_properties(elements, properties)
    }

    /// Creates a symmetric perspective projection with the given vertical
    /// field of view in radians and width-to-height aspect ratio. Either
    /// clipping distance may be [`f64::INFINITY`].
    pub fn perspective(
        fov_y: f64,
        aspect_ratio: f64,
        near: f64,
        far: f64,
        convention: ClipConvention,
    ) -> Self {
        let half_height = (0.5 * fov_y).tan();
        Self::symmetric_perspective(
            1.0 / (half_height * aspect_ratio),
            1.0 / half_height,
            near,
            far,
            convention,
        )
    }

    /// Creates a symmetric perspective projection whose near plane is a
    /// rectangle of the given width and height.
    pub fn perspective_rect(
        width: f64,
        height: f64,
        near: f64,
        far: f64,
        convention: ClipConvention,
    ) -> Self {
        Self::symmetric_perspective(
            (near + near) / width,
            (near + near) / height,
            near,
            far,
            convention,
        )
    }

    fn symmetric_perspective(
        x_scale: f64,
        y_scale: f64,
        near: f64,
        far: f64,
        convention: ClipConvention,
    ) -> Self {
        let (m22, m32) = perspective_depth_terms(near, far, convention);

        let mut elements = [0.0; 16];
        elements[0] = x_scale;
        elements[5] = y_scale;
        elements[10] = m22;
        elements[11] = convention.handedness.forward_sign();
        elements[14] = m32;

        Self::with_properties(elements, MatrixProperties::PERSPECTIVE)
    }

    /// Computes `self * O` for the orthographic projection `O`. An identity
    /// matrix gives the projection itself, and an affine matrix gives an
    /// affine result.
    pub fn mul_orthographic(
        &self,
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        near: f64,
        far: f64,
        convention: ClipConvention,
    ) -> Self {
        self.multiplied(&Self::orthographic(
            left, right, bottom, top, near, far, convention,
        ))
    }

    /// Computes `self * O` for the symmetric orthographic projection `O`.
    pub fn mul_orthographic_symmetric(
        &self,
        width: f64,
        height: f64,
        near: f64,
        far: f64,
        convention: ClipConvention,
    ) -> Self {
        self.multiplied(&Self::orthographic_symmetric(
            width, height, near, far, convention,
        ))
    }

    /// Computes `self * O` for the 2D orthographic projection `O`.
    pub fn mul_orthographic_2d(
        &self,
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        handedness: Handedness,
    ) -> Self {
        self.multiplied(&Self::orthographic_2d(left, right, bottom, top, handedness))
    }

    /// Computes `self * P` for the frustum projection `P`.
    pub fn mul_frustum(
        &self,
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        near: f64,
        far: f64,
        convention: ClipConvention,
    ) -> Self {
        self.multiplied(&Self::frustum(
            left, right, bottom, top, near, far, convention,
        ))
    }

    /// Computes `self * P` for the symmetric perspective projection `P`.
    pub fn mul_perspective(
        &self,
        fov_y: f64,
        aspect_ratio: f64,
        near: f64,
        far: f64,
        convention: ClipConvention,
    ) -> Self {
        self.multiplied(&Self::perspective(
            fov_y,
            aspect_ratio,
            near,
            far,
            convention,
        ))
    }
}
