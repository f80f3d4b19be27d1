//! Clip-space conventions for projection and view builders.

/// Range that normalized device depth is mapped into by a projection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DepthRange {
    /// Depth in `[-1, 1]`, as used by OpenGL.
    #[default]
    NegativeOneToOne,
    /// Depth in `[0, 1]`, as used by Vulkan, Direct3D and Metal.
    ZeroToOne,
}

/// Handedness of the view space a projection or view matrix works in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Handedness {
    /// The camera looks along the negative z-axis.
    #[default]
    Right,
    /// The camera looks along the positive z-axis.
    Left,
}

/// A combination of depth range and handedness that determines the exact
/// form of a projection matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ClipConvention {
    pub depth_range: DepthRange,
    pub handedness: Handedness,
}

/// Offset used in place of the vanishing `n/f` ratio when a near or far
/// plane is placed at infinity, keeping the projected depth of infinitely
/// distant points strictly inside the depth range.
pub const INFINITE_PLANE_EPSILON: f64 = 1e-6;

impl DepthRange {
    /// Whether depth is mapped into `[0, 1]`.
    #[inline]
    pub const fn is_zero_to_one(self) -> bool {
        matches!(self, Self::ZeroToOne)
    }

    /// The length of the depth range.
    #[inline]
    pub const fn extent(self) -> f64 {
        match self {
            Self::NegativeOneToOne => 2.0,
            Self::ZeroToOne => 1.0,
        }
    }
}

impl Handedness {
    /// The sign of the view-space z-coordinate of points in front of the
    /// camera.
    #[inline]
    pub const fn forward_sign(self) -> f64 {
        match self {
            Self::Right => -1.0,
            Self::Left => 1.0,
        }
    }
}

impl ClipConvention {
    /// Right-handed view space with depth in `[-1, 1]`.
    pub const OPENGL: Self = Self::new(DepthRange::NegativeOneToOne, Handedness::Right);

    /// Right-handed view space with depth in `[0, 1]`.
    pub const VULKAN: Self = Self::new(DepthRange::ZeroToOne, Handedness::Right);

    /// Left-handed view space with depth in `[0, 1]`.
    pub const DIRECTX: Self = Self::new(DepthRange::ZeroToOne, Handedness::Left);

    #[inline]
    pub const fn new(depth_range: DepthRange, handedness: Handedness) -> Self {
        Self {
            depth_range,
            handedness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_convention_is_opengl() {
        assert_eq!(ClipConvention::default(), ClipConvention::OPENGL);
    }

    #[test]
    fn depth_range_extents_are_correct() {
        assert_eq!(DepthRange::NegativeOneToOne.extent(), 2.0);
        assert_eq!(DepthRange::ZeroToOne.extent(), 1.0);
    }
}
