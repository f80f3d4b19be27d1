//! Identifiers for the planes and corners of a view frustum.

use anyhow::{Error, anyhow};

/// One of the six clipping planes of a view frustum, named by the clip-space
/// boundary it corresponds to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrustumPlane {
    /// The left plane, `x = -w`.
    NegativeX,
    /// The right plane, `x = w`.
    PositiveX,
    /// The bottom plane, `y = -w`.
    NegativeY,
    /// The top plane, `y = w`.
    PositiveY,
    /// The near plane.
    NegativeZ,
    /// The far plane, `z = w`.
    PositiveZ,
}

/// One of the eight corners of a view frustum, named by the three planes
/// meeting there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrustumCorner {
    NxNyNz,
    PxNyNz,
    PxPyNz,
    NxPyNz,
    PxNyPz,
    NxNyPz,
    NxPyPz,
    PxPyPz,
}

impl FrustumPlane {
    pub const ALL: [Self; 6] = [
        Self::NegativeX,
        Self::PositiveX,
        Self::NegativeY,
        Self::PositiveY,
        Self::NegativeZ,
        Self::PositiveZ,
    ];
}

impl FrustumCorner {
    pub const ALL: [Self; 8] = [
        Self::NxNyNz,
        Self::PxNyNz,
        Self::PxPyNz,
        Self::NxPyNz,
        Self::PxNyPz,
        Self::NxNyPz,
        Self::NxPyPz,
        Self::PxPyPz,
    ];

    /// The x-, y- and z-planes meeting at this corner.
    pub const fn planes(self) -> [FrustumPlane; 3] {
        use FrustumPlane::{NegativeX, NegativeY, NegativeZ, PositiveX, PositiveY, PositiveZ};
        match self {
            Self::NxNyNz => [NegativeX, NegativeY, NegativeZ],
            Self::PxNyNz => [PositiveX, NegativeY, NegativeZ],
            Self::PxPyNz => [PositiveX, PositiveY, NegativeZ],
            Self::NxPyNz => [NegativeX, PositiveY, NegativeZ],
            Self::PxNyPz => [PositiveX, NegativeY, PositiveZ],
            Self::NxNyPz => [NegativeX, NegativeY, PositiveZ],
            Self::NxPyPz => [NegativeX, PositiveY, PositiveZ],
            Self::PxPyPz => [PositiveX, PositiveY, PositiveZ],
        }
    }
}

impl TryFrom<usize> for FrustumPlane {
    type Error = Error;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or_else(|| anyhow!("Invalid frustum plane index {}", index))
    }
}

impl TryFrom<usize> for FrustumCorner {
    type Error = Error;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or_else(|| anyhow!("Invalid frustum corner index {}", index))
    }
}
