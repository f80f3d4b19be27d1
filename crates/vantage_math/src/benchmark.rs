//! Timing of the property-dispatched kernels against the computations they
//! stand in for.

use crate::{ClipConvention, Matrix4};
use nalgebra::{UnitQuaternion, Vector3};
use std::{
    fmt,
    hint::black_box,
    thread,
    time::{Duration, Instant},
};

/// A computation on a pair of matrices. Inversions ignore the right operand.
pub type Computation = fn(&Matrix4, &Matrix4) -> Matrix4;

/// An operation whose dispatched computation can be timed against a
/// reference computation on the same operands.
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Target {
    /// Identity times affine, against the generic product.
    MulIdentityAffine,
    /// Translation times affine, against the generic product.
    MulTranslationAffine,
    /// Scaled affine times scaled affine, against the generic product.
    MulAffine,
    /// Rigid times rigid, against the generic product.
    MulRigid,
    /// Symmetric perspective times rigid, against the generic product.
    MulPerspectiveAffine,
    /// Affine times affine with tracked properties, against re-inferring
    /// the properties of both operands before every product.
    MulAffineInferred,
    /// Inverse of a translation, against the adjugate inverse.
    InvertTranslation,
    /// Inverse of a rigid transform, against the adjugate inverse.
    InvertRigid,
    /// Inverse of a scaled affine transform, against the adjugate inverse.
    InvertAffine,
    /// Inverse of a symmetric perspective, against the adjugate inverse.
    InvertPerspective,
    /// Inverse of a view-projection matrix, which has no pattern to exploit.
    InvertGeneral,
}

/// Accumulated execution time of repeated calls to a computation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Timing {
    pub calls: u64,
    pub elapsed: Duration,
}

/// Timings of the dispatched and reference computations of a target,
/// together with the largest element difference between their results.
#[derive(Clone, Copy, Debug)]
pub struct Comparison {
    pub target: Target,
    pub dispatched: Timing,
    pub reference: Timing,
    pub deviation: f64,
}

impl Target {
    pub const ALL: [Self; 11] = [
        Self::MulIdentityAffine,
        Self::MulTranslationAffine,
        Self::MulAffine,
        Self::MulRigid,
        Self::MulPerspectiveAffine,
        Self::MulAffineInferred,
        Self::InvertTranslation,
        Self::InvertRigid,
        Self::InvertAffine,
        Self::InvertPerspective,
        Self::InvertGeneral,
    ];

    /// The operands the target is timed on.
    pub fn operands(self) -> (Matrix4, Matrix4) {
        match self {
            Self::MulIdentityAffine => (Matrix4::identity(), scaled_affine()),
            Self::MulTranslationAffine => (translation(), scaled_affine()),
            Self::MulAffine | Self::MulAffineInferred => (scaled_affine(), scaled_affine()),
            Self::MulRigid => (rigid(), rigid()),
            Self::MulPerspectiveAffine => (perspective(), rigid()),
            Self::InvertTranslation => (translation(), Matrix4::identity()),
            Self::InvertRigid => (rigid(), Matrix4::identity()),
            Self::InvertAffine => (scaled_affine(), Matrix4::identity()),
            Self::InvertPerspective => (perspective(), Matrix4::identity()),
            Self::InvertGeneral => (
                perspective().multiplied(&scaled_affine()),
                Matrix4::identity(),
            ),
        }
    }

    /// The computation going through property dispatch.
    pub fn dispatched(self) -> Computation {
        if self.is_inversion() {
            invert_dispatched
        } else {
            multiply_dispatched
        }
    }

    /// The computation the dispatched one is measured against.
    pub fn reference(self) -> Computation {
        match self {
            Self::MulAffineInferred => multiply_inferring_properties,
            _ if self.is_inversion() => invert_generic,
            _ => multiply_generic,
        }
    }

    fn is_inversion(self) -> bool {
        matches!(
            self,
            Self::InvertTranslation
                | Self::InvertRigid
                | Self::InvertAffine
                | Self::InvertPerspective
                | Self::InvertGeneral
        )
    }
}

impl Timing {
    /// The average duration of a single call.
    pub fn per_call(&self) -> Duration {
        if self.calls == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(self.elapsed.as_secs_f64() / self.calls as f64)
        }
    }
}

impl Comparison {
    /// How many times faster the dispatched computation is than the
    /// reference.
    pub fn speedup(&self) -> f64 {
        self.reference.per_call().as_secs_f64() / self.dispatched.per_call().as_secs_f64()
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}: dispatched {:.1} ns ({} calls), reference {:.1} ns ({} calls), speedup {:.2}x, deviation {:e}",
            self.target,
            self.dispatched.per_call().as_secs_f64() * 1e9,
            self.dispatched.calls,
            self.reference.per_call().as_secs_f64() * 1e9,
            self.reference.calls,
            self.speedup(),
            self.deviation,
        )
    }
}

/// Times the dispatched and the reference computation of the target, each
/// for at least `duration` seconds and at least one call.
pub fn compare(target: Target, duration: f64) -> Comparison {
    let (lhs, rhs) = target.operands();
    let duration = Duration::from_secs_f64(duration);

    let dispatched = time(target.dispatched(), &lhs, &rhs, duration);
    let reference = time(target.reference(), &lhs, &rhs, duration);

    let deviation = target
        .dispatched()(&lhs, &rhs)
        .elements()
        .iter()
        .zip(target.reference()(&lhs, &rhs).elements())
        .fold(0.0, |max, (a, b)| f64::max(max, (a - b).abs()));

    Comparison {
        target,
        dispatched,
        reference,
        deviation,
    }
}

/// Sleeps until `delay` seconds have passed since `program_start`, so that a
/// profiler can be attached before timing begins.
pub fn wait_until(program_start: Instant, delay: f64) {
    let remaining = Duration::from_secs_f64(delay).saturating_sub(program_start.elapsed());
    if !remaining.is_zero() {
        thread::sleep(remaining);
    }
}

fn time(computation: Computation, lhs: &Matrix4, rhs: &Matrix4, duration: Duration) -> Timing {
    let start = Instant::now();
    let mut calls = 0;
    loop {
        black_box(computation(black_box(lhs), black_box(rhs)));
        calls += 1;
        if start.elapsed() >= duration {
            break;
        }
    }
    Timing {
        calls,
        elapsed: start.elapsed(),
    }
}

fn multiply_dispatched(lhs: &Matrix4, rhs: &Matrix4) -> Matrix4 {
    lhs.multiplied(rhs)
}

fn multiply_generic(lhs: &Matrix4, rhs: &Matrix4) -> Matrix4 {
    lhs.mul_generic(rhs)
}

fn multiply_inferring_properties(lhs: &Matrix4, rhs: &Matrix4) -> Matrix4 {
    Matrix4::from_cols_array(lhs.to_cols_array())
        .multiplied(&Matrix4::from_cols_array(rhs.to_cols_array()))
}

fn invert_dispatched(matrix: &Matrix4, _: &Matrix4) -> Matrix4 {
    matrix.inverted()
}

fn invert_generic(matrix: &Matrix4, _: &Matrix4) -> Matrix4 {
    matrix.inverted_generic()
}

fn translation() -> Matrix4 {
    Matrix4::translation(1.0, -2.0, 3.0)
}

fn rigid() -> Matrix4 {
    Matrix4::translation_rotate(
        &Vector3::new(1.0, 2.0, 3.0),
        &UnitQuaternion::from_euler_angles(0.1, 0.2, 0.3),
    )
}

fn scaled_affine() -> Matrix4 {
    Matrix4::translation_rotate_scale(
        &Vector3::new(1.0, 2.0, 3.0),
        &UnitQuaternion::from_euler_angles(0.1, 0.2, 0.3),
        &Vector3::new(2.0, 0.5, 1.5),
    )
}

fn perspective() -> Matrix4 {
    Matrix4::perspective(1.2, 1.6, 0.1, 100.0, ClipConvention::OPENGL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatrixProperties;

    #[test]
    fn dispatched_and_reference_computations_agree_for_every_target() {
        for target in Target::ALL {
            let comparison = compare(target, 0.0);
            assert!(
                comparison.deviation < 1e-9,
                "{target:?} deviates by {:e}",
                comparison.deviation
            );
        }
    }

    #[test]
    fn comparing_with_zero_duration_calls_each_computation_once() {
        let comparison = compare(Target::MulRigid, 0.0);
        assert_eq!(comparison.dispatched.calls, 1);
        assert_eq!(comparison.reference.calls, 1);
    }

    #[test]
    fn comparing_keeps_calling_until_duration_has_passed() {
        let comparison = compare(Target::InvertAffine, 0.005);
        assert!(comparison.dispatched.elapsed >= Duration::from_secs_f64(0.005));
        assert!(comparison.reference.elapsed >= Duration::from_secs_f64(0.005));
    }

    #[test]
    fn operands_have_the_patterns_the_targets_are_named_for() {
        let (identity, _) = Target::MulIdentityAffine.operands();
        assert!(identity.properties().contains(MatrixProperties::IDENTITY));

        let (translation, affine) = Target::MulTranslationAffine.operands();
        assert!(translation.properties().contains(MatrixProperties::TRANSLATION));
        assert!(affine.properties().contains(MatrixProperties::AFFINE));
        assert!(!affine.properties().contains(MatrixProperties::ORTHONORMAL));

        let (rigid, _) = Target::InvertRigid.operands();
        assert!(rigid.properties().contains(MatrixProperties::ORTHONORMAL));

        let (perspective, _) = Target::InvertPerspective.operands();
        assert!(perspective.properties().contains(MatrixProperties::PERSPECTIVE));

        let (general, _) = Target::InvertGeneral.operands();
        assert!(general.properties().is_empty());
    }

    #[test]
    fn timing_without_calls_has_zero_duration_per_call() {
        assert_eq!(Timing::default().per_call(), Duration::ZERO);
        let timing = Timing {
            calls: 4,
            elapsed: Duration::from_secs(2),
        };
        assert_eq!(timing.per_call(), Duration::from_millis(500));
    }
}
