//! Fuzz tests comparing the specialized kernels with the general ones.

use crate::{Matrix4, MatrixProperties};
use approx::AbsDiffEq;
use arbitrary::Arbitrary;

/// An overwrite of a single element, with the value restricted to a range
/// that includes the special values zero and one often.
#[derive(Clone, Copy, Debug, Arbitrary)]
pub struct ArbitraryElementWrite {
    column: u8,
    row: u8,
    value: i8,
}

impl ArbitraryElementWrite {
    fn value(&self) -> f64 {
        f64::from(self.value) / 4.0
    }
}

fn max_abs_element(matrix: &Matrix4) -> f64 {
    matrix
        .elements()
        .iter()
        .fold(0.0, |max, element| f64::max(max, element.abs()))
}

fn assert_properties_sound(matrix: &Matrix4) {
    let properties = matrix.properties();
    assert!(
        properties.is_consistent(),
        "Inconsistent properties {properties:?}"
    );
    let exact = MatrixProperties::infer(matrix.elements());
    assert!(
        exact.contains(properties.difference(MatrixProperties::ORTHONORMAL)),
        "Properties {properties:?} claimed, but only {exact:?} hold for\n{matrix}"
    );
}

pub fn fuzz_test_multiplication_dispatch((lhs, rhs): (Matrix4, Matrix4)) {
    let product = lhs.multiplied(&rhs);
    let expected = lhs.mul_generic(&rhs);
    assert_properties_sound(&product);

    let tolerance = 1e-12 * (4.0 * max_abs_element(&lhs) * max_abs_element(&rhs)).max(1.0);
    assert!(
        product.abs_diff_eq(&expected, tolerance),
        "Dispatched product\n{product}\ndiffers from\n{expected}\nfor {:?} * {:?}",
        lhs.properties(),
        rhs.properties()
    );
}

pub fn fuzz_test_inversion_dispatch(matrix: Matrix4) {
    let singular_values = matrix.to_nalgebra().singular_values();
    let condition_number = singular_values.max() / singular_values.min();
    if condition_number.is_nan() || condition_number >= 1e6 {
        return;
    }

    let inverse = matrix.inverted();
    let expected = matrix.inverted_generic();
    assert_properties_sound(&inverse);

    let tolerance = 1e-10 * condition_number * max_abs_element(&expected).max(1.0);
    assert!(
        inverse.abs_diff_eq(&expected, tolerance),
        "Dispatched inverse\n{inverse}\ndiffers from\n{expected}\nfor {:?}",
        matrix.properties()
    );
}

pub fn fuzz_test_element_writes((mut matrix, writes): (Matrix4, Vec<ArbitraryElementWrite>)) {
    for write in writes {
        let (column, row) = (usize::from(write.column % 4), usize::from(write.row % 4));
        matrix.set_element(column, row, write.value());
        assert_properties_sound(&matrix);
    }
}
