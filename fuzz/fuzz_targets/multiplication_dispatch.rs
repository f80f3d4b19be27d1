#![no_main]

use libfuzzer_sys::fuzz_target;
use vantage_math::{Matrix4, fuzzing::fuzz_test_multiplication_dispatch};

fuzz_target!(|input: (Matrix4, Matrix4)| {
    fuzz_test_multiplication_dispatch(input);
});
