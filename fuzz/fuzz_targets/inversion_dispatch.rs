#![no_main]

use libfuzzer_sys::fuzz_target;
use vantage_math::{Matrix4, fuzzing::fuzz_test_inversion_dispatch};

fuzz_target!(|input: Matrix4| {
    fuzz_test_inversion_dispatch(input);
});
