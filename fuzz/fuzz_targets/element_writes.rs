#![no_main]

use libfuzzer_sys::fuzz_target;
use vantage_math::{
    Matrix4,
    fuzzing::{ArbitraryElementWrite, fuzz_test_element_writes},
};

fuzz_target!(|input: (Matrix4, Vec<ArbitraryElementWrite>)| {
    fuzz_test_element_writes(input);
});
