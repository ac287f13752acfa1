//! Fuzz target for config parsing with override layering.
//!
//! Arbitrary base and override text must only ever produce Ok or Err.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use model_archival::params::Params;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    base: &'a str,
    overrides: &'a str,
    lookup: &'a str,
}

fuzz_target!(|input: Input<'_>| {
    if let Ok(mut params) = Params::parse(input.base, input.overrides) {
        let _ = params.get(input.lookup);
        let _ = params.pop_params(input.lookup);
        let _ = params.to_overrides_text();
    }
});
