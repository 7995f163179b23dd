#![no_main]

use impactspark::models::SearchInput;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = serde_json::from_slice::<SearchInput>(data) {
        let _ = input.validate();
        let _ = input.has_citation_filter();
    }
});
