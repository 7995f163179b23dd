#![no_main]

use impactspark::models::{Publication, Work};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parsing and normalizing must never panic
    if let Ok(work) = serde_json::from_slice::<Work>(data) {
        let publication = Publication::from_openalex(&work);
        let _ = publication.doi_url();
        let _ = publication.authors_joined();
    }
});
