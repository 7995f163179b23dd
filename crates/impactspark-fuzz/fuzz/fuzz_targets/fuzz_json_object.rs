#![no_main]

use impactspark::models::{CrossrefWork, ImpactAnalysisInput, Publication, SearchInput, Work};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First try to parse as valid JSON
    if let Ok(json) = serde_json::from_slice::<serde_json::Value>(data) {
        // Then try each model type
        if let Ok(work) = serde_json::from_value::<Work>(json.clone()) {
            let _ = Publication::from_openalex(&work);
        }
        if let Ok(work) = serde_json::from_value::<CrossrefWork>(json.clone()) {
            let _ = Publication::from_crossref(&work);
        }
        let _ = serde_json::from_value::<SearchInput>(json.clone());
        let _ = serde_json::from_value::<ImpactAnalysisInput>(json);
    }
});
