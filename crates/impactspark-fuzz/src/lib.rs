//! Fuzzing library for impactspark.
//!
//! Targets exercise JSON deserialization of the OpenAlex and Crossref
//! schemas, normalization into `Publication`, and the view inputs.
//!
//! # Usage
//!
//! ```bash
//! cd crates/impactspark-fuzz
//! cargo +nightly fuzz run fuzz_work_parse -- -max_total_time=60
//! ```

pub use impactspark::models;
