#![no_main]

use libfuzzer_sys::fuzz_target;
use once_cell::sync::Lazy;

use bizcrawl::extractor::{extract_detail, extract_listings};
use bizcrawl::schema::{CompiledSchema, ExtractionSchema};

static SCHEMA: Lazy<CompiledSchema> =
    Lazy::new(|| ExtractionSchema::yelp().compile().expect("default schema compiles"));

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);

    // Arbitrary markup may fail extraction but must never panic
    let _ = extract_listings(&html, &SCHEMA, "https://yelp.com");
    if let Ok(Some(detail)) = extract_detail(&html, &SCHEMA, 5) {
        assert!(detail.reviews.len() <= 5);
    }
});
