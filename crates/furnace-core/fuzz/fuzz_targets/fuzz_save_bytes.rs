#![no_main]
use furnace_core::serialize::{SaveFragment, restore};
use furnace_core::test_utils::sample_registry;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Must not panic -- returning Err is fine.
    if let Ok(fragment) = SaveFragment::from_bytes(data) {
        let _ = restore(&fragment, &sample_registry());
    }
});
