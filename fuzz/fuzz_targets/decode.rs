#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        // Decoding arbitrary text must return, never panic, and a decoded spec must survive re-encoding
        if let Ok(Some(spec)) = craven_directive::parse(source, "fuzz.rvn") {
            let again = craven_directive::parse(&spec.to_directive(), "fuzz.rvn");
            assert_eq!(again.ok().flatten().map(|s| s.skip), Some(spec.skip));
        }
    }
});
