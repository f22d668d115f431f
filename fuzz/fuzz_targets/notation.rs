#![no_main]

use chessmask::san::Notation;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(Ok(notation)) = std::str::from_utf8(data).map(str::parse::<Notation>) {
        let roundtripped: Notation = notation.to_string().parse().expect("roundtrip");
        assert_eq!(notation.san, roundtripped.san);
    }
});
