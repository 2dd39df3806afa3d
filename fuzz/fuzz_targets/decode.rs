#![no_main]

use libfuzzer_sys::fuzz_target;

use mstrie::codec::Codec;

fuzz_target!(|token: &str| {
    let codec = Codec::new(16);
    if let Ok(v) = codec.decode(token) {
        // Whatever decodes must round-trip through its canonical encoding.
        let again = codec.decode(&codec.encode(&v)).unwrap();
        assert_eq!(v, again);
    }
});
