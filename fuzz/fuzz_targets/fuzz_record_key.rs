//! Fuzz target for composite record keys.
//!
//! Decoding arbitrary keys must never panic, and re-encoding a decoded key
//! must reproduce it byte for byte. Epoch order must match key order.

#![no_main]

use libfuzzer_sys::fuzz_target;

use innerring_state::{decode_record_key, encode_epoch, encode_record_key, scan_prefix};
use innerring_types::Epoch;

fuzz_target!(|data: &[u8]| {
    if let Ok(decoded) = decode_record_key(data) {
        let rebuilt = encode_record_key(decoded.epoch, &decoded.remainder, None);
        assert_eq!(rebuilt, data, "record key roundtrip mismatch");
        assert!(data.starts_with(&scan_prefix(decoded.epoch, None)));
    }

    if data.len() >= 16 {
        let mut a = [0u8; 8];
        let mut b = [0u8; 8];
        a.copy_from_slice(&data[..8]);
        b.copy_from_slice(&data[8..16]);
        let (a, b) = (i64::from_le_bytes(a), i64::from_le_bytes(b));
        assert_eq!(
            a.cmp(&b),
            encode_epoch(Epoch::new(a)).cmp(&encode_epoch(Epoch::new(b))),
            "epoch encoding is not order preserving"
        );
    }
});
