//! Fuzz target for postcard-encoded contract values.
//!
//! Ballot tallies and reputation value lists are read back from storage that
//! a corrupted or foreign namespace may have filled. Decoding must never
//! panic, and anything decoded must roundtrip.

#![no_main]

use libfuzzer_sys::fuzz_target;

use innerring_state::Tally;
use innerring_types::codec::{decode, encode};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    match data[0] % 2 {
        0 => try_roundtrip::<Tally>(&data[1..]),
        _ => try_roundtrip::<Vec<Vec<u8>>>(&data[1..]),
    }
});

fn try_roundtrip<T>(data: &[u8])
where
    T: serde::Serialize + serde::de::DeserializeOwned + PartialEq + std::fmt::Debug,
{
    if let Ok(value) = decode::<T>(data) {
        let encoded = encode(&value).expect("encode after successful decode");
        let decoded = decode::<T>(&encoded).expect("decode of re-encoded value");
        assert_eq!(decoded, value, "postcard roundtrip mismatch");
    }
}
