//! Fuzz target for the audit result header reader.
//!
//! Arbitrary bytes must never panic the reader. Any header it accepts must
//! survive being written back out and read again.

#![no_main]

use libfuzzer_sys::fuzz_target;

use innerring_state::{decode_audit_header, encode_audit_result};

fuzz_target!(|data: &[u8]| {
    let Ok(header) = decode_audit_header(data) else {
        return;
    };

    let id = header.id();
    assert!(id.len() >= 8 + 24, "record key shorter than epoch plus identity");
    assert!(id[8..].starts_with(&header.container_id));

    let rewritten = encode_audit_result(&[], &header, &[]).expect("decoded header fits the layout");
    let reread = decode_audit_header(&rewritten).expect("rewritten header must decode");
    assert_eq!(reread, header);
});
