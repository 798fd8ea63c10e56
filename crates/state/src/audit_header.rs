//! Reader for the header of a serialized audit result.
//!
//! Audit results are opaque protobuf-style messages. The contract only needs
//! three leading fields to place a result in storage, so it reads them at
//! fixed positions instead of decoding the whole message:
//!
//! ```text
//! [0]            version field tag        (skipped)
//! [1]            version length L
//! [2 .. 2+L]     version bytes            (skipped)
//! [2+L]          epoch field tag          (skipped)
//! [3+L .. 11+L]  epoch, u64 little-endian
//! [11+L]         container struct tag     (skipped)
//! [12+L]         container struct length  (must equal C + 2)
//! [13+L]         container value tag      (skipped)
//!                container length C, then C bytes
//!                public key tag           (1 byte, skipped)
//!                public key length K, then K bytes
//!                payload                  (ignored)
//! ```
//!
//! Lengths are single bytes below `0x80`; longer varint lengths are rejected
//! rather than misread.

use innerring_types::{Epoch, IdentityError, PublicKey};
use snafu::{ResultExt, Snafu, ensure};

use crate::keys::encode_record_key;

const VERSION_TAG: u8 = 0x0A;
const EPOCH_TAG: u8 = 0x11;
const CONTAINER_TAG: u8 = 0x1A;
const CONTAINER_VALUE_TAG: u8 = 0x0A;
const PUBLIC_KEY_TAG: u8 = 0x22;

const MAX_SHORT_LEN: u8 = 0x7F;

/// Errors from reading an audit result header.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum HeaderError {
    /// Input ended before a field was complete.
    #[snafu(display(
        "audit header truncated reading {field}: need {needed} bytes at offset {offset}, input is {len} bytes"
    ))]
    Truncated {
        /// Field being read.
        field: &'static str,
        /// Offset the read started at.
        offset: usize,
        /// Bytes the read required.
        needed: usize,
        /// Total input length.
        len: usize,
    },

    /// A length byte uses the multi-byte varint form.
    #[snafu(display("audit header {field} length {value:#04x} exceeds the single-byte form"))]
    LengthOverflow {
        /// Field whose length was read.
        field: &'static str,
        /// Raw length byte.
        value: u8,
    },

    /// Container struct length disagrees with the container id it wraps.
    #[snafu(display(
        "audit header container struct length {declared} does not match container id length {container}"
    ))]
    ContainerLengthMismatch {
        /// Struct length byte as read.
        declared: usize,
        /// Length of the container id inside the struct.
        container: usize,
    },

    /// Epoch does not fit in a signed 64-bit integer.
    #[snafu(display("audit header epoch {value} is out of range"))]
    EpochOutOfRange {
        /// Raw unsigned epoch.
        value: u64,
    },

    /// Publisher key is not a compressed public key.
    #[snafu(display("audit header publisher key is invalid: {source}"))]
    InvalidKey {
        /// Shape error.
        source: IdentityError,
    },
}

/// Leading fields of an audit result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditHeader {
    /// Epoch the audit was performed in.
    pub epoch: Epoch,
    /// Audited container identifier.
    pub container_id: Vec<u8>,
    /// Inner Ring node that performed the audit.
    pub from: PublicKey,
}

impl AuditHeader {
    /// Storage key of the result: `epoch ++ container_id ++ identity_prefix(from)`.
    pub fn id(&self) -> Vec<u8> {
        encode_record_key(self.epoch, &self.container_id, Some(&self.from))
    }
}

struct Reader<'a> {
    input: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input, offset: 0 }
    }

    fn take(&mut self, field: &'static str, needed: usize) -> Result<&'a [u8], HeaderError> {
        let end = self.offset.checked_add(needed);
        let bytes = end.and_then(|end| self.input.get(self.offset..end)).ok_or(
            HeaderError::Truncated { field, offset: self.offset, needed, len: self.input.len() },
        )?;
        self.offset += needed;
        Ok(bytes)
    }

    fn skip(&mut self, field: &'static str, count: usize) -> Result<(), HeaderError> {
        self.take(field, count).map(|_| ())
    }

    fn length(&mut self, field: &'static str) -> Result<usize, HeaderError> {
        let value = self.take(field, 1)?[0];
        ensure!(value <= MAX_SHORT_LEN, LengthOverflowSnafu { field, value });
        Ok(usize::from(value))
    }

    /// Reads a single-byte length followed by that many bytes.
    fn prefixed(&mut self, field: &'static str) -> Result<&'a [u8], HeaderError> {
        let len = self.length(field)?;
        self.take(field, len)
    }

    fn u64_le(&mut self, field: &'static str) -> Result<u64, HeaderError> {
        let bytes = self.take(field, 8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(raw))
    }
}

/// Reads the header fields of a serialized audit result.
///
/// # Errors
///
/// Returns [`HeaderError`] if the input is truncated, uses an unsupported
/// length encoding, declares a container struct length other than the
/// container id length plus two, carries an epoch above `i64::MAX`, or names
/// a publisher key of the wrong shape.
pub fn decode_audit_header(raw: &[u8]) -> Result<AuditHeader, HeaderError> {
    let mut reader = Reader::new(raw);

    reader.skip("version tag", 1)?;
    reader.prefixed("version")?;
    reader.skip("epoch tag", 1)?;
    let value = reader.u64_le("epoch")?;
    let epoch = i64::try_from(value).map_err(|_| HeaderError::EpochOutOfRange { value })?;

    reader.skip("container tag", 1)?;
    let declared = reader.length("container header")?;
    reader.skip("container value tag", 1)?;
    let container_id = reader.prefixed("container id")?.to_vec();
    ensure!(
        declared == container_id.len() + 2,
        ContainerLengthMismatchSnafu { declared, container: container_id.len() }
    );

    reader.skip("public key tag", 1)?;
    let from = PublicKey::from_bytes(reader.prefixed("public key")?).context(InvalidKeySnafu)?;

    Ok(AuditHeader { epoch: Epoch::new(epoch), container_id, from })
}

/// Serializes an audit result in the layout [`decode_audit_header`] reads.
///
/// `version` must be shorter than 128 bytes and `container_id` at most 125
/// bytes.
///
/// # Errors
///
/// Returns [`HeaderError::LengthOverflow`] if a variable field does not fit
/// the single-byte length form, or [`HeaderError::EpochOutOfRange`] for a
/// negative epoch.
pub fn encode_audit_result(
    version: &[u8],
    header: &AuditHeader,
    payload: &[u8],
) -> Result<Vec<u8>, HeaderError> {
    let short_len = |field: &'static str, len: usize| -> Result<u8, HeaderError> {
        u8::try_from(len)
            .ok()
            .filter(|len| *len <= MAX_SHORT_LEN)
            .ok_or(HeaderError::LengthOverflow { field, value: u8::MAX })
    };
    let version_len = short_len("version", version.len())?;
    let container_len = short_len("container id", header.container_id.len())?;
    // Struct length covers the nested value tag and length byte.
    let container_struct_len = short_len("container header", header.container_id.len() + 2)?;
    let key = header.from.as_bytes();
    let key_len = short_len("public key", key.len())?;
    let epoch = u64::try_from(header.epoch.value())
        .map_err(|_| HeaderError::EpochOutOfRange { value: header.epoch.value() as u64 })?;

    let mut out = Vec::with_capacity(
        2 + version.len() + 9 + 4 + header.container_id.len() + 2 + key.len() + payload.len(),
    );
    out.push(VERSION_TAG);
    out.push(version_len);
    out.extend_from_slice(version);
    out.push(EPOCH_TAG);
    out.extend_from_slice(&epoch.to_le_bytes());
    out.push(CONTAINER_TAG);
    out.push(container_struct_len);
    out.push(CONTAINER_VALUE_TAG);
    out.push(container_len);
    out.extend_from_slice(&header.container_id);
    out.push(PUBLIC_KEY_TAG);
    out.push(key_len);
    out.extend_from_slice(key);
    out.extend_from_slice(payload);
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::keys::{EPOCH_LEN, MAX_RECORD_KEY_LEN, encode_epoch, identity_prefix};

    fn header(epoch: i64) -> AuditHeader {
        let mut key = [0x11; 33];
        key[0] = 0x03;
        AuditHeader {
            epoch: Epoch::new(epoch),
            container_id: vec![0xC1; 32],
            from: PublicKey::from_bytes(&key).unwrap(),
        }
    }

    #[test]
    fn test_decode_written_result() {
        let expected = header(17);
        let raw = encode_audit_result(&[0x08, 0x02], &expected, b"trailing payload").unwrap();
        assert_eq!(decode_audit_header(&raw).unwrap(), expected);
    }

    #[test]
    fn test_hand_built_layout() {
        // Version "\x08\x02", epoch 5, 2-byte container, 33-byte key.
        let mut raw = vec![0x0A, 0x02, 0x08, 0x02, 0x11];
        raw.extend_from_slice(&5u64.to_le_bytes());
        raw.extend_from_slice(&[0x1A, 0x04, 0x0A, 0x02, 0xAB, 0xCD]);
        raw.extend_from_slice(&[0x22, 33, 0x02]);
        raw.extend_from_slice(&[0x55; 32]);

        let decoded = decode_audit_header(&raw).unwrap();
        assert_eq!(decoded.epoch, Epoch::new(5));
        assert_eq!(decoded.container_id, vec![0xAB, 0xCD]);
        assert_eq!(decoded.from.as_bytes()[0], 0x02);
    }

    #[test]
    fn test_id_layout() {
        let header = header(9);
        let id = header.id();
        assert_eq!(id.len(), MAX_RECORD_KEY_LEN);
        assert_eq!(&id[..EPOCH_LEN], &encode_epoch(Epoch::new(9)));
        assert_eq!(&id[EPOCH_LEN..EPOCH_LEN + 32], header.container_id.as_slice());
        assert_eq!(&id[EPOCH_LEN + 32..], &identity_prefix(&header.from));
    }

    #[test]
    fn test_every_truncation_is_rejected() {
        let raw = encode_audit_result(&[0x08, 0x02], &header(3), &[]).unwrap();
        for len in 0..raw.len() {
            let err = decode_audit_header(&raw[..len]).unwrap_err();
            assert!(matches!(err, HeaderError::Truncated { .. }), "len {len}: {err:?}");
        }
    }

    #[test]
    fn test_long_length_byte_rejected() {
        let mut raw = encode_audit_result(&[], &header(3), &[]).unwrap();
        raw[1] = 0x80;
        assert_eq!(
            decode_audit_header(&raw).unwrap_err(),
            HeaderError::LengthOverflow { field: "version", value: 0x80 }
        );
    }

    #[test]
    fn test_epoch_above_signed_range_rejected() {
        let mut raw = encode_audit_result(&[], &header(0), &[]).unwrap();
        raw[3..11].copy_from_slice(&u64::MAX.to_le_bytes());
        assert_eq!(
            decode_audit_header(&raw).unwrap_err(),
            HeaderError::EpochOutOfRange { value: u64::MAX }
        );
    }

    #[test]
    fn test_bad_key_shape_rejected() {
        let mut raw = encode_audit_result(&[], &header(1), &[]).unwrap();
        let key_start = raw.len() - 33;
        raw[key_start] = 0x04;
        assert!(matches!(decode_audit_header(&raw), Err(HeaderError::InvalidKey { .. })));
    }

    #[test]
    fn test_oversized_container_not_written() {
        let mut header = header(1);
        header.container_id = vec![0; 200];
        assert!(matches!(
            encode_audit_result(&[], &header, &[]),
            Err(HeaderError::LengthOverflow { field: "container id", .. })
        ));
    }

    // Longest container id whose struct length still fits the single-byte form.
    const MAX_CONTAINER_ID_LEN: usize = 125;

    fn raw_with_container(len: usize) -> Vec<u8> {
        let mut raw = vec![0x0A, 0x00, 0x11];
        raw.extend_from_slice(&4u64.to_le_bytes());
        raw.extend_from_slice(&[0x1A, (len + 2) as u8, 0x0A, len as u8]);
        raw.extend(std::iter::repeat_n(0xAA, len));
        raw.extend_from_slice(&[0x22, 33]);
        raw.extend_from_slice(header(0).from.as_bytes());
        raw
    }

    #[test]
    fn test_container_length_boundary() {
        let raw = raw_with_container(MAX_CONTAINER_ID_LEN);
        let decoded = decode_audit_header(&raw).unwrap();
        assert_eq!(decoded.container_id.len(), 125);
        assert_eq!(encode_audit_result(&[], &decoded, &[]).unwrap(), raw);

        // 126 and 127 would need a struct length past the single-byte form.
        for len in [126usize, 127] {
            let mut raw = raw_with_container(len);
            raw[12] = 0x7F;
            assert!(decode_audit_header(&raw).is_err(), "container of {len} bytes");
        }
        let mut too_long = header(0);
        too_long.container_id = vec![0xAA; 126];
        assert!(matches!(
            encode_audit_result(&[], &too_long, &[]),
            Err(HeaderError::LengthOverflow { field: "container header", .. })
        ));
    }

    #[test]
    fn test_container_struct_length_must_match() {
        let mut raw = encode_audit_result(&[], &header(2), &[]).unwrap();
        raw[12] = 0x10;
        assert_eq!(
            decode_audit_header(&raw).unwrap_err(),
            HeaderError::ContainerLengthMismatch { declared: 0x10, container: 32 }
        );
    }

    proptest! {
        #[test]
        fn prop_accepted_headers_are_rewritable(
            bytes in proptest::collection::vec(any::<u8>(), 0..256),
        ) {
            if let Ok(header) = decode_audit_header(&bytes) {
                let rewritten = encode_audit_result(&[], &header, &[]).unwrap();
                prop_assert_eq!(decode_audit_header(&rewritten).unwrap(), header);
            }
        }

        #[test]
        fn prop_reader_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..128)) {
            let _ = decode_audit_header(&bytes);
        }
    }
}
