//! Millisecond-flavoured KSUID: the sortable unique value behind every identifier.
//!
//! Layout (20 bytes, big-endian):
//!
//! ```text
//! +----------------+----------+-------------------------------+
//! | seconds (4)    | frac (1) | random payload (15)           |
//! +----------------+----------+-------------------------------+
//! ```
//!
//! `seconds` counts whole seconds since [`KSUID_EPOCH`], `frac` is the
//! sub-second part in 1/256 s steps (~3.9 ms). The canonical text form is the
//! 160-bit integer in base62, left-padded with `0` to [`ENCODED_LEN`]
//! characters, so string order, byte order and `Ord` all agree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::RngCore;

use crate::IdError;

/// Unix time (seconds) of the KSUID epoch, 2014-05-13T16:53:20Z.
pub const KSUID_EPOCH: i64 = 1_400_000_000;

/// Total size of a KSUID in bytes.
pub const BYTE_LEN: usize = 20;

/// Size of the timestamp portion (seconds + fraction) in bytes.
pub const TIMESTAMP_LEN: usize = 5;

/// Size of the random payload in bytes.
pub const PAYLOAD_LEN: usize = BYTE_LEN - TIMESTAMP_LEN;

/// Length of the canonical base62 encoding.
pub const ENCODED_LEN: usize = 27;

const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Nanoseconds represented by one step of the fractional byte.
const NANOS_PER_FRACTION: u32 = 3_906_250;

const WORDS: usize = BYTE_LEN / 4;

/// A time-ordered unique value with a 1/256 s timestamp and 120 random bits.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KsuidMs([u8; BYTE_LEN]);

impl KsuidMs {
    /// The smallest possible value (`000000000000000000000000000`).
    pub const MIN: Self = Self([0; BYTE_LEN]);

    /// The largest possible value (`aWgEPTl1tmebfsQzFP4bxwgy80V`).
    pub const MAX: Self = Self([0xff; BYTE_LEN]);

    /// Creates a fresh value stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        // The current time is inside the 32-bit window until 2150.
        let seconds = (now.timestamp() - KSUID_EPOCH).clamp(0, i64::from(u32::MAX)) as u32;
        Self::from_parts(seconds, fraction_of(&now), random_payload())
    }

    /// Creates a fresh value stamped with `at`.
    pub fn from_datetime(at: DateTime<Utc>) -> Result<Self, IdError> {
        let seconds = u32::try_from(at.timestamp() - KSUID_EPOCH).map_err(|_| {
            IdError::TimestampOutOfRange {
                instant: at.to_rfc3339(),
            }
        })?;
        Ok(Self::from_parts(seconds, fraction_of(&at), random_payload()))
    }

    /// Assembles a value from its timestamp fields and payload.
    #[must_use]
    pub fn from_parts(seconds: u32, fraction: u8, payload: [u8; PAYLOAD_LEN]) -> Self {
        let mut bytes = [0u8; BYTE_LEN];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4] = fraction;
        bytes[TIMESTAMP_LEN..].copy_from_slice(&payload);
        Self(bytes)
    }

    /// Creates a value from its raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; BYTE_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; BYTE_LEN] {
        &self.0
    }

    /// Whole seconds since [`KSUID_EPOCH`].
    #[must_use]
    pub fn seconds(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Sub-second part in 1/256 s steps.
    #[must_use]
    pub const fn fraction(&self) -> u8 {
        self.0[4]
    }

    /// The random payload.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.0[TIMESTAMP_LEN..]
    }

    /// The embedded instant, truncated to 1/256 s.
    #[must_use]
    pub fn datetime(&self) -> DateTime<Utc> {
        let secs = i64::from(self.seconds()) + KSUID_EPOCH;
        let nanos = u32::from(self.fraction()) * NANOS_PER_FRACTION;
        // Both fields are always in range for chrono.
        DateTime::from_timestamp(secs, nanos).unwrap_or_default()
    }

    /// The embedded instant as fractional Unix seconds.
    #[must_use]
    pub fn timestamp(&self) -> f64 {
        (i64::from(self.seconds()) + KSUID_EPOCH) as f64 + f64::from(self.fraction()) / 256.0
    }

    /// Encodes the value as 27 base62 characters.
    #[must_use]
    pub fn to_base62(&self) -> String {
        let mut words = self.words();
        let mut out = [b'0'; ENCODED_LEN];
        let mut pos = ENCODED_LEN;

        // 62^27 > 2^160, so at most ENCODED_LEN digits are produced.
        while words.iter().any(|w| *w != 0) {
            let mut rem = 0u64;
            for word in words.iter_mut() {
                let acc = (rem << 32) | u64::from(*word);
                *word = (acc / 62) as u32;
                rem = acc % 62;
            }
            pos -= 1;
            out[pos] = ALPHABET[rem as usize];
        }

        out.iter().map(|&b| b as char).collect()
    }

    /// Strictly decodes a 27-character base62 string.
    ///
    /// Rejects wrong lengths, characters outside `0-9A-Za-z`, and values that
    /// do not fit in 160 bits.
    pub fn from_base62(encoded: &str) -> Result<Self, IdError> {
        let len = encoded.chars().count();
        if len != ENCODED_LEN {
            return Err(IdError::InvalidUidLength {
                expected: ENCODED_LEN,
                actual: len,
            });
        }

        let mut words = [0u32; WORDS];
        for c in encoded.chars() {
            let digit = base62_digit(c).ok_or_else(|| IdError::MalformedUid {
                encoded: encoded.to_string(),
                reason: format!("invalid base62 character '{c}'"),
            })?;

            let mut carry = u64::from(digit);
            for word in words.iter_mut().rev() {
                let acc = u64::from(*word) * 62 + carry;
                *word = acc as u32;
                carry = acc >> 32;
            }
            if carry != 0 {
                return Err(IdError::MalformedUid {
                    encoded: encoded.to_string(),
                    reason: "value exceeds 160 bits".to_string(),
                });
            }
        }

        let mut bytes = [0u8; BYTE_LEN];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(words) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        Ok(Self(bytes))
    }

    fn words(&self) -> [u32; WORDS] {
        let mut words = [0u32; WORDS];
        for (word, chunk) in words.iter_mut().zip(self.0.chunks_exact(4)) {
            *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        words
    }
}

impl Default for KsuidMs {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for KsuidMs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base62())
    }
}

impl fmt::Debug for KsuidMs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KsuidMs({})", self.to_base62())
    }
}

impl FromStr for KsuidMs {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base62(s)
    }
}

fn fraction_of(at: &DateTime<Utc>) -> u8 {
    // Leap seconds report up to 2e9 nanos.
    (at.timestamp_subsec_nanos() / NANOS_PER_FRACTION).min(255) as u8
}

fn random_payload() -> [u8; PAYLOAD_LEN] {
    let mut payload = [0u8; PAYLOAD_LEN];
    rand::rng().fill_bytes(&mut payload);
    payload
}

fn base62_digit(c: char) -> Option<u32> {
    match c {
        '0'..='9' => Some(c as u32 - '0' as u32),
        'A'..='Z' => Some(c as u32 - 'A' as u32 + 10),
        'a'..='z' => Some(c as u32 - 'a' as u32 + 36),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn test_min_max_encoding() {
        assert_eq!(KsuidMs::MIN.to_base62(), "0".repeat(ENCODED_LEN));
        assert_eq!(KsuidMs::MAX.to_base62(), "aWgEPTl1tmebfsQzFP4bxwgy80V");
        assert_eq!(
            KsuidMs::from_base62("aWgEPTl1tmebfsQzFP4bxwgy80V").unwrap(),
            KsuidMs::MAX
        );
    }

    #[test]
    fn test_known_vector() {
        let bytes = [
            0x06, 0x69, 0xF7, 0xEF, 0xB5, 0xA1, 0xCD, 0x34, 0xB5, 0xF9, 0x9D, 0x11, 0x54, 0xFB,
            0x68, 0x53, 0x34, 0x5C, 0x97, 0x35,
        ];
        let ksuid = KsuidMs::from_bytes(bytes);
        assert_eq!(ksuid.to_base62(), "0ujtsYcgvSTl8PAuAdqWYSMnLOv");
        assert_eq!(
            KsuidMs::from_base62("0ujtsYcgvSTl8PAuAdqWYSMnLOv").unwrap(),
            ksuid
        );
        assert_eq!(ksuid.seconds(), 107_608_047);
    }

    #[test]
    fn test_rejects_overflow() {
        let err = KsuidMs::from_base62("aWgEPTl1tmebfsQzFP4bxwgy80W").unwrap_err();
        assert!(matches!(err, IdError::MalformedUid { .. }));

        let err = KsuidMs::from_base62(&"z".repeat(ENCODED_LEN)).unwrap_err();
        assert!(matches!(err, IdError::MalformedUid { .. }));
    }

    #[test]
    fn test_rejects_bad_alphabet() {
        let err = KsuidMs::from_base62(&"!".repeat(ENCODED_LEN)).unwrap_err();
        assert!(matches!(err, IdError::MalformedUid { .. }));

        let mut almost = "0".repeat(ENCODED_LEN - 1);
        almost.push('_');
        assert!(matches!(
            KsuidMs::from_base62(&almost).unwrap_err(),
            IdError::MalformedUid { .. }
        ));
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert_eq!(
            KsuidMs::from_base62("abc").unwrap_err(),
            IdError::InvalidUidLength {
                expected: ENCODED_LEN,
                actual: 3
            }
        );
        assert!(matches!(
            KsuidMs::from_base62("").unwrap_err(),
            IdError::InvalidUidLength { actual: 0, .. }
        ));
    }

    #[test]
    fn test_datetime_roundtrip_at_fraction_boundary() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::milliseconds(500);
        let ksuid = KsuidMs::from_datetime(at).unwrap();
        assert_eq!(ksuid.fraction(), 128);
        assert_eq!(ksuid.datetime(), at);
        assert_eq!(ksuid.timestamp(), 1_704_067_200.5);
    }

    #[test]
    fn test_datetime_truncates_to_fraction() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::milliseconds(5);
        let ksuid = KsuidMs::from_datetime(at).unwrap();
        assert_eq!(ksuid.fraction(), 1);
        assert!(ksuid.datetime() <= at);
        assert!(at - ksuid.datetime() < chrono::Duration::milliseconds(4));
    }

    #[test]
    fn test_rejects_instant_before_epoch() {
        let at = Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            KsuidMs::from_datetime(at).unwrap_err(),
            IdError::TimestampOutOfRange { .. }
        ));
    }

    #[test]
    fn test_new_is_current() {
        let before = Utc::now() - chrono::Duration::seconds(1);
        let ksuid = KsuidMs::new();
        let after = Utc::now();
        assert!(ksuid.datetime() >= before);
        assert!(ksuid.datetime() <= after);
    }

    #[test]
    fn test_timestamp_dominates_payload() {
        let early = KsuidMs::from_parts(10, 0, [0xff; PAYLOAD_LEN]);
        let late = KsuidMs::from_parts(10, 1, [0x00; PAYLOAD_LEN]);
        assert!(early < late);
        assert!(early.to_base62() < late.to_base62());
    }

    proptest! {
        #[test]
        fn prop_base62_roundtrip(bytes in any::<[u8; BYTE_LEN]>()) {
            let ksuid = KsuidMs::from_bytes(bytes);
            let encoded = ksuid.to_base62();
            prop_assert_eq!(encoded.len(), ENCODED_LEN);
            prop_assert_eq!(KsuidMs::from_base62(&encoded).unwrap(), ksuid);
        }

        #[test]
        fn prop_text_order_matches_byte_order(
            a in any::<[u8; BYTE_LEN]>(),
            b in any::<[u8; BYTE_LEN]>(),
        ) {
            let (a, b) = (KsuidMs::from_bytes(a), KsuidMs::from_bytes(b));
            prop_assert_eq!(a.cmp(&b), a.to_base62().cmp(&b.to_base62()));
        }
    }
}
