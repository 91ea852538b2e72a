//! Supporting primitives: byte counting, base64, digests and random ids.
//!
//! The encoders are capabilities rather than free functions so that callers
//! can hand in whatever implementation they need. [`Standard`] is backed by
//! the usual RustCrypto and base64 crates.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use sha1::{Digest, Sha1};
use sha2::Sha256;
use uuid::Uuid;

/// Bytes needed for one code point in the legacy 1–6 byte scheme, `None`
/// at and above 2^31.
pub fn code_point_len(code_point: u32) -> Option<usize> {
    match code_point {
        c if c < 1 << 7 => Some(1),
        c if c < 1 << 11 => Some(2),
        c if c < 1 << 16 => Some(3),
        c if c < 1 << 21 => Some(4),
        c if c < 1 << 26 => Some(5),
        c if c < 1 << 31 => Some(6),
        _ => None,
    }
}

/// Byte length of a sequence of raw code points, `None` if any is out of range.
pub fn byte_len_of<I>(code_points: I) -> Option<usize>
where
    I: IntoIterator<Item = u32>,
{
    code_points.into_iter().map(code_point_len).sum()
}

/// Byte length of `text`. Every `char` is below 2^21 so this never exceeds
/// four bytes per character.
pub fn byte_len(text: &str) -> usize {
    text.chars().filter_map(|c| code_point_len(c.into())).sum()
}

// ------------- Capabilities -------------
pub trait Encoder {
    fn encode(&self, text: &str) -> String;
}

pub trait Digester {
    /// 40 lower-case hex digits.
    fn sha1(&self, text: &str) -> String;
    /// 64 lower-case hex digits.
    fn sha256(&self, text: &str) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Standard;

impl Encoder for Standard {
    // Each UTF-16 unit contributes its low byte, as the Latin-1 shims did.
    fn encode(&self, text: &str) -> String {
        let latin1: Vec<u8> = text.encode_utf16().map(|unit| (unit & 0xff) as u8).collect();
        STANDARD.encode(latin1)
    }
}

impl Digester for Standard {
    fn sha1(&self, text: &str) -> String {
        hex::encode(Sha1::digest(text.as_bytes()))
    }
    fn sha256(&self, text: &str) -> String {
        hex::encode(Sha256::digest(text.as_bytes()))
    }
}

/// The `mbox_sha1sum` of a mailbox IRI such as `mailto:a@b.com`.
pub fn mbox_sha1sum<D: Digester + ?Sized>(digester: &D, mbox: &str) -> String {
    digester.sha1(mbox)
}

/// A random version 4 UUID, `xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx`.
pub fn random_uuid() -> String {
    Uuid::new_v4().hyphenated().to_string()
}
