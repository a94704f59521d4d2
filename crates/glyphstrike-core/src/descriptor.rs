//! Byte-exact strike keys
//!
//! A descriptor is a little-endian byte string:
//!
//! ```text
//! [total length: u32][entry count: u32]
//! [tag: u32][length: u32][payload ...]   (repeated, sorted by tag)
//! ```
//!
//! Entries are always written in tag order, so the bytes depend only on
//! what went in, never on the order it was added. Equality is plain byte
//! equality; the hash is computed once at build time.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

const HEADER_LEN: usize = 8;
const ENTRY_HEADER_LEN: usize = 8;

/// Kinds of descriptor entries, numbered in their on-wire order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u32)]
pub enum EntryTag {
    /// The scaler record (sizes, matrix, mask format, flags, gamma)
    ScalerRec = u32::from_be_bytes([b's', b'r', b'e', b'c']),
    /// Typeface identity (variable length)
    Typeface = u32::from_be_bytes([b't', b'p', b'f', b'c']),
    /// Path effect kind and parameters
    PathEffect = u32::from_be_bytes([b'p', b't', b'h', b'e']),
    /// Mask filter kind and parameters
    MaskFilter = u32::from_be_bytes([b'm', b's', b'k', b'f']),
}

impl EntryTag {
    fn from_raw(raw: u32) -> Option<Self> {
        [
            EntryTag::ScalerRec,
            EntryTag::Typeface,
            EntryTag::PathEffect,
            EntryTag::MaskFilter,
        ]
        .into_iter()
        .find(|tag| *tag as u32 == raw)
    }
}

/// Opaque, immutable, hashable strike key
#[derive(Clone)]
pub struct Descriptor {
    bytes: Arc<[u8]>,
    hash: u64,
}

impl Descriptor {
    /// Start collecting entries
    pub fn builder() -> DescriptorBuilder {
        DescriptorBuilder::default()
    }

    /// The full encoding, header included
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Encoded size in bytes, header included (never below 8)
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a header-only descriptor
    pub fn has_no_entries(&self) -> bool {
        self.entry_count() == 0
    }

    /// Precomputed hash of the encoding
    pub fn hash_code(&self) -> u64 {
        self.hash
    }

    pub fn entry_count(&self) -> u32 {
        read_u32(&self.bytes, 4).unwrap_or(0)
    }

    /// Payload of the entry with this tag, if present
    pub fn entry(&self, tag: EntryTag) -> Option<&[u8]> {
        self.entries()
            .find(|(t, _)| *t == tag as u32)
            .map(|(_, payload)| payload)
    }

    /// `(raw tag, payload)` pairs in encoded order
    pub fn entries(&self) -> Entries<'_> {
        Entries {
            bytes: &self.bytes,
            offset: HEADER_LEN,
        }
    }
}

impl PartialEq for Descriptor {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.bytes == other.bytes
    }
}

impl Eq for Descriptor {}

impl Hash for Descriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<_> = self
            .entries()
            .map(|(raw, _)| match EntryTag::from_raw(raw) {
                Some(tag) => format!("{tag:?}"),
                None => format!("{raw:#010x}"),
            })
            .collect();
        f.debug_struct("Descriptor")
            .field("len", &self.byte_len())
            .field("hash", &format_args!("{:#018x}", self.hash))
            .field("entries", &tags)
            .finish()
    }
}

/// Iterator over descriptor entries
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (u32, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let tag = read_u32(self.bytes, self.offset)?;
        let len = read_u32(self.bytes, self.offset + 4)? as usize;
        let start = self.offset + ENTRY_HEADER_LEN;
        let payload = self.bytes.get(start..start + len)?;
        self.offset = start + len;
        Some((tag, payload))
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let raw = bytes.get(offset..offset + 4)?;
    let mut buf = [0u8; 4];
    buf.copy_from_slice(raw);
    Some(u32::from_le_bytes(buf))
}

/// Collects entries and freezes them into a [`Descriptor`]
#[derive(Debug, Default)]
pub struct DescriptorBuilder {
    entries: BTreeMap<EntryTag, Vec<u8>>,
}

impl DescriptorBuilder {
    /// Add (or replace) the entry for `tag`
    pub fn entry(mut self, tag: EntryTag, payload: Vec<u8>) -> Self {
        self.entries.insert(tag, payload);
        self
    }

    pub fn build(self) -> Descriptor {
        let body_len: usize = self
            .entries
            .values()
            .map(|payload| ENTRY_HEADER_LEN + payload.len())
            .sum();
        let total_len = HEADER_LEN + body_len;

        let mut bytes = Vec::with_capacity(total_len);
        bytes.extend_from_slice(&(total_len as u32).to_le_bytes());
        bytes.extend_from_slice(&(self.entries.len() as u32).to_le_bytes());
        for (tag, payload) in &self.entries {
            bytes.extend_from_slice(&(*tag as u32).to_le_bytes());
            bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            bytes.extend_from_slice(payload);
        }

        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);

        Descriptor {
            bytes: bytes.into(),
            hash: hasher.finish(),
        }
    }
}

/// Little-endian payload writer with float normalization
#[derive(Debug, Default)]
pub struct PayloadWriter {
    buf: Vec<u8>,
}

impl PayloadWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    pub fn u16(&mut self, value: u16) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn u32(&mut self, value: u32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn u64(&mut self, value: u64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Writes [`canonical_f32`] of `value`
    pub fn f32(&mut self, value: f32) -> &mut Self {
        self.u32(canonical_f32(value).to_bits())
    }

    /// Length-prefixed bytes
    pub fn bytes(&mut self, value: &[u8]) -> &mut Self {
        self.u32(value.len() as u32);
        self.buf.extend_from_slice(value);
        self
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// One bit pattern per value: `-0.0` becomes `0.0`, non-finite becomes `0.0`
pub fn canonical_f32(value: f32) -> f32 {
    if value == 0.0 || !value.is_finite() {
        0.0
    } else {
        value
    }
}
