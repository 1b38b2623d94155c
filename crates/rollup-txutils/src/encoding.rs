//! Canonical byte encoding.
//!
//! Field order and width are a compatibility contract with the remote
//! verifier, which rebuilds these bytes independently:
//! - integers (ids, timestamps, nonces, rates): 8 bytes, big-endian
//! - amounts: 32 bytes, big-endian unsigned
//! - strings: keccak-256 of the UTF-8 bytes
//! - L1 addresses: 20 bytes
//! - nested signatures: 2-byte length prefix + bytes

use alloy::primitives::{keccak256, Address};
use num_bigint::BigInt;
use rollup_core::to_be_bytes32;

use crate::error::{TxError, TxResult};

/// Append-only canonical encoder.
#[derive(Debug, Default)]
pub struct CanonicalEncoder {
    buf: Vec<u8>,
}

impl CanonicalEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    pub fn put_i64(&mut self, value: i64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn put_amount(&mut self, field: &str, value: &BigInt) -> TxResult<&mut Self> {
        let bytes = to_be_bytes32(value).ok_or_else(|| {
            TxError::Encoding(format!("{field} does not fit an unsigned 256-bit slot: {value}"))
        })?;
        self.buf.extend_from_slice(&bytes);
        Ok(self)
    }

    pub fn put_str_hash(&mut self, value: &str) -> &mut Self {
        self.buf.extend_from_slice(keccak256(value.as_bytes()).as_slice());
        self
    }

    pub fn put_bytes32(&mut self, value: &[u8; 32]) -> &mut Self {
        self.buf.extend_from_slice(value);
        self
    }

    pub fn put_address(&mut self, value: &Address) -> &mut Self {
        self.buf.extend_from_slice(value.as_slice());
        self
    }

    /// Length-prefixed raw bytes (nested signatures).
    pub fn put_signature(&mut self, sig: &[u8]) -> TxResult<&mut Self> {
        let len = u16::try_from(sig.len())
            .map_err(|_| TxError::Encoding(format!("signature too long: {} bytes", sig.len())))?;
        self.buf.extend_from_slice(&len.to_be_bytes());
        self.buf.extend_from_slice(sig);
        Ok(self)
    }

    /// Append bytes that were already canonically encoded.
    pub fn put_raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}
