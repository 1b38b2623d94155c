//! Key management and payload signing.
//!
//! A layer-2 key is derived from a seed: the secp256k1 secret is the
//! keccak-256 of the seed bytes. Signing is ECDSA over keccak-256 of the
//! canonical payload and yields 65 bytes (r ‖ s ‖ v).
//!
//! The signer holds no session state, so a single `KeyManager` can be shared
//! across concurrent builders.

use std::path::PathBuf;

use alloy::primitives::{keccak256, Address, PrimitiveSignature, B256};
use alloy::signers::k256::elliptic_curve::sec1::ToEncodedPoint;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use rollup_core::SIGNATURE_LEN;
use thiserror::Error;
use zeroize::Zeroizing;

// =============================================================================
// KeySigner trait
// =============================================================================

/// Signing primitive consumed by the builders.
pub trait KeySigner: Send + Sync {
    /// Compressed SEC1 public key (33 bytes).
    fn public_key_bytes(&self) -> Vec<u8>;

    /// Sign `payload`; the signature covers keccak-256 of the bytes.
    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, SignerError>;
}

// =============================================================================
// KeySource and KeyManager
// =============================================================================

/// Source of the key seed.
#[derive(Debug, Clone)]
pub enum KeySource {
    /// Hex seed given inline (tests, local tooling).
    Seed { seed: String },
    /// Load from environment variable (development).
    EnvVar { var_name: String },
    /// Load from file (production, recommend 0600 permissions).
    File { path: PathBuf },
}

/// Owns one layer-2 signing key.
///
/// Never log key material.
pub struct KeyManager {
    signer: PrivateKeySigner,
    public_key: Vec<u8>,
}

impl KeyManager {
    /// Load the seed from `source` and derive the key.
    ///
    /// # Errors
    /// Returns `KeyError` if the environment variable is missing, the file
    /// cannot be read, the seed is not hex, or the derived key is invalid.
    pub fn load(source: KeySource) -> Result<Self, KeyError> {
        match source {
            KeySource::Seed { ref seed } => Self::from_seed(seed),
            KeySource::EnvVar { ref var_name } => {
                let seed = Zeroizing::new(
                    std::env::var(var_name)
                        .map_err(|_| KeyError::EnvVarNotFound(var_name.clone()))?,
                );
                Self::from_seed(&seed)
            }
            KeySource::File { ref path } => {
                let content = Zeroizing::new(std::fs::read_to_string(path)?);
                Self::from_seed(&content)
            }
        }
    }

    /// Derive a key from a hex seed (0x prefix and whitespace tolerated).
    pub fn from_seed(seed_hex: &str) -> Result<Self, KeyError> {
        let trimmed = seed_hex.trim().trim_start_matches("0x");
        let seed = Zeroizing::new(hex::decode(trimmed)?);
        Self::from_seed_bytes(&seed)
    }

    /// Derive a key from raw seed bytes.
    pub fn from_seed_bytes(seed: &[u8]) -> Result<Self, KeyError> {
        if seed.is_empty() {
            return Err(KeyError::InvalidKey("seed must not be empty".to_string()));
        }
        let secret = Zeroizing::new(keccak256(seed).0);
        let signer = PrivateKeySigner::from_slice(secret.as_slice())
            .map_err(|e| KeyError::InvalidKey(e.to_string()))?;
        let public_key = signer
            .credential()
            .verifying_key()
            .as_affine()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec();
        Ok(Self { signer, public_key })
    }

    /// L1-style address of the key.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Public key as `0x`-less lowercase hex, the form used for account lookup.
    pub fn public_key_hex(&self) -> String {
        hex::encode(&self.public_key)
    }

    /// Affine coordinates of the public key, as bound by a ChangePubKey.
    pub fn public_key_xy(&self) -> ([u8; 32], [u8; 32]) {
        let point = self
            .signer
            .credential()
            .verifying_key()
            .as_affine()
            .to_encoded_point(false);
        let bytes = point.as_bytes();
        let mut x = [0u8; 32];
        let mut y = [0u8; 32];
        // Uncompressed SEC1: 0x04 ‖ x ‖ y
        x.copy_from_slice(&bytes[1..33]);
        y.copy_from_slice(&bytes[33..65]);
        (x, y)
    }

    fn sign_digest(&self, digest: &B256) -> Result<PrimitiveSignature, SignerError> {
        Ok(self.signer.sign_hash_sync(digest)?)
    }
}

impl KeySigner for KeyManager {
    fn public_key_bytes(&self) -> Vec<u8> {
        self.public_key.clone()
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, SignerError> {
        // NOTE: Do not log the signature or digest
        let signature = self.sign_digest(&keccak256(payload))?;
        Ok(signature.as_bytes().to_vec())
    }
}

impl std::fmt::Debug for KeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyManager")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Recover the address that produced `signature` over `payload`.
pub fn recover_signer(payload: &[u8], signature: &[u8]) -> Result<Address, SignerError> {
    let sig = parse_signature(signature)?;
    sig.recover_address_from_prehash(&keccak256(payload))
        .map_err(|e| SignerError::MalformedSignature(e.to_string()))
}

/// Structural check: 65 bytes that decode as an ECDSA signature.
pub fn parse_signature(signature: &[u8]) -> Result<PrimitiveSignature, SignerError> {
    if signature.len() != SIGNATURE_LEN {
        return Err(SignerError::MalformedSignature(format!(
            "expected {SIGNATURE_LEN} bytes, got {}",
            signature.len()
        )));
    }
    PrimitiveSignature::from_raw(signature)
        .map_err(|e| SignerError::MalformedSignature(e.to_string()))
}

/// Key management errors.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Failed to decode hex: {0}")]
    HexDecode(#[from] hex::FromHexError),

    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Signing errors.
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("No signing key configured")]
    NoSigningKey,

    #[error("Signing failed: {0}")]
    SigningFailed(#[from] alloy::signers::Error),

    #[error("Malformed signature: {0}")]
    MalformedSignature(String),
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SEED: &str = "0x28e1a3762ff9944e9a4ad79477b756ef0aff3d2af76f0f40a0c3ec6ca76cf24b";

    #[test]
    fn test_from_seed_is_deterministic() {
        let a = KeyManager::from_seed(TEST_SEED).unwrap();
        let b = KeyManager::from_seed(&format!("  {}\n", TEST_SEED.trim_start_matches("0x")))
            .unwrap();
        assert_eq!(a.address(), b.address());
        assert_eq!(a.public_key_bytes(), b.public_key_bytes());
        assert_eq!(a.public_key_bytes().len(), 33);
    }

    #[test]
    fn test_invalid_seed() {
        assert!(matches!(
            KeyManager::from_seed("not hex"),
            Err(KeyError::HexDecode(_))
        ));
        assert!(matches!(
            KeyManager::from_seed(""),
            Err(KeyError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_load_from_missing_env_var() {
        let result = KeyManager::load(KeySource::EnvVar {
            var_name: "ROLLUP_TEST_SEED_THAT_DOES_NOT_EXIST".to_string(),
        });
        assert!(matches!(result, Err(KeyError::EnvVarNotFound(_))));
    }

    #[test]
    fn test_sign_is_deterministic_and_recoverable() {
        let key = KeyManager::from_seed(TEST_SEED).unwrap();
        let payload = b"canonical payload";

        let sig1 = key.sign(payload).unwrap();
        let sig2 = key.sign(payload).unwrap();
        assert_eq!(sig1.len(), 65);
        assert_eq!(sig1, sig2, "RFC 6979 signatures must be deterministic");

        assert_eq!(recover_signer(payload, &sig1).unwrap(), key.address());
        assert_ne!(recover_signer(b"other payload", &sig1).ok(), Some(key.address()));
    }

    #[test]
    fn test_public_key_xy_matches_compressed_form() {
        let key = KeyManager::from_seed(TEST_SEED).unwrap();
        let (x, y) = key.public_key_xy();
        let compressed = key.public_key_bytes();
        assert_eq!(&compressed[1..], &x);
        let parity = if y[31] & 1 == 1 { 0x03 } else { 0x02 };
        assert_eq!(compressed[0], parity);
    }

    #[test]
    fn test_parse_signature_rejects_short_input() {
        assert!(matches!(
            parse_signature(&[0u8; 64]),
            Err(SignerError::MalformedSignature(_))
        ));
    }

    #[test]
    fn test_debug_hides_key() {
        let key = KeyManager::from_seed(TEST_SEED).unwrap();
        let debug = format!("{key:?}");
        assert!(debug.contains("address"));
        assert!(!debug.contains(TEST_SEED.trim_start_matches("0x")));
    }
}
