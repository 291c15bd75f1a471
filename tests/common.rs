//! tests/common.rs
//! Shared key material and reference encryptors for the integration tests.
//!
//! The crate itself is decrypt-only, so the encryption side of every
//! round-trip lives here: PKCS#7 + AES block encryption in ECB and CBC,
//! and raw / PKCS#1 v1.5 RSA key wrapping matched to the unwrap
//! conventions.

use std::sync::OnceLock;

use aes::cipher::{BlockEncrypt, KeyInit};
use aes::{Aes128Enc, Aes256Enc, Block};
use cipher::block_padding::{Padding, Pkcs7};
use rsa::pkcs8::EncodePrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};

/// Known 16-byte key used in the fixed scenarios.  Its leading byte is
/// below 0x80, so the raw-wrapped integer always stays under the modulus.
#[allow(dead_code)]
pub const TEST_KEY_16: [u8; 16] = *b"0123456789abcdef";

/// Known 32-byte key for the AES-256 scenarios.
#[allow(dead_code)]
pub const TEST_KEY_32: [u8; 32] = *b"0123456789abcdef0123456789abcdef";

/// One RSA-2048 key pair per test binary; generation is slow.
#[allow(dead_code)]
pub fn rsa_test_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| {
        let mut rng = rand::thread_rng();
        RsaPrivateKey::new(&mut rng, 2048).expect("RSA test key generation")
    })
}

/// The test key pair as a PKCS#8 DER blob.
#[allow(dead_code)]
pub fn rsa_test_key_der() -> Vec<u8> {
    rsa_test_key()
        .to_pkcs8_der()
        .expect("PKCS#8 encoding")
        .as_bytes()
        .to_vec()
}

/// Wrap a symmetric key with textbook RSA, key in the leading bytes of
/// the modulus-sized block (the convention the raw unwrap expects).
#[allow(dead_code)]
pub fn wrap_key_raw(private_key: &RsaPrivateKey, symmetric_key: &[u8]) -> Vec<u8> {
    let public = RsaPublicKey::from(private_key);
    let modulus_len = public.size();

    let mut padded = vec![0u8; modulus_len];
    padded[..symmetric_key.len()].copy_from_slice(symmetric_key);
    let m = BigUint::from_bytes_be(&padded);
    assert!(&m < public.n(), "test key must encode below the modulus");

    let c = m.modpow(public.e(), public.n());
    left_pad(&c.to_bytes_be(), modulus_len)
}

/// Wrap a symmetric key with PKCS#1 v1.5 encryption padding.
#[allow(dead_code)]
pub fn wrap_key_pkcs1v15(private_key: &RsaPrivateKey, symmetric_key: &[u8]) -> Vec<u8> {
    let public = RsaPublicKey::from(private_key);
    public
        .encrypt(&mut rand::thread_rng(), Pkcs1v15Encrypt, symmetric_key)
        .expect("PKCS#1 v1.5 wrap")
}

fn left_pad(digits: &[u8], len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len - digits.len()];
    out.extend_from_slice(digits);
    out
}

/// Encrypt-only AES context for the reference encryptors.
enum Enc {
    Aes128(Aes128Enc),
    Aes256(Aes256Enc),
}

impl Enc {
    fn new(key: &[u8]) -> Self {
        match key.len() {
            16 => Self::Aes128(Aes128Enc::new_from_slice(key).expect("AES-128 key")),
            32 => Self::Aes256(Aes256Enc::new_from_slice(key).expect("AES-256 key")),
            n => panic!("unsupported test key length: {n}"),
        }
    }

    fn encrypt_block(&self, block: &mut Block) {
        match self {
            Self::Aes128(c) => c.encrypt_block(block),
            Self::Aes256(c) => c.encrypt_block(block),
        }
    }
}

/// AES-ECB with PKCS#7 padding — the legacy archive format.
#[allow(dead_code)]
pub fn encrypt_ecb(key: &[u8], plaintext: &[u8]) -> Vec<u8> {
    let enc = Enc::new(key);
    let mut out = Vec::with_capacity(plaintext.len() + 16);

    let mut chunks = plaintext.chunks_exact(16);
    for chunk in &mut chunks {
        let mut block = Block::clone_from_slice(chunk);
        enc.encrypt_block(&mut block);
        out.extend_from_slice(&block);
    }

    let rem = chunks.remainder();
    let mut block = Block::default();
    block[..rem.len()].copy_from_slice(rem);
    Pkcs7::pad(&mut block, rem.len());
    enc.encrypt_block(&mut block);
    out.extend_from_slice(&block);
    out
}

/// AES-CBC with PKCS#7 padding, IV prepended to the ciphertext.
#[allow(dead_code)]
pub fn encrypt_cbc(key: &[u8], iv: &[u8; 16], plaintext: &[u8]) -> Vec<u8> {
    let enc = Enc::new(key);
    let mut out = Vec::with_capacity(plaintext.len() + 32);
    out.extend_from_slice(iv);
    let mut prev = *iv;

    let mut chunks = plaintext.chunks_exact(16);
    for chunk in &mut chunks {
        let mut block = Block::clone_from_slice(chunk);
        cbc_step(&enc, &mut block, &mut prev);
        out.extend_from_slice(&block);
    }

    let rem = chunks.remainder();
    let mut block = Block::default();
    block[..rem.len()].copy_from_slice(rem);
    Pkcs7::pad(&mut block, rem.len());
    cbc_step(&enc, &mut block, &mut prev);
    out.extend_from_slice(&block);
    out
}

fn cbc_step(enc: &Enc, block: &mut Block, prev: &mut [u8; 16]) {
    for (b, p) in block.iter_mut().zip(prev.iter()) {
        *b ^= p;
    }
    enc.encrypt_block(block);
    prev.copy_from_slice(block);
}
