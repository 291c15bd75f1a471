//! Chunked streaming decryption of bulk payloads.
//!
//! The input is read in fixed-size chunks and decrypted block by block,
//! so memory use is bounded by one chunk (plus one block of lookahead)
//! regardless of payload size.  A fresh cipher context is built per call
//! from the shared symmetric key — cipher state is never shared between
//! concurrent decryptions.

use std::io::{Read, Write};

use aes::cipher::{BlockDecrypt, KeyInit};
use aes::{Aes128Dec, Aes192Dec, Aes256Dec, Block};
use cipher::block_padding::{Padding, Pkcs7};

use crate::config::{CipherMode, Settings};
use crate::crypto::keys::SymmetricKey;
use crate::errors::{Result, UnsealError};

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

/// Decrypt-only AES context, sized by the key length.
enum AesDec {
    Aes128(Aes128Dec),
    Aes192(Aes192Dec),
    Aes256(Aes256Dec),
}

impl AesDec {
    fn new(key: &SymmetricKey) -> Result<Self> {
        let bytes = key.as_bytes();
        match bytes.len() {
            16 => Aes128Dec::new_from_slice(bytes).map(Self::Aes128),
            24 => Aes192Dec::new_from_slice(bytes).map(Self::Aes192),
            32 => Aes256Dec::new_from_slice(bytes).map(Self::Aes256),
            n => {
                return Err(UnsealError::Decryption(format!(
                    "unsupported AES key length: {n} bytes"
                )))
            }
        }
        .map_err(|e| UnsealError::Decryption(format!("cipher init failed: {e}")))
    }

    fn decrypt_block(&self, block: &mut Block) {
        match self {
            Self::Aes128(c) => c.decrypt_block(block),
            Self::Aes192(c) => c.decrypt_block(block),
            Self::Aes256(c) => c.decrypt_block(block),
        }
    }
}

/// Decrypt one opaque byte stream into another.
///
/// Reads `input` in `settings.chunk_size` chunks, decrypts with AES in the
/// configured mode (PKCS#7 padding) and writes plaintext to `output` in
/// order.  Returns the number of plaintext bytes written.
///
/// In CBC mode the 16-byte IV is expected at the head of the stream.
///
/// Fails with [`UnsealError::Decryption`] when the ciphertext is empty,
/// not a multiple of the block size, or the final block's padding is
/// rejected (a strong signal of a wrong key or corrupted ciphertext), and
/// with [`UnsealError::Io`] when the source or sink fails.  On failure a
/// prefix of the plaintext may already have been written; callers that
/// materialize files should discard the partial output (see
/// [`crate::batch::decrypt_file`]).
pub fn decrypt_stream<R: Read, W: Write>(
    key: &SymmetricKey,
    input: &mut R,
    output: &mut W,
    settings: &Settings,
) -> Result<u64> {
    settings.validate()?;
    let cipher = AesDec::new(key)?;

    // CBC keeps the previous ciphertext block for chaining, seeded by the IV.
    let mut prev = [0u8; BLOCK_LEN];
    if settings.cipher_mode == CipherMode::Cbc {
        read_iv(input, &mut prev)?;
    }

    let mut chunk = vec![0u8; settings.chunk_size];
    // Undecrypted carry-over; holds at most chunk_size + one block.
    let mut pending: Vec<u8> = Vec::with_capacity(settings.chunk_size + BLOCK_LEN);
    let mut written: u64 = 0;

    loop {
        let n = input.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        pending.extend_from_slice(&chunk[..n]);

        // Decrypt every complete block except the last one in the buffer:
        // it may turn out to be the final (padded) block of the stream.
        let complete = pending.len() / BLOCK_LEN;
        let emit = if pending.len() % BLOCK_LEN == 0 {
            complete.saturating_sub(1)
        } else {
            complete
        };

        for i in 0..emit {
            let start = i * BLOCK_LEN;
            written += decrypt_one(
                &cipher,
                settings.cipher_mode,
                &pending[start..start + BLOCK_LEN],
                &mut prev,
                output,
                false,
            )?;
        }
        pending.drain(..emit * BLOCK_LEN);
    }

    if pending.is_empty() {
        return Err(UnsealError::Decryption(
            "ciphertext is empty — a padded stream holds at least one block".to_string(),
        ));
    }
    if pending.len() != BLOCK_LEN {
        return Err(UnsealError::Decryption(format!(
            "ciphertext length is not a multiple of the {BLOCK_LEN}-byte block size"
        )));
    }

    written += decrypt_one(
        &cipher,
        settings.cipher_mode,
        &pending,
        &mut prev,
        output,
        true,
    )?;
    output.flush()?;
    Ok(written)
}

/// Decrypt a single ciphertext block and write its plaintext.
///
/// `last` selects PKCS#7 unpadding for the final block of the stream.
fn decrypt_one<W: Write>(
    cipher: &AesDec,
    mode: CipherMode,
    ciphertext: &[u8],
    prev: &mut [u8; BLOCK_LEN],
    output: &mut W,
    last: bool,
) -> Result<u64> {
    let mut block = Block::clone_from_slice(ciphertext);
    cipher.decrypt_block(&mut block);

    if mode == CipherMode::Cbc {
        for (b, p) in block.iter_mut().zip(prev.iter()) {
            *b ^= p;
        }
        prev.copy_from_slice(ciphertext);
    }

    let plaintext: &[u8] = if last {
        Pkcs7::unpad(&block).map_err(|_| {
            UnsealError::Decryption(
                "bad PKCS#7 padding on final block — wrong key or corrupted ciphertext"
                    .to_string(),
            )
        })?
    } else {
        &block
    };

    output.write_all(plaintext)?;
    Ok(plaintext.len() as u64)
}

/// Read the 16-byte IV off the head of a CBC stream.
fn read_iv<R: Read>(input: &mut R, iv: &mut [u8; BLOCK_LEN]) -> Result<()> {
    input.read_exact(iv).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            UnsealError::Decryption("ciphertext too short to hold a CBC IV".to_string())
        } else {
            UnsealError::Io(e)
        }
    })
}
