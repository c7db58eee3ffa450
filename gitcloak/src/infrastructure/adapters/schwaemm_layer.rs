// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Schwaemm256-256 Layer (layer 3)
//!
//! Sponge AEAD over the Sparkle-512 permutation: 32-byte key, 32-byte
//! nonce, 32-byte tag, 256-bit rate and 256-bit capacity. No vetted
//! crates.io implementation of Schwaemm exists, so the mode lives here,
//! directly over [`sparkle`](super::sparkle).
//!
//! ## Mode
//!
//! - **Init**: rate ← nonce, capacity ← key, big permutation.
//! - **Absorb / encrypt**: per 32-byte block, the Feistel combiner ρ₁
//!   folds the block into the rate together with the capacity-derived rate
//!   whitening, followed by a slim permutation; the final block of each
//!   phase XORs a domain-separation constant into the last capacity word
//!   and uses a big permutation. Partial blocks take `0x80` padding.
//! - **Finalize**: tag = capacity ⊕ key.
//!
//! Tag verification is constant-time (`subtle`); plaintext is released
//! only after the tag verifies.

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use gitcloak_domain::{CloakError, LayerCipher};

use super::sparkle::{sparkle512, STATE_WORDS, STEPS_BIG, STEPS_SLIM};

const KEY_BYTES: usize = 32;
const NONCE_BYTES: usize = 32;
const TAG_BYTES: usize = 32;

const RATE_WORDS: usize = 8;
const RATE_BYTES: usize = 32;
const CAP_BRANS: usize = 4;

// Domain-separation constants, XORed into the last capacity word before
// the final permutation of a phase. A* close the associated-data phase,
// M* the message phase; the low bit distinguishes padded from full final
// blocks.
const CONST_A0: u32 = ((1 << CAP_BRANS) as u32) << 24;
const CONST_A1: u32 = (1 ^ (1 << CAP_BRANS) as u32) << 24;
const CONST_M2: u32 = (2 ^ (1 << CAP_BRANS) as u32) << 24;
const CONST_M3: u32 = (3 ^ (1 << CAP_BRANS) as u32) << 24;

/// Schwaemm256-256 implementation of the layer cipher capability.
pub struct SchwaemmLayer;

fn words_from_bytes(bytes: &[u8; 32]) -> [u32; 8] {
    let mut words = [0u32; 8];
    for (i, chunk) in bytes.chunks_exact(4).enumerate() {
        words[i] = u32::from_le_bytes(chunk.try_into().unwrap());
    }
    words
}

fn rate_to_bytes(state: &[u32; STATE_WORDS]) -> [u8; RATE_BYTES] {
    let mut bytes = [0u8; RATE_BYTES];
    for i in 0..RATE_WORDS {
        bytes[4 * i..4 * i + 4].copy_from_slice(&state[i].to_le_bytes());
    }
    bytes
}

/// Pads a (possibly partial) block to a full rate block. Returns the
/// padded words and whether padding was applied.
fn pad_block(block: &[u8]) -> ([u32; RATE_WORDS], bool) {
    debug_assert!(block.len() <= RATE_BYTES);
    let mut bytes = [0u8; RATE_BYTES];
    bytes[..block.len()].copy_from_slice(block);
    let partial = block.len() < RATE_BYTES;
    if partial {
        bytes[block.len()] = 0x80;
    }
    (words_from_bytes(&bytes), partial)
}

/// ρ₁ with rate whitening: Feistel-combines `block` into the rate and
/// folds the capacity into it. Shared by absorption, encryption, and
/// decryption (which feeds the recovered plaintext back in).
fn combine_block(state: &mut [u32; STATE_WORDS], block: &[u32; RATE_WORDS]) {
    let half = RATE_WORDS / 2;
    for i in 0..half {
        let j = i + half;
        let tmp = state[i];
        state[i] = state[j] ^ block[i] ^ state[RATE_WORDS + i];
        state[j] ^= tmp ^ block[j] ^ state[RATE_WORDS + j];
    }
}

/// Runs init and associated-data absorption, returning the ready state.
fn absorb_phase(key_words: &[u32; 8], nonce_words: &[u32; 8], aad: &[u8]) -> [u32; STATE_WORDS] {
    let mut state = [0u32; STATE_WORDS];
    state[..RATE_WORDS].copy_from_slice(nonce_words);
    state[RATE_WORDS..].copy_from_slice(key_words);
    sparkle512(&mut state, STEPS_BIG);

    if !aad.is_empty() {
        let mut blocks = aad.chunks(RATE_BYTES).peekable();
        while let Some(block) = blocks.next() {
            if blocks.peek().is_some() {
                let (words, _) = pad_block(block);
                combine_block(&mut state, &words);
                sparkle512(&mut state, STEPS_SLIM);
            } else {
                let (words, partial) = pad_block(block);
                state[STATE_WORDS - 1] ^= if partial { CONST_A0 } else { CONST_A1 };
                combine_block(&mut state, &words);
                sparkle512(&mut state, STEPS_BIG);
            }
        }
    }

    state
}

/// Extracts the tag: capacity ⊕ key.
fn finalize_tag(state: &[u32; STATE_WORDS], key_words: &[u32; 8]) -> [u8; TAG_BYTES] {
    let mut tag = [0u8; TAG_BYTES];
    for i in 0..8 {
        let word = state[RATE_WORDS + i] ^ key_words[i];
        tag[4 * i..4 * i + 4].copy_from_slice(&word.to_le_bytes());
    }
    tag
}

impl LayerCipher for SchwaemmLayer {
    fn algorithm(&self) -> &'static str {
        "Schwaemm256-256"
    }

    fn key_size(&self) -> usize {
        KEY_BYTES
    }

    fn nonce_size(&self) -> usize {
        NONCE_BYTES
    }

    fn tag_size(&self) -> usize {
        TAG_BYTES
    }

    fn encrypt(
        &self,
        key: &[u8],
        nonce: &[u8],
        plaintext: &[u8],
        aad: &[u8],
    ) -> Result<(Vec<u8>, Vec<u8>), CloakError> {
        self.check_input_sizes(key, nonce)?;
        let key_fixed: [u8; 32] = key
            .try_into()
            .map_err(|_| CloakError::invalid_parameters("Schwaemm256-256 key conversion"))?;
        let nonce_fixed: [u8; 32] = nonce
            .try_into()
            .map_err(|_| CloakError::invalid_parameters("Schwaemm256-256 nonce conversion"))?;
        let mut key_words = words_from_bytes(&key_fixed);
        let nonce_words = words_from_bytes(&nonce_fixed);

        let mut state = absorb_phase(&key_words, &nonce_words, aad);
        let mut ciphertext = Vec::with_capacity(plaintext.len());

        if !plaintext.is_empty() {
            let mut blocks = plaintext.chunks(RATE_BYTES).peekable();
            while let Some(block) = blocks.next() {
                let keystream = rate_to_bytes(&state);
                for (byte, ks) in block.iter().zip(keystream.iter()) {
                    ciphertext.push(byte ^ ks);
                }

                let last = blocks.peek().is_none();
                let (words, partial) = pad_block(block);
                if last {
                    state[STATE_WORDS - 1] ^= if partial { CONST_M2 } else { CONST_M3 };
                }
                combine_block(&mut state, &words);
                sparkle512(&mut state, if last { STEPS_BIG } else { STEPS_SLIM });
            }
        }

        let tag = finalize_tag(&state, &key_words);
        state.zeroize();
        key_words.zeroize();
        Ok((ciphertext, tag.to_vec()))
    }

    fn decrypt(
        &self,
        key: &[u8],
        nonce: &[u8],
        ciphertext: &[u8],
        tag: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, CloakError> {
        self.check_input_sizes(key, nonce)?;
        self.check_tag_size(tag)?;
        let key_fixed: [u8; 32] = key
            .try_into()
            .map_err(|_| CloakError::invalid_parameters("Schwaemm256-256 key conversion"))?;
        let nonce_fixed: [u8; 32] = nonce
            .try_into()
            .map_err(|_| CloakError::invalid_parameters("Schwaemm256-256 nonce conversion"))?;
        let mut key_words = words_from_bytes(&key_fixed);
        let nonce_words = words_from_bytes(&nonce_fixed);

        let mut state = absorb_phase(&key_words, &nonce_words, aad);
        let mut plaintext = Vec::with_capacity(ciphertext.len());

        if !ciphertext.is_empty() {
            let mut blocks = ciphertext.chunks(RATE_BYTES).peekable();
            while let Some(block) = blocks.next() {
                let keystream = rate_to_bytes(&state);
                let start = plaintext.len();
                for (byte, ks) in block.iter().zip(keystream.iter()) {
                    plaintext.push(byte ^ ks);
                }

                // The state update feeds the recovered plaintext back in,
                // mirroring the encrypt side exactly.
                let last = blocks.peek().is_none();
                let (words, partial) = pad_block(&plaintext[start..]);
                if last {
                    state[STATE_WORDS - 1] ^= if partial { CONST_M2 } else { CONST_M3 };
                }
                combine_block(&mut state, &words);
                sparkle512(&mut state, if last { STEPS_BIG } else { STEPS_SLIM });
            }
        }

        let expected = finalize_tag(&state, &key_words);
        state.zeroize();
        key_words.zeroize();
        if expected.as_slice().ct_eq(tag).unwrap_u8() != 1 {
            return Err(CloakError::authentication_failed(
                "Schwaemm256-256 tag mismatch",
            ));
        }

        Ok(plaintext)
    }
}
