// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Cipher Layer Adapters
//!
//! This module is part of the Infrastructure layer, providing concrete
//! implementations of the domain's [`LayerCipher`] capability: one adapter
//! per algorithm, in wire order:
//!
//! 1. [`AesGcmLayer`] - AES-256-GCM (`aes-gcm`)
//! 2. [`AegisLayer`] - AEGIS-256 (`aegis`)
//! 3. [`SchwaemmLayer`] - Schwaemm256-256 (in-crate Sparkle-512 sponge)
//! 4. [`DeoxysLayer`] - Deoxys-II-256 (`deoxys`)
//! 5. [`AsconLayer`] - Ascon-128a (`ascon-aead`)
//! 6. [`ChaCha20Poly1305Layer`] - ChaCha20-Poly1305 (`chacha20poly1305`)
//!
//! All adapters use detached tags (the wire format stores tags separately
//! from the ciphertext body), validate input sizes before touching the
//! backing implementation, and report tag mismatches as
//! `authentication_failed` distinct from `invalid_parameters`.

mod aegis_layer;
mod aes_gcm_layer;
mod ascon_layer;
mod chacha20_layer;
mod deoxys_layer;
mod schwaemm_layer;
mod sparkle;

pub use aegis_layer::AegisLayer;
pub use aes_gcm_layer::AesGcmLayer;
pub use ascon_layer::AsconLayer;
pub use chacha20_layer::ChaCha20Poly1305Layer;
pub use deoxys_layer::DeoxysLayer;
pub use schwaemm_layer::SchwaemmLayer;

use gitcloak_domain::{CascadeCipher, CloakError, LayerCipher};

/// Assembles the standard six-layer cascade in wire order.
pub fn standard_cascade() -> Result<CascadeCipher, CloakError> {
    let layers: [Box<dyn LayerCipher>; 6] = [
        Box::new(AesGcmLayer),
        Box::new(AegisLayer),
        Box::new(SchwaemmLayer),
        Box::new(DeoxysLayer),
        Box::new(AsconLayer),
        Box::new(ChaCha20Poly1305Layer),
    ];
    CascadeCipher::new(layers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_cascade_matches_wire_profile() {
        // CascadeCipher::new re-validates every declared size, so assembly
        // succeeding is the assertion.
        standard_cascade().unwrap();
    }
}
