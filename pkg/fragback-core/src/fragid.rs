/*
 * fragback: deterministic M-of-N fragmentation of wallet secrets
 * Copyright (C) 2024-2026 The fragback Authors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

//! Fragment identity lines.
//!
//! Each distributed fragment is labelled with a [`FragId`] naming the wallet
//! it belongs to, the threshold of the split, and the fragment's 1-based
//! position. The human-facing form is a short base58 tag shared by every
//! fragment of the same set, so a user can tell at a glance whether two
//! printed fragments belong together.

use crate::{
    crypto::hash256,
    shamir,
    wire::{FromWire, ToWire, WireError},
};

use serde::{Deserialize, Serialize};

// Bit 7 of the first wire byte marks a split of an encrypted (still
// passphrase-protected) secret rather than a plaintext one.
const SECURE_FLAG: u8 = 0x80;

/// Identity of a single fragment of a split.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FragId {
    needed: u8,
    secure: bool,
    index: u8,
    wallet_id: Vec<u8>,
}

impl FragId {
    /// Label fragment number `index` (0-based) of an M-of-N split of the
    /// wallet identified by `wallet_id`. `secure` records whether the split
    /// secret was still encrypted.
    pub fn new(
        needed: usize,
        index: usize,
        wallet_id: Vec<u8>,
        secure: bool,
    ) -> Result<Self, shamir::Error> {
        if !(shamir::MIN_THRESHOLD..=shamir::MAX_THRESHOLD).contains(&needed) {
            return Err(shamir::Error::InvalidThreshold(needed));
        }
        // The wire form stores index+1 in one byte.
        if index >= u8::MAX as usize {
            return Err(shamir::Error::InvalidThreshold(index));
        }
        Ok(Self {
            needed: needed as u8,
            secure,
            index: index as u8,
            wallet_id,
        })
    }

    /// Threshold of the split this fragment belongs to.
    pub fn needed(&self) -> usize {
        self.needed.into()
    }

    /// Whether the split secret was still encrypted.
    pub fn secure(&self) -> bool {
        self.secure
    }

    /// 0-based fragment index.
    pub fn index(&self) -> usize {
        self.index.into()
    }

    pub fn wallet_id(&self) -> &[u8] {
        &self.wallet_id
    }

    /// The label printed on the fragment itself, such as `3eFJKuz-#2`: the
    /// set-wide base58 tag followed by the fragment's 1-based position.
    pub fn display_id(&self) -> String {
        format!(
            "{}-#{}",
            fragid_base58(self.needed, &self.wallet_id),
            self.index + 1
        )
    }
}

/// The set-wide identity tag shared by every fragment of one split: the
/// threshold in decimal, then base58 of the first four bytes of
/// `hash256(wallet_id ∥ be32(needed))`.
///
/// Binding the threshold into the hash means the same wallet split 2-of-3
/// and 3-of-5 produces visibly different tags.
pub fn fragid_base58(needed: u8, wallet_id: &[u8]) -> String {
    let mut preimage = wallet_id.to_vec();
    preimage.extend_from_slice(&u32::from(needed).to_be_bytes());
    let digest = hash256(&preimage);
    format!(
        "{}{}",
        needed,
        bs58::encode(&digest[..4])
            .with_alphabet(bs58::Alphabet::BITCOIN)
            .into_string()
    )
}

impl ToWire for FragId {
    fn to_wire(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(2 + self.wallet_id.len());
        bytes.push(self.needed | if self.secure { SECURE_FLAG } else { 0 });
        bytes.push(self.index + 1);
        bytes.extend_from_slice(&self.wallet_id);
        bytes
    }
}

impl FromWire for FragId {
    fn from_wire_partial(input: &[u8]) -> Result<(&[u8], Self), WireError> {
        if input.len() < 2 {
            return Err(WireError::Truncated {
                needed: 2,
                got: input.len(),
            });
        }
        let needed = input[0] & !SECURE_FLAG;
        if !(shamir::MIN_THRESHOLD..=shamir::MAX_THRESHOLD).contains(&usize::from(needed)) {
            return Err(WireError::Malformed("threshold byte out of range"));
        }
        if input[1] == 0 {
            return Err(WireError::Malformed("fragment index byte must be 1-based"));
        }
        let id = Self {
            needed,
            secure: input[0] & SECURE_FLAG != 0,
            index: input[1] - 1,
            wallet_id: input[2..].to_vec(),
        };
        // The wallet id runs to the end of the line.
        Ok((&[], id))
    }
}
