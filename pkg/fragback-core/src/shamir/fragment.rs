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

use crate::wire::{ToWire, WireError};

use serde::{Deserialize, Serialize};

/// One evaluation point `(x, y)` of the secret-encoding polynomial, the unit
/// of distribution in the scheme.
///
/// Both halves are fixed-width big-endian byte strings as wide as the field
/// the secret was split in. Fragments are immutable once created; a set used
/// for reconstruction must have pairwise-distinct x values.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    x: Vec<u8>,
    y: Vec<u8>,
}

impl Fragment {
    pub(super) fn new(x: Vec<u8>, y: Vec<u8>) -> Self {
        debug_assert_eq!(x.len(), y.len());
        Self { x, y }
    }

    /// Reassemble a fragment from its two halves (for callers restoring
    /// fragments from storage). Both must be the same non-zero width.
    pub fn from_parts(x: Vec<u8>, y: Vec<u8>) -> Result<Self, WireError> {
        if x.is_empty() || x.len() != y.len() {
            return Err(WireError::Malformed(
                "fragment halves must be the same non-zero width",
            ));
        }
        Ok(Self { x, y })
    }

    /// Parse the wire form `x ∥ y` of a fragment of a `nbytes`-wide split.
    pub fn from_wire(input: &[u8], nbytes: usize) -> Result<Self, WireError> {
        match input.len().cmp(&(2 * nbytes)) {
            std::cmp::Ordering::Less => Err(WireError::Truncated {
                needed: 2 * nbytes,
                got: input.len(),
            }),
            std::cmp::Ordering::Greater => Err(WireError::TrailingBytes),
            std::cmp::Ordering::Equal => {
                let (x, y) = input.split_at(nbytes);
                Self::from_parts(x.to_vec(), y.to_vec())
            }
        }
    }

    /// Field width of the split this fragment belongs to, in bytes.
    pub fn nbytes(&self) -> usize {
        self.x.len()
    }

    pub fn x_bytes(&self) -> &[u8] {
        &self.x
    }

    pub fn y_bytes(&self) -> &[u8] {
        &self.y
    }
}

impl ToWire for Fragment {
    fn to_wire(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.x.len() + self.y.len());
        bytes.extend_from_slice(&self.x);
        bytes.extend_from_slice(&self.y);
        bytes
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Fragment {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let nbytes = *g.choose(&[1usize, 2, 4, 8, 16, 32]).unwrap();
        let half = |g: &mut quickcheck::Gen| (0..nbytes).map(|_| u8::arbitrary(g)).collect();
        Self {
            x: half(g),
            y: half(g),
        }
    }
}
