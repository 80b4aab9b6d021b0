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

use std::collections::BTreeMap;

use crate::shamir::Error;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;

/// For each supported data width, the largest prime just below `2^(8n)`,
/// stored as the offset `c` in `prime = 2^(8n) - c`. Because the field is
/// only used to encode data of a fixed width, enforcing primality by table
/// lookup is both simpler and more auditable than testing primality at
/// runtime. To support another width, find a prime very close to `2^(8n)`
/// and add it here.
const PRIME_OFFSETS: [(usize, u32); 14] = [
    (1, 5), // mainly for testing
    (2, 39),
    (4, 5),
    (8, 59),
    (16, 797),
    (20, 543),
    (24, 333),
    (32, 357),
    (48, 317),
    (64, 569),
    (96, 825),
    (128, 105),
    (192, 3453),
    (256, 1157),
];

static PRIMES: Lazy<BTreeMap<usize, BigUint>> = Lazy::new(|| {
    PRIME_OFFSETS
        .iter()
        .map(|&(nbytes, offset)| {
            let prime = (BigUint::one() << (8 * nbytes)) - BigUint::from(offset);
            (nbytes, prime)
        })
        .collect()
});

/// A prime-order finite field sized to hold `nbytes`-wide byte strings.
///
/// All element operations accept raw [`BigUint`] values and reduce them
/// modulo the field prime, so inputs slightly above the prime (such as HMAC
/// output truncated to the field width) are handled without a separate
/// reduction step.
// NOTE: None of these operations are timing-safe.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FiniteField {
    nbytes: usize,
    prime: BigUint,
}

impl FiniteField {
    /// Construct the field for a given data width in bytes.
    ///
    /// Fails with [`Error::UnsupportedFieldWidth`] if no prime is configured
    /// for that width.
    pub fn new(nbytes: usize) -> Result<Self, Error> {
        let prime = PRIMES
            .get(&nbytes)
            .cloned()
            .ok_or(Error::UnsupportedFieldWidth(nbytes))?;
        Ok(Self { nbytes, prime })
    }

    /// Data width in bytes.
    pub fn nbytes(&self) -> usize {
        self.nbytes
    }

    /// The field prime.
    pub fn prime(&self) -> &BigUint {
        &self.prime
    }

    pub fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a + b) % &self.prime
    }

    pub fn subtract(&self, a: &BigUint, b: &BigUint) -> BigUint {
        // BigUint cannot go negative, so lift a above b before subtracting.
        ((a % &self.prime) + &self.prime - (b % &self.prime)) % &self.prime
    }

    pub fn mult(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.prime
    }

    /// Raise `a` to a non-negative integer power by square-and-multiply.
    pub fn power(&self, a: &BigUint, e: u64) -> BigUint {
        a.modpow(&BigUint::from(e), &self.prime)
    }

    /// The multiplicative inverse of `a`, computed as `a^(prime-2)`.
    ///
    /// This relies on Fermat's little theorem and is only valid because the
    /// modulus is prime. Zero has no inverse and yields
    /// [`Error::ZeroInverse`].
    pub fn inverse(&self, a: &BigUint) -> Result<BigUint, Error> {
        if (a % &self.prime).is_zero() {
            return Err(Error::ZeroInverse);
        }
        Ok(a.modpow(&(&self.prime - 2u32), &self.prime))
    }

    /// Field division: `a * inverse(b)`. Fails for `b ≡ 0`.
    pub fn divide(&self, a: &BigUint, b: &BigUint) -> Result<BigUint, Error> {
        let binv = self.inverse(b)?;
        Ok(self.mult(a, &binv))
    }

    /// Encode a value as a fixed-width big-endian byte string.
    ///
    /// The value must fit in `nbytes` bytes (every value this crate encodes
    /// is either reduced or HMAC output already truncated to the width); if
    /// it does not, only the low-order bytes are kept.
    pub fn encode(&self, value: &BigUint) -> Vec<u8> {
        let bytes = value.to_bytes_be();
        debug_assert!(bytes.len() <= self.nbytes || value.is_zero());

        let mut out = vec![0u8; self.nbytes];
        let dst = self.nbytes.saturating_sub(bytes.len());
        let src = bytes.len().saturating_sub(self.nbytes);
        out[dst..].copy_from_slice(&bytes[src..]);
        out
    }

    /// Decode a big-endian byte string into an integer.
    pub fn decode(&self, bytes: &[u8]) -> BigUint {
        BigUint::from_bytes_be(bytes)
    }
}
