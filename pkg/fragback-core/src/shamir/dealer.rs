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

use crate::{
    crypto,
    shamir::{Error, FiniteField, Fragment, Matrix},
};

use num_bigint::BigUint;
use zeroize::Zeroizing;

/// Fewest fragments a reconstruction may require. A threshold of one would
/// make every fragment the secret.
pub const MIN_THRESHOLD: usize = 2;

/// Most fragments a reconstruction may require. This bounds the
/// reconstruction system at 8×8, which keeps cofactor expansion cheap. Any
/// number of *optional* fragments beyond the threshold may still be issued.
pub const MAX_THRESHOLD: usize = 8;

/// Domain-separation string for the coefficient chain.
///
/// This constant, together with the truncation rule in
/// [`derive_field_numbers`], is a compatibility contract: changing either
/// silently changes every fragment ever derived from an existing secret.
const COEFF_DOMAIN: &[u8] = b"splitsecrets";

/// Derive `count` deterministic field numbers from the secret by an iterated
/// HMAC-SHA512 chain: each step keys the HMAC with the previous step's
/// output, truncated to the field width (capped at the 64-byte HMAC output
/// for the very wide fields). Interpreting each truncated digest as a
/// big-endian integer gives the polynomial coefficients, so a given secret
/// always maps to the same polynomial and re-splitting is reproducible.
fn derive_field_numbers(ff: &FiniteField, secret: &[u8], count: usize) -> Vec<BigUint> {
    let width = ff.nbytes().min(64);

    let mut numbers = Vec::with_capacity(count);
    let mut seed = Zeroizing::new(secret.to_vec());
    for _ in 0..count {
        let digest = Zeroizing::new(crypto::hmac_sha512(&seed, COEFF_DOMAIN));
        seed = Zeroizing::new(digest[..width].to_vec());
        numbers.push(BigUint::from_bytes_be(&seed));
    }
    numbers
}

/// Splits a fixed-width secret into `pieces` fragments, any `needed` of
/// which reconstruct it.
///
/// The secret becomes the *leading* coefficient of a degree `needed - 1`
/// polynomial whose other coefficients come from the deterministic HMAC
/// chain, and each fragment is one evaluation point `(x, poly(x))` encoded
/// as two fixed-width big-endian byte strings.
#[derive(Clone, Debug)]
pub struct Dealer {
    field: FiniteField,
    needed: usize,
    pieces: usize,
    random_x: bool,
}

impl Dealer {
    /// Create a dealer for a `needed`-of-`pieces` split of `nbytes`-wide
    /// secrets. Fragments are evaluated at `x = 1, 2, ..., pieces`.
    pub fn new(needed: usize, pieces: usize, nbytes: usize) -> Result<Self, Error> {
        if !(MIN_THRESHOLD..=MAX_THRESHOLD).contains(&needed) {
            return Err(Error::InvalidThreshold(needed));
        }
        if pieces < needed {
            return Err(Error::InsufficientPieces { needed, pieces });
        }
        Ok(Self {
            field: FiniteField::new(nbytes)?,
            needed,
            pieces,
            random_x: false,
        })
    }

    /// Draw x values from the deterministic HMAC stream (at offsets past the
    /// coefficients) instead of using `1..=pieces`.
    ///
    /// Nothing checks the drawn x values for collisions. For the one- and
    /// two-byte field widths two pieces can genuinely end up with the same
    /// x, which makes that pair unusable together for reconstruction; at the
    /// realistic widths (16 bytes and up) the probability is negligible.
    pub fn with_random_x(mut self) -> Self {
        self.random_x = true;
        self
    }

    pub fn field(&self) -> &FiniteField {
        &self.field
    }

    pub fn needed(&self) -> usize {
        self.needed
    }

    pub fn pieces(&self) -> usize {
        self.pieces
    }

    /// Split `secret` into `pieces` fragments.
    ///
    /// The secret must be exactly as wide as the field and, read as a
    /// big-endian integer, strictly below the field prime. Splitting the
    /// same secret with the same dealer parameters always produces the same
    /// fragments.
    ///
    /// Intermediate copies of secret material are kept in zeroizing buffers;
    /// the caller still owns the input slice and its lifetime.
    pub fn split(&self, secret: &[u8]) -> Result<Vec<Fragment>, Error> {
        let ff = &self.field;

        let a = ff.decode(secret);
        if a >= *ff.prime() {
            return Err(Error::SecretOutOfRange {
                nbytes: ff.nbytes(),
            });
        }

        // With random x the stream must also cover index pieces+1 (the last
        // x value), which the coefficient count alone only reaches for
        // thresholds of three and up.
        let count = if self.random_x {
            (self.pieces + self.needed - 1).max(self.pieces + 2)
        } else {
            self.pieces + self.needed - 1
        };
        let other_numbers = derive_field_numbers(ff, secret, count);

        // poly(x) = a*x^(M-1) + other[0]*x^(M-2) + ... + other[M-2]*x^0
        let poly = |x: &BigUint| -> BigUint {
            let mut out = ff.mult(&a, &ff.power(x, (self.needed - 1) as u64));
            for i in 0..self.needed - 1 {
                let e = (self.needed - 2 - i) as u64;
                let term = ff.mult(&other_numbers[i], &ff.power(x, e));
                out = ff.add(&out, &term);
            }
            out
        };

        let mut fragments = Vec::with_capacity(self.pieces);
        for i in 0..self.pieces {
            let x = if self.random_x {
                other_numbers[i + 2].clone()
            } else {
                BigUint::from(i as u64 + 1)
            };
            let y = poly(&x);
            fragments.push(Fragment::new(ff.encode(&x), ff.encode(&y)));
        }
        Ok(fragments)
    }
}

/// Recover the secret from at least `needed` fragments of an
/// `nbytes`-wide split.
///
/// Only the first `needed` fragments are used; any valid subset of that size
/// reconstructs the same secret, so callers may pass whichever fragments
/// they hold in any order. The x values of the used fragments must be
/// pairwise distinct or reconstruction fails with
/// [`Error::SingularReconstruction`].
pub fn recover_secret(
    fragments: &[Fragment],
    needed: usize,
    nbytes: usize,
) -> Result<Vec<u8>, Error> {
    if !(MIN_THRESHOLD..=MAX_THRESHOLD).contains(&needed) {
        return Err(Error::InvalidThreshold(needed));
    }
    if fragments.len() < needed {
        return Err(Error::InsufficientFragments {
            needed,
            got: fragments.len(),
        });
    }
    let ff = FiniteField::new(nbytes)?;

    let chosen = &fragments[..needed];
    let xs = chosen
        .iter()
        .map(|frag| ff.decode(frag.x_bytes()))
        .collect::<Vec<_>>();
    let ys = chosen
        .iter()
        .map(|frag| ff.decode(frag.y_bytes()))
        .collect::<Vec<_>>();

    // Solve the Vandermonde system; the coefficient vector comes out in
    // decreasing-degree order, so the secret is its first entry.
    let system = Matrix::vandermonde(&ff, &xs);
    let coeffs = system.inverse(&ff)?.mul_vector(&ff, &ys)?;

    Ok(ff.encode(&coeffs[0]))
}

#[cfg(test)]
mod test {
    use super::*;

    use quickcheck::TestResult;

    fn pick(fragments: &[Fragment], indices: &[usize]) -> Vec<Fragment> {
        indices.iter().map(|&i| fragments[i].clone()).collect()
    }

    #[test]
    fn three_of_five_roundtrip() {
        let secret = 42u32.to_be_bytes();
        let dealer = Dealer::new(3, 5, 4).unwrap();
        let fragments = dealer.split(&secret).unwrap();
        assert_eq!(fragments.len(), 5);

        // Sequential x values start at 1.
        for (i, frag) in fragments.iter().enumerate() {
            assert_eq!(frag.x_bytes(), &(i as u32 + 1).to_be_bytes()[..]);
        }

        for subset in [&[0, 2, 4][..], &[1, 3, 4], &[0, 1, 2], &[4, 2, 0]] {
            let recovered = recover_secret(&pick(&fragments, subset), 3, 4).unwrap();
            assert_eq!(recovered, secret);
        }
    }

    #[test]
    fn split_is_deterministic() {
        let secret = *b"very secret 16-b";
        let dealer = Dealer::new(4, 7, 16).unwrap();
        let first = dealer.split(&secret).unwrap();
        let second = dealer.split(&secret).unwrap();
        assert_eq!(first, second);

        // A fresh dealer with the same parameters agrees too.
        let third = Dealer::new(4, 7, 16).unwrap().split(&secret).unwrap();
        assert_eq!(first, third);
    }

    #[test]
    fn different_secrets_differ() {
        let dealer = Dealer::new(2, 3, 4).unwrap();
        let a = dealer.split(&42u32.to_be_bytes()).unwrap();
        let b = dealer.split(&43u32.to_be_bytes()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn threshold_bounds() {
        assert!(matches!(
            Dealer::new(1, 5, 4),
            Err(Error::InvalidThreshold(1))
        ));
        assert!(matches!(
            Dealer::new(9, 12, 4),
            Err(Error::InvalidThreshold(9))
        ));
        assert!(matches!(
            Dealer::new(0, 5, 4),
            Err(Error::InvalidThreshold(0))
        ));
        // The extremes themselves are fine.
        assert!(Dealer::new(2, 2, 4).is_ok());
        assert!(Dealer::new(8, 8, 4).is_ok());
    }

    #[test]
    fn pieces_must_cover_threshold() {
        assert!(matches!(
            Dealer::new(3, 2, 4),
            Err(Error::InsufficientPieces {
                needed: 3,
                pieces: 2
            })
        ));
    }

    #[test]
    fn secret_must_be_below_prime() {
        // prime(1 byte) = 251, so 251 itself is out of range...
        let dealer = Dealer::new(2, 2, 1).unwrap();
        assert!(matches!(
            dealer.split(&[251]),
            Err(Error::SecretOutOfRange { nbytes: 1 })
        ));
        // ...and 250 is the largest representable secret.
        let fragments = dealer.split(&[250]).unwrap();
        assert_eq!(recover_secret(&fragments, 2, 1).unwrap(), [250]);
    }

    #[test]
    fn too_few_fragments() {
        let dealer = Dealer::new(3, 5, 4).unwrap();
        let fragments = dealer.split(&42u32.to_be_bytes()).unwrap();
        assert!(matches!(
            recover_secret(&fragments[..2], 3, 4),
            Err(Error::InsufficientFragments { needed: 3, got: 2 })
        ));
        assert!(matches!(
            recover_secret(&[], 3, 4),
            Err(Error::InsufficientFragments { needed: 3, got: 0 })
        ));
    }

    #[test]
    fn duplicate_x_is_singular() {
        let dealer = Dealer::new(2, 3, 4).unwrap();
        let fragments = dealer.split(&42u32.to_be_bytes()).unwrap();
        let duplicated = vec![fragments[0].clone(), fragments[0].clone()];
        assert!(matches!(
            recover_secret(&duplicated, 2, 4),
            Err(Error::SingularReconstruction)
        ));
    }

    #[test]
    fn random_x_roundtrip() {
        let secret = *b"very secret 16-b";
        let dealer = Dealer::new(3, 6, 16).unwrap().with_random_x();
        let fragments = dealer.split(&secret).unwrap();

        // The x values come from the HMAC stream, not 1..=pieces.
        assert_ne!(fragments[0].x_bytes(), &1u128.to_be_bytes()[..]);

        for subset in [&[0, 1, 2][..], &[3, 4, 5], &[5, 2, 0]] {
            let recovered = recover_secret(&pick(&fragments, subset), 3, 16).unwrap();
            assert_eq!(recovered, secret);
        }
    }

    #[test]
    fn random_x_minimum_threshold() {
        // The x stream offset (i + 2) runs past the coefficient count when
        // the threshold is two; make sure the stream is long enough.
        let secret = *b"very secret 16-b";
        let dealer = Dealer::new(2, 5, 16).unwrap().with_random_x();
        let fragments = dealer.split(&secret).unwrap();
        assert_eq!(fragments.len(), 5);
        assert_eq!(
            recover_secret(&pick(&fragments, &[4, 1]), 2, 16).unwrap(),
            secret
        );
    }

    #[test]
    fn wide_field_roundtrip() {
        // Wider than the 64-byte HMAC output, so the coefficient chain runs
        // with truncation capped at 64 bytes.
        let secret = {
            let mut s = vec![0u8; 96];
            s[0] = 0x07;
            s[95] = 0xa5;
            s
        };
        let dealer = Dealer::new(3, 4, 96).unwrap();
        let fragments = dealer.split(&secret).unwrap();
        assert_eq!(
            recover_secret(&pick(&fragments, &[3, 1, 2]), 3, 96).unwrap(),
            secret
        );
    }

    #[test]
    fn coefficient_chain_is_stable() {
        // The chain is keyed material: the same secret must always produce
        // the same numbers, independent of how many are requested.
        let ff = FiniteField::new(4).unwrap();
        let longer = derive_field_numbers(&ff, b"seed", 8);
        let shorter = derive_field_numbers(&ff, b"seed", 3);
        assert_eq!(&longer[..3], &shorter[..]);
        assert!(longer.iter().all(|n| *n < (BigUint::from(1u64) << 32)));
    }

    #[quickcheck]
    fn arbitrary_roundtrip(secret: Vec<u8>, m_seed: u8, extra: u8) -> TestResult {
        let nbytes = 16;
        let needed = 2 + (m_seed % 7) as usize; // 2..=8
        let pieces = needed + (extra % 4) as usize;

        let ff = FiniteField::new(nbytes).unwrap();
        let mut secret = secret;
        secret.resize(nbytes, 0);
        // Keep the integer value inside the field.
        let secret = ff.encode(&(ff.decode(&secret) % ff.prime()));

        let dealer = match Dealer::new(needed, pieces, nbytes) {
            Ok(dealer) => dealer,
            Err(_) => return TestResult::failed(),
        };
        let fragments = dealer.split(&secret).unwrap();

        // Recover from the *last* `needed` fragments so the subset is not
        // just the prefix the dealer emitted.
        let tail = &fragments[pieces - needed..];
        TestResult::from_bool(recover_secret(tail, needed, nbytes).unwrap() == secret)
    }
}
