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

//! This module implements a Shamir Secret Sharing scheme over a prime-order
//! field, where the field is chosen by the byte width of the secret being
//! split. The secret is encoded as the *leading* coefficient of a polynomial
//! of degree M-1, the remaining coefficients are derived deterministically
//! from the secret with an iterated HMAC-SHA512 chain, and each fragment is
//! one evaluation point of that polynomial. Reconstruction solves the
//! Vandermonde system over the field with exact (arbitrary-precision)
//! arithmetic.
//!
//! ## Security ##
//! **This implementation is not remotely constant time. Field elements are
//! heap-allocated big integers whose operation timing depends on their
//! values. It is intended for offline backup tooling, not for online
//! protocols where an attacker can measure timing.**

mod dealer;
mod field;
mod fragment;
mod matrix;
mod subsets;

pub use dealer::{recover_secret, Dealer, MAX_THRESHOLD, MIN_THRESHOLD};
pub use field::FiniteField;
pub use fragment::Fragment;
pub use matrix::Matrix;
pub use subsets::{create_testing_subsets, test_reconstruct_secrets, DEFAULT_MAX_TEST_COUNT};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no field prime is configured for a width of {0} bytes")]
    UnsupportedFieldWidth(usize),

    #[error("secret is too large for a {nbytes}-byte field: its integer value must be below the field prime")]
    SecretOutOfRange { nbytes: usize },

    #[error("threshold must require between 2 and 8 fragments, got {0}")]
    InvalidThreshold(usize),

    #[error("cannot make fewer pieces than the reconstruction threshold: asked for {pieces} pieces with a threshold of {needed}")]
    InsufficientPieces { needed: usize, pieces: usize },

    #[error("not enough fragments: need {needed}, got {got}")]
    InsufficientFragments { needed: usize, got: usize },

    #[error("reconstruction matrix is singular: fragment x values must be pairwise distinct")]
    SingularReconstruction,

    #[error("zero has no multiplicative inverse")]
    ZeroInverse,

    #[error("matrix dimensions are incompatible: {0}")]
    DimensionMismatch(&'static str),
}
