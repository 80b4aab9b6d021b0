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

#![forbid(unsafe_code)]

#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
#[macro_use]
extern crate quickcheck_macros;

/// Hash, HMAC, and checksum primitives consumed by the rest of the crate.
pub mod crypto;

/// Fragment-identifier records and their line format.
pub mod fragid;

/// Implementation of deterministic Shamir Secret Sharing over prime fields.
pub mod shamir;

/// Byte-level and hex-level encode/decode traits.
pub mod wire;
