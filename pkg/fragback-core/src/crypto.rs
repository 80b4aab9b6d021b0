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

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};

/// Number of bytes in a storage checksum.
pub const CHECKSUM_LENGTH: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum ChecksumError {
    #[error("checksum mismatch not attributable to a single corrupted byte")]
    Mismatch,
}

/// Compute the double-SHA-256 digest of the input.
pub fn hash256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

/// Compute HMAC-SHA512 of `msg` under `key`.
pub fn hmac_sha512(key: &[u8], msg: &[u8]) -> [u8; 64] {
    let mut mac =
        Hmac::<Sha512>::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(msg);
    let mut out = [0u8; 64];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

/// Compute the 4-byte storage checksum of a byte string (the first four bytes
/// of its [`hash256`] digest).
pub fn compute_checksum(data: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    let digest = hash256(data);
    let mut out = [0u8; CHECKSUM_LENGTH];
    out.copy_from_slice(&digest[..CHECKSUM_LENGTH]);
    out
}

/// Verify a byte string against its stored checksum, correcting up to one
/// corrupted byte.
///
/// The return value is the verified data:
///
///  * if the checksum matches, the input is returned unchanged;
///  * if a single data byte is corrupt, the repaired data is returned;
///  * if the checksum itself (rather than the data) has a single corrupt
///    byte, the data is returned unchanged -- callers storing the checksum
///    should rewrite it;
///  * anything beyond a one-byte error is [`ChecksumError::Mismatch`], since
///    it is almost certainly not a storage bit-flip.
pub fn verify_checksum(data: &[u8], checksum: &[u8]) -> Result<Vec<u8>, ChecksumError> {
    if hash256(data).starts_with(checksum) {
        return Ok(data.to_vec());
    }

    // Try to repair a single corrupted data byte.
    let mut candidate = data.to_vec();
    for i in 0..candidate.len() {
        let original = candidate[i];
        for value in 0..=u8::MAX {
            if value == original {
                continue;
            }
            candidate[i] = value;
            if hash256(&candidate).starts_with(checksum) {
                return Ok(candidate);
            }
        }
        candidate[i] = original;
    }

    // The data may be fine and the checksum itself corrupt. If the stored
    // checksum differs from the recomputed one in exactly one byte, trust the
    // data.
    let digest = hash256(data);
    let mismatches = checksum
        .iter()
        .zip(digest.iter())
        .filter(|(a, b)| a != b)
        .count();
    if checksum.len() <= digest.len() && mismatches == 1 {
        return Ok(data.to_vec());
    }

    Err(ChecksumError::Mismatch)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn hash256_empty() {
        // Double-SHA-256 of the empty string, as used all over Bitcoin.
        assert_eq!(
            hex::encode(hash256(b"")),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456",
        );
    }

    #[test]
    fn hmac_sha512_rfc4231_case1() {
        let key = [0x0b; 20];
        let tag = hmac_sha512(&key, b"Hi There");
        assert_eq!(
            hex::encode(tag),
            "87aa7cdea5ef619d4ff0b4241a1d6cb02379f4e2ce4ec2787ad0b30545e17cde\
             daa833b7d6b8a702038b274eaea3f4e4be9d914eeb61f1702e696c203a126854",
        );
    }

    #[test]
    fn checksum_roundtrip() {
        let data = b"fragment storage line".to_vec();
        let chksum = compute_checksum(&data);
        assert_eq!(verify_checksum(&data, &chksum).unwrap(), data);
    }

    #[test]
    fn checksum_repairs_single_data_byte() {
        let data = b"fragment storage line".to_vec();
        let chksum = compute_checksum(&data);

        let mut corrupted = data.clone();
        corrupted[7] ^= 0x5a;
        assert_eq!(verify_checksum(&corrupted, &chksum).unwrap(), data);
    }

    #[test]
    fn checksum_detects_corrupt_checksum_byte() {
        let data = b"fragment storage line".to_vec();
        let mut chksum = compute_checksum(&data);
        chksum[2] ^= 0xff;

        // Data comes back unchanged; the checksum is what needs rewriting.
        assert_eq!(verify_checksum(&data, &chksum).unwrap(), data);
    }

    #[test]
    fn checksum_rejects_multi_byte_error() {
        let data = b"fragment storage line".to_vec();
        let chksum = compute_checksum(&data);

        let mut corrupted = data;
        corrupted[1] ^= 0x01;
        corrupted[9] ^= 0x80;
        assert!(matches!(
            verify_checksum(&corrupted, &chksum),
            Err(ChecksumError::Mismatch)
        ));
    }
}
