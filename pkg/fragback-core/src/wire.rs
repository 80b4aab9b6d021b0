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

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("invalid hex encoding: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("input truncated: needed at least {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },

    #[error("trailing bytes left after deserialisation")]
    TrailingBytes,

    #[error("malformed input: {0}")]
    Malformed(&'static str),
}

pub trait ToWire {
    fn to_wire(&self) -> Vec<u8>;

    /// Render the wire form as a lowercase hex string.
    fn to_wire_hex(&self) -> String {
        hex::encode(self.to_wire())
    }

    /// Render the wire form as hex, with every group of four hex characters
    /// separated by a space. This is the format written on physical backup
    /// sheets, where the grouping makes hand transcription less error-prone.
    fn to_wire_hex_spaced(&self) -> String {
        let plain = self.to_wire_hex();
        let mut out = String::with_capacity(plain.len() + plain.len() / 4);
        for (i, ch) in plain.chars().enumerate() {
            if i > 0 && i % 4 == 0 {
                out.push(' ');
            }
            out.push(ch);
        }
        out
    }
}

pub trait FromWire: Sized {
    fn from_wire_partial(input: &[u8]) -> Result<(&[u8], Self), WireError>;

    fn from_wire<B: AsRef<[u8]>>(input: B) -> Result<Self, WireError> {
        match Self::from_wire_partial(input.as_ref())? {
            ([], ret) => Ok(ret),
            _ => Err(WireError::TrailingBytes),
        }
    }

    /// Parse a hex rendering (spaced or not) of a `FromWire`-implementing
    /// type. All ASCII whitespace is stripped before decoding, so both the
    /// plain and the grouped form from [`ToWire::to_wire_hex_spaced`] are
    /// accepted.
    fn from_wire_hex<S: AsRef<str>>(input: S) -> Result<Self, WireError> {
        let stripped = input
            .as_ref()
            .chars()
            .filter(|ch| !ch.is_ascii_whitespace())
            .collect::<String>();
        Self::from_wire(hex::decode(stripped)?)
    }
}
