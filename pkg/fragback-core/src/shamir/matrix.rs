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

use crate::shamir::{Error, FiniteField};

use num_bigint::BigUint;
use num_traits::Zero;

/// A small dense matrix of field elements, stored row-major.
///
/// Reconstruction only ever builds M×M systems with M ≤ 8, so recursive
/// cofactor expansion is entirely adequate here and keeps every intermediate
/// value inspectable. A general linear-algebra dependency would be far more
/// machinery than the job needs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Matrix {
    rows: Vec<Vec<BigUint>>,
}

impl Matrix {
    /// Build a matrix from row-major element vectors. All rows must be the
    /// same length and the matrix must not be empty.
    pub fn new(rows: Vec<Vec<BigUint>>) -> Result<Self, Error> {
        let Some(first) = rows.first() else {
            return Err(Error::DimensionMismatch("matrix must not be empty"));
        };
        if first.is_empty() {
            return Err(Error::DimensionMismatch("matrix rows must not be empty"));
        }
        let width = first.len();
        if rows.iter().any(|row| row.len() != width) {
            return Err(Error::DimensionMismatch(
                "matrix rows must all have the same length",
            ));
        }
        Ok(Self { rows })
    }

    /// Build the Vandermonde matrix for a set of evaluation points: row `j`
    /// is `[x_j^(m-1), x_j^(m-2), ..., x_j^0]` where `m` is the number of
    /// points. Inverting this matrix solves for polynomial coefficients in
    /// decreasing-degree order.
    pub fn vandermonde(ff: &FiniteField, xs: &[BigUint]) -> Self {
        let m = xs.len();
        Self {
            rows: xs
                .iter()
                .map(|x| (0..m).rev().map(|e| ff.power(x, e as u64)).collect())
                .collect(),
        }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_cols(&self) -> usize {
        self.rows[0].len()
    }

    pub fn is_square(&self) -> bool {
        self.num_rows() == self.num_cols()
    }

    /// Element accessor used by tests and callers that inspect the system.
    pub fn get(&self, row: usize, col: usize) -> Option<&BigUint> {
        self.rows.get(row)?.get(col)
    }

    /// The submatrix with row `r` and column `c` removed.
    fn minor(&self, r: usize, c: usize) -> Self {
        Self {
            rows: self
                .rows
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != r)
                .map(|(_, row)| {
                    row.iter()
                        .enumerate()
                        .filter(|&(j, _)| j != c)
                        .map(|(_, elem)| elem.clone())
                        .collect()
                })
                .collect(),
        }
    }

    /// Determinant by cofactor expansion along row 0.
    pub fn determinant(&self, ff: &FiniteField) -> Result<BigUint, Error> {
        if !self.is_square() {
            return Err(Error::DimensionMismatch("determinant needs a square matrix"));
        }
        if self.num_rows() == 1 {
            return Ok(&self.rows[0][0] % ff.prime());
        }

        let mut result = BigUint::zero();
        for (i, elem) in self.rows[0].iter().enumerate() {
            let subdet = self.minor(0, i).determinant(ff)?;
            let term = ff.mult(elem, &subdet);
            result = if i % 2 == 0 {
                ff.add(&result, &term)
            } else {
                ff.subtract(&result, &term)
            };
        }
        Ok(result)
    }

    /// The adjugate (transposed cofactor) matrix: entry `(i, j)` is
    /// `(-1)^(i+j) * det(minor(j, i))`.
    pub fn adjoint(&self, ff: &FiniteField) -> Result<Self, Error> {
        if !self.is_square() {
            return Err(Error::DimensionMismatch("adjoint needs a square matrix"));
        }
        let sz = self.num_rows();

        let mut rows = Vec::with_capacity(sz);
        for i in 0..sz {
            let mut row = Vec::with_capacity(sz);
            for j in 0..sz {
                let cofactor = self.minor(j, i).determinant(ff)?;
                row.push(if (i + j) % 2 == 0 {
                    cofactor
                } else {
                    ff.subtract(&BigUint::zero(), &cofactor)
                });
            }
            rows.push(row);
        }
        Ok(Self { rows })
    }

    /// Matrix inverse over the field, via the adjugate.
    ///
    /// Each entry of the adjugate is divided by the determinant individually.
    /// This is equivalent to one scalar multiplication of the whole adjugate
    /// by `det^-1`, but the per-entry form keeps every output element a
    /// single self-contained field expression, which is what reviewers of
    /// the original scheme audited. Do not "optimise" this without proving
    /// the replacement against the subset tests.
    ///
    /// Fails with [`Error::SingularReconstruction`] when the determinant is
    /// zero, which for Vandermonde systems means two fragments shared an x
    /// value.
    pub fn inverse(&self, ff: &FiniteField) -> Result<Self, Error> {
        let det = self.determinant(ff)?;
        if det.is_zero() {
            return Err(Error::SingularReconstruction);
        }
        let adj = self.adjoint(ff)?;

        let mut rows = Vec::with_capacity(adj.num_rows());
        for row in &adj.rows {
            rows.push(
                row.iter()
                    .map(|entry| ff.divide(entry, &det))
                    .collect::<Result<Vec<_>, _>>()?,
            );
        }
        Ok(Self { rows })
    }

    /// Multiply by a column vector.
    pub fn mul_vector(&self, ff: &FiniteField, vect: &[BigUint]) -> Result<Vec<BigUint>, Error> {
        if self.num_cols() != vect.len() {
            return Err(Error::DimensionMismatch(
                "vector length must match matrix column count",
            ));
        }
        Ok(self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(vect)
                    .fold(BigUint::zero(), |acc, (a, b)| ff.add(&acc, &ff.mult(a, b)))
            })
            .collect())
    }

    /// Matrix product `self * other`.
    pub fn mul_matrix(&self, ff: &FiniteField, other: &Self) -> Result<Self, Error> {
        if self.num_cols() != other.num_rows() {
            return Err(Error::DimensionMismatch(
                "inner matrix dimensions must agree",
            ));
        }
        let mut rows = Vec::with_capacity(self.num_rows());
        for i in 0..self.num_rows() {
            let mut row = Vec::with_capacity(other.num_cols());
            for j in 0..other.num_cols() {
                let mut acc = BigUint::zero();
                for k in 0..self.num_cols() {
                    acc = ff.add(&acc, &ff.mult(&self.rows[i][k], &other.rows[k][j]));
                }
                row.push(acc);
            }
            rows.push(row);
        }
        Ok(Self { rows })
    }
}
