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

use std::collections::{BTreeMap, BTreeSet};

use crate::shamir::{dealer, Error, Fragment};

use itertools::Itertools;
use rand::seq::IteratorRandom;

/// Default cap on the number of subsets tested by
/// [`create_testing_subsets`]. Beyond this many combinations the tester
/// switches from exhaustive enumeration to random sampling.
pub const DEFAULT_MAX_TEST_COUNT: usize = 20;

/// `C(n, k)`, saturating at `u128::MAX`. Fragment counts are tiny in
/// practice (a dozen at most), so this never actually saturates; the
/// saturation only guards the comparison against `max_test_count`.
fn binomial(n: usize, k: usize) -> u128 {
    let k = k.min(n - k);
    let mut result = 1u128;
    for i in 0..k {
        result = result.saturating_mul((n - i) as u128) / (i as u128 + 1);
    }
    result
}

/// Choose which size-`needed` subsets of the given fragment indices to
/// verify.
///
/// Returns `(randomized, subsets)`, each subset sorted and the list of
/// subsets in sorted order:
///
///  * if `needed` equals the number of indices there is exactly one subset
///    and `randomized` is `false`;
///  * if there are at most `max_test_count` combinations, all of them are
///    returned and `randomized` is `false`;
///  * otherwise `max_test_count` *distinct* subsets are drawn uniformly at
///    random (resampling on duplicates) and `randomized` is `true`.
pub fn create_testing_subsets(
    frag_indices: &[u32],
    needed: usize,
    max_test_count: usize,
) -> Result<(bool, Vec<Vec<u32>>), Error> {
    let num_indices = frag_indices.len();
    if needed > num_indices {
        return Err(Error::InsufficientFragments {
            needed,
            got: num_indices,
        });
    }

    let mut indices = frag_indices.to_vec();
    indices.sort_unstable();

    if needed == num_indices {
        return Ok((false, vec![indices]));
    }

    if binomial(num_indices, needed) <= max_test_count as u128 {
        // With the indices sorted, combinations() emits each subset sorted
        // and the subsets themselves in lexicographic order.
        let subsets = indices.into_iter().combinations(needed).collect();
        Ok((false, subsets))
    } else {
        let mut rng = rand::thread_rng();
        let mut seen = BTreeSet::new();
        while seen.len() < max_test_count {
            let mut sample = indices.iter().copied().choose_multiple(&mut rng, needed);
            sample.sort_unstable();
            // Duplicate draws simply do not grow the set; keep sampling.
            seen.insert(sample);
        }
        Ok((true, seen.into_iter().collect()))
    }
}

/// Reconstruct the secret from every subset chosen by
/// [`create_testing_subsets`] and pair each subset with its result.
///
/// This is the verification pass run after issuing a fragment set: all
/// returned secrets must be identical, otherwise at least one fragment was
/// corrupted between splitting and storage.
pub fn test_reconstruct_secrets(
    frag_map: &BTreeMap<u32, Fragment>,
    needed: usize,
    max_test_count: usize,
) -> Result<(bool, Vec<(Vec<u32>, Vec<u8>)>), Error> {
    let keys = frag_map.keys().copied().collect::<Vec<_>>();
    let (randomized, subsets) = create_testing_subsets(&keys, needed, max_test_count)?;

    // create_testing_subsets already rejected an empty map.
    let nbytes = frag_map
        .values()
        .next()
        .map(|frag| frag.nbytes())
        .unwrap_or_default();

    let mut results = Vec::with_capacity(subsets.len());
    for subset in subsets {
        let fragments = subset
            .iter()
            .map(|idx| frag_map[idx].clone())
            .collect::<Vec<_>>();
        let secret = dealer::recover_secret(&fragments, needed, nbytes)?;
        results.push((subset, secret));
    }
    Ok((randomized, results))
}
