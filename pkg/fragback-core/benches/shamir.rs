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

use fragback_core::shamir::{recover_secret, Dealer};

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::{distributions::Standard, Rng};

// Random secrets of the field width with a zeroed leading byte, so they
// always sit below the field prime.
fn random_secret(nbytes: usize) -> Vec<u8> {
    let mut secret = rand::thread_rng()
        .sample_iter(Standard)
        .take(nbytes)
        .collect::<Vec<u8>>();
    secret[0] = 0;
    secret
}

fn benchmark_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("shamir Dealer::split");
    for nbytes in [16usize, 32, 64] {
        let secret = random_secret(nbytes);
        let dealer = Dealer::new(3, 5, nbytes).unwrap();
        group.throughput(Throughput::Bytes(nbytes as u64));
        group.bench_with_input(format!("nbytes={:03}", nbytes), &dealer, |b, dealer| {
            b.iter(|| dealer.split(black_box(&secret)).unwrap())
        });
    }
    group.finish()
}

fn benchmark_recover_secret(c: &mut Criterion) {
    let mut group = c.benchmark_group("shamir recover_secret");
    for nbytes in [16usize, 32, 64] {
        let secret = random_secret(nbytes);
        let dealer = Dealer::new(3, 5, nbytes).unwrap();
        let fragments = dealer.split(&secret).unwrap();
        group.throughput(Throughput::Bytes(nbytes as u64));
        group.bench_with_input(
            format!("nbytes={:03}", nbytes),
            &fragments,
            |b, fragments| b.iter(|| recover_secret(black_box(fragments), 3, nbytes).unwrap()),
        );
    }
    group.finish()
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(250);
    targets = benchmark_split, benchmark_recover_secret
}
criterion_main!(benches);
