// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::{Point, Size};
use understory_piece_request::{
    GridConfig, GridManager, PieceRequestManager, QueueManager, ViewportState,
};
use understory_piece_tree::{Piece, PieceId};

const RES: f64 = 1000.0;

/// `n` small nodes scattered over a square of roughly `sqrt(n)` cells per side.
fn scattered(n: usize) -> Vec<Piece> {
    let side = (n as f64).sqrt().ceil() as usize;
    (0..n)
        .map(|i| {
            // Cheap deterministic jitter so cells fill unevenly.
            let jitter = ((i * 7919) % 997) as f64;
            let x = (i % side) as f64 * RES + jitter * 0.5;
            let y = (i / side) as f64 * RES + jitter * 0.25;
            Piece::node(format!("$root$n{i}"), Point::new(x, y), Size::new(40.0, 20.0))
        })
        .collect()
}

fn fill<M: PieceRequestManager>(manager: &mut M, pieces: &[Piece]) {
    let root = PieceId::root();
    for piece in pieces {
        manager.enqueue(&root, piece.clone()).unwrap();
    }
}

fn bench_enqueue(c: &mut Criterion) {
    let mut group = c.benchmark_group("piece_request/enqueue");
    for n in [256usize, 4_096, 32_768] {
        let pieces = scattered(n);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("grid", n), &pieces, |b, pieces| {
            b.iter_batched(
                || GridManager::with_config(GridConfig::new(RES, 2)),
                |mut m| {
                    fill(&mut m, pieces);
                    black_box(m);
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("queue", n), &pieces, |b, pieces| {
            b.iter_batched(
                QueueManager::new,
                |mut m| {
                    fill(&mut m, pieces);
                    black_box(m);
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("piece_request/drain");
    // Center of the populated area; a roaming viewport exercises the ring
    // search and the fallback scan.
    for n in [256usize, 4_096] {
        let pieces = scattered(n);
        let side = (n as f64).sqrt().ceil();
        let viewport = ViewportState::new(
            Point::new(side * RES * 0.5, side * RES * 0.5),
            1.0,
            Size::new(800.0, 600.0),
        );
        group.throughput(Throughput::Elements(n as u64));

        for rings in [0u16, 2, 8] {
            group.bench_with_input(
                BenchmarkId::new(format!("grid_rings_{rings}"), n),
                &pieces,
                |b, pieces| {
                    b.iter_batched(
                        || {
                            let mut m = GridManager::with_config(GridConfig::new(RES, rings));
                            fill(&mut m, pieces);
                            m.set_viewport(&viewport);
                            m
                        },
                        |mut m| {
                            while let Some(piece) = m.dequeue() {
                                black_box(piece);
                            }
                        },
                        BatchSize::LargeInput,
                    );
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_enqueue, bench_drain);
criterion_main!(benches);
