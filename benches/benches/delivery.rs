// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::collections::HashMap;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Size};
use understory_piece_request::ManagerKind;
use understory_piece_tree::{Piece, PieceId};
use understory_progressive::{
    DeliveryConfig, DeliveryCoordinator, ModelUpdate, Outbound, PieceResponse, ViewportReport,
};

/// Resolved fragments keyed by id: a root with `fanout` nodes, each holding
/// `fanout` nested nodes.
fn model(fanout: usize) -> HashMap<PieceId, Piece> {
    let size = Size::new(80.0, 40.0);
    let mut fragments = HashMap::new();
    let mut top = Vec::with_capacity(fanout);
    for i in 0..fanout {
        let id = format!("$root$n{i}");
        let node = Piece::node(id.as_str(), Point::new(i as f64 * 1500.0, 0.0), size);
        let children = (0..fanout).map(|j| {
            Piece::node(format!("{id}$c{j}"), Point::new(0.0, j as f64 * 120.0), size)
        });
        let resolved = node.clone().with_children(children);
        for child in &resolved.children {
            fragments.insert(child.id.clone(), child.clone());
        }
        fragments.insert(node.id.clone(), resolved);
        top.push(node);
    }
    fragments.insert(PieceId::root(), Piece::root_stub().with_children(top));
    fragments
}

fn deliver(config: &DeliveryConfig, fragments: &HashMap<PieceId, Piece>) -> usize {
    let viewport = ViewportReport::new(Point::ZERO, 1.0, Rect::new(0.0, 0.0, 800.0, 600.0));
    let mut coordinator = DeliveryCoordinator::from_config(config);
    let mut next = Some(coordinator.on_model_update(&ModelUpdate::default()));
    while let Some(outbound) = next {
        next = match outbound {
            Outbound::RequestPiece(request) => {
                let fragment = fragments[&request.element_id].clone();
                coordinator.on_piece_response(PieceResponse {
                    response_id: request.request_id,
                    fragment,
                })
            }
            Outbound::QueryViewport(_) => coordinator.on_viewport_report(&viewport),
        };
    }
    coordinator.tree().map_or(0, |tree| tree.len())
}

fn bench_delivery(c: &mut Criterion) {
    let mut group = c.benchmark_group("progressive/deliver");
    for fanout in [8usize, 32] {
        let fragments = model(fanout);
        group.throughput(Throughput::Elements(fragments.len() as u64));
        for kind in [ManagerKind::Grid, ManagerKind::Queue] {
            let config = DeliveryConfig::default().with_manager_kind(kind);
            group.bench_with_input(
                BenchmarkId::new(format!("{kind:?}").to_lowercase(), fanout),
                &fragments,
                |b, fragments| b.iter(|| black_box(deliver(&config, fragments))),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_delivery);
criterion_main!(benches);
