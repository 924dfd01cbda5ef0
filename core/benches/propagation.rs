use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use sapper_core::*;

fn bench_full_sweep(c: &mut Criterion) {
    let config = GridConfig::new((16, 16), 32).unwrap();
    let field = RandomLayoutGenerator::new(0x5eed).generate(config);

    c.bench_function("record_all_safe_cells_16x16", |b| {
        b.iter(|| {
            let mut agent = Agent::new(config, 1);
            for row in 0..16 {
                for col in 0..16 {
                    let cell = (row, col);
                    if !field.contains_hazard(cell) {
                        agent.record(cell, field.neighbor_hazard_count(cell)).unwrap();
                    }
                }
            }
            black_box(agent.knowledge().stats())
        })
    });

    c.bench_function("session_run_16x16", |b| {
        b.iter(|| {
            let mut session = Session::new(field.clone(), 7);
            black_box(session.run().unwrap())
        })
    });
}

criterion_group!(benches, bench_full_sweep);
criterion_main!(benches);
