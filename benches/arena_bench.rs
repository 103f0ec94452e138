use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use rand::{thread_rng, Rng};

use ordtree::utils::arena::{Arena, NodeId, Slot};

struct Cell(Option<usize>);

impl Slot for Cell {
    fn vacant() -> Self {
        Cell(None)
    }
}

// A workload where items are added and, one time in five, an item from somewhere in the middle is
// released, the way a tree's nodes come and go under mixed inserts and deletes.
pub fn arena_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("arena_churn");
    group.throughput(Throughput::Elements(1));
    group.bench_function("add_free", |b| {
        let mut arena = Arena::<Cell>::new();
        let mut live: Vec<NodeId> = Vec::new();
        let mut rng = thread_rng();

        b.iter(|| {
            live.push(arena.add(Cell(Some(123))));
            if rng.gen_range(0..5) == 0 {
                let idx = rng.gen_range(0..live.len());
                let id = live.swap_remove(idx);
                criterion::black_box(arena.free(id).0);
            }
        });
    });
    group.finish();
}

criterion_group!(arena_benches, arena_churn);
criterion_main!(arena_benches);
