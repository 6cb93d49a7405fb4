//! Forwarding-path benchmarks for `srand`/`rand`.
//!
//! Compares the exported entry point against direct generator access, so the
//! cost of the runtime bridge and dynamic dispatch is visible.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use axshim_abi::host_runtime::HostRuntime;
use axshim_abi::stdlib_abi::{rand, srand};
use axshim_core::runtime::{AxRuntime, Lcg};
use axshim_core::stdlib::rand_via;

fn bench_rand(c: &mut Criterion) {
    let mut group = c.benchmark_group("rand");

    let lcg = Lcg::seeded(1);
    group.bench_function("lcg_next_u32", |b| b.iter(|| black_box(lcg.next_u32())));

    let host = HostRuntime::new();
    host.srand(1);
    group.bench_function("rand_via_static", |b| b.iter(|| black_box(rand_via(&host))));

    let dyn_host: &dyn AxRuntime = &host;
    group.bench_function("rand_via_dyn", |b| b.iter(|| black_box(rand_via(dyn_host))));

    unsafe { srand(1) };
    group.bench_function("abi_rand", |b| b.iter(|| black_box(unsafe { rand() })));

    group.finish();
}

fn bench_srand(c: &mut Criterion) {
    c.bench_function("abi_srand", |b| {
        let mut seed = 0u32;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            unsafe { srand(black_box(seed)) };
        });
    });
}

criterion_group!(benches, bench_rand, bench_srand);
criterion_main!(benches);
