use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use trellis_core::container::{Facade, RegistryBuilder, ResolutionContainer, Tag};

fn bench_resolution(c: &mut Criterion) {
    let registry = RegistryBuilder::new()
        .bind_instance(None, "configured".to_string())
        .bind_factory(None, |_: &Facade, n: u64| Ok(n.wrapping_mul(31)))
        .bind_provider(Tag::str("fresh"), |_: &Facade| Ok(vec![0u8; 64]))
        .build();
    let facade = Facade::new(Arc::new(ResolutionContainer::new(registry)));

    c.bench_function("instance_resolution", |b| {
        b.iter(|| black_box(facade.instance::<String>(None).unwrap()))
    });

    c.bench_function("factory_invocation", |b| {
        let mul = facade.factory::<u64, u64>(None).unwrap();
        b.iter(|| black_box(mul(black_box(7)).unwrap()))
    });

    c.bench_function("provider_invocation", |b| {
        let fresh = facade.provider::<Vec<u8>>(Tag::str("fresh")).unwrap();
        b.iter(|| black_box(fresh().unwrap()))
    });

    c.bench_function("miss_or_none", |b| {
        b.iter(|| black_box(facade.instance_or_none::<u128>(None).unwrap()))
    });
}

criterion_group!(benches, bench_resolution);
criterion_main!(benches);
