//! Benchmarks for slate pricing

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use prop_edge::config::Config;
use prop_edge::context::ContextSignals;
use prop_edge::market::{MarketKind, Prior, Quote};
use prop_edge::parlay::ParlayBuilder;
use prop_edge::pricing::SlatePricer;

fn slate(size: usize) -> (Vec<Quote>, Vec<Prior>, ContextSignals) {
    let mut quotes = Vec::with_capacity(size);
    let mut priors = Vec::with_capacity(size);
    let mut ctx = ContextSignals::new();
    ctx.set_pace("KC", 1.03);
    ctx.flag_top10_pressure("BUF");
    ctx.set_matchup("BUF@KC", "KC", "BUF");

    for i in 0..size {
        let player = format!("Player {}", i);
        let mean = 40.0 + (i % 50) as f64;
        quotes.push(Quote::over_under(
            "BUF@KC",
            player.as_str(),
            "KC",
            MarketKind::ReceivingYards,
            mean - 2.5 + (i % 7) as f64,
            Some(-115.0),
            Some(-105.0),
        ));
        priors.push(Prior::new(player, "KC", MarketKind::ReceivingYards, Some(mean), Some(18.0)));
    }

    (quotes, priors, ctx)
}

fn benchmark_price_slate(c: &mut Criterion) {
    let config = Config::default();
    let pricer = SlatePricer::new(&config);
    let (quotes, priors, ctx) = slate(500);

    c.bench_function("price_slate_500", |b| {
        b.iter(|| pricer.price_slate(black_box(&quotes), black_box(&priors), black_box(&ctx)))
    });
}

fn benchmark_price_parallel(c: &mut Criterion) {
    let config = Config::default();
    let pricer = SlatePricer::new(&config);
    let (quotes, priors, ctx) = slate(500);

    c.bench_function("price_parallel_500x4", |b| {
        b.iter(|| pricer.price_parallel(black_box(&quotes), black_box(&priors), black_box(&ctx), 4))
    });
}

fn benchmark_parlays(c: &mut Criterion) {
    let config = Config::default();
    let (quotes, priors, ctx) = slate(500);
    let report = SlatePricer::new(&config).price_slate(&quotes, &priors, &ctx);
    let builder = ParlayBuilder::new(&config.parlays);

    c.bench_function("build_parlays_500", |b| {
        b.iter(|| builder.build(black_box(&report.opportunities)))
    });
}

criterion_group!(
    benches,
    benchmark_price_slate,
    benchmark_price_parallel,
    benchmark_parlays
);
criterion_main!(benches);
