//! Benchmarks for utterance parsing.
//!
//! Parsing sits between the confirmation prompt and the wallet round trip, so
//! it must stay well under a millisecond per utterance. The p95 assertion at
//! the end uses a 100us target.

use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use voxpay_action::IntentParser;

/// Utterances shaped like recogniser output, covering every parse path.
fn generate_utterance(index: usize) -> String {
    match index % 6 {
        0 => format!("send {} to 0x{:040x}", index % 50, index),
        1 => format!("please transfer {}.5 DEV over to 0x{:040x} right now", index % 9, index),
        2 => format!("send twenty five to 0x{:040x}", index),
        3 => "check balance".to_string(),
        4 => format!("check   balance of 0x{:040x}", index),
        _ => format!("what time is it in room {}", index),
    }
}

fn bench_parse(c: &mut Criterion) {
    let parser = IntentParser::new();
    let utterances: Vec<String> = (0..1000).map(generate_utterance).collect();

    let mut group = c.benchmark_group("intent_parse");
    group.sample_size(200);
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("mixed_single", |b| {
        let mut idx = 0usize;
        b.iter(|| {
            let command = parser.parse(&utterances[idx % utterances.len()]);
            idx += 1;
            command
        });
    });

    group.bench_function("transfer_digits", |b| {
        b.iter(|| parser.parse("send 2 to 0x1111111111111111111111111111111111111111"));
    });

    group.bench_function("invalid", |b| {
        b.iter(|| parser.parse("what time is it"));
    });

    group.finish();
}

/// Explicit p95 latency assertion over 1000 mixed utterances.
fn bench_parse_latency_assertion(_c: &mut Criterion) {
    let parser = IntentParser::new();
    let utterances: Vec<String> = (0..1000).map(generate_utterance).collect();
    let target = Duration::from_micros(100);

    let mut times = Vec::with_capacity(utterances.len());
    for utterance in &utterances {
        let start = std::time::Instant::now();
        let _command = parser.parse(utterance);
        times.push(start.elapsed());
    }

    times.sort();
    let p95 = times[949];
    let median = times[499];

    eprintln!("\n=== Intent parse latency (1000 utterances) ===");
    eprintln!("Median:  {:?}", median);
    eprintln!("p95:     {:?} (target: {:?})", p95, target);

    assert!(
        p95 < target,
        "Intent parse p95 {:?} exceeds target {:?}",
        p95,
        target
    );
}

criterion_group!(benches, bench_parse, bench_parse_latency_assertion);
criterion_main!(benches);
