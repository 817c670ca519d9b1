//! Pipeline throughput: parse, convert and band-validate, alone and as a parallel batch.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use statcard::conversion::bands::validate_output;
use statcard::conversion::engine::convert;
use statcard::conversion::settings::default_settings;
use statcard::data::registry::builtin_registry;
use statcard::parallel::{run_batch, WorkerPool};
use statcard::parser::parse_stat_block;

const DRAGON: &str = "## **Young Red Dragon**
Armor Class 18 (natural armor)
Hit Points 178 (17d10 + 85)
Speed 40 ft., climb 40 ft., fly 80 ft.
Saving Throws Dex +4, Con +9, Wis +4, Cha +8
Challenge 10 (5,900 XP)
***Fire Breath (Recharge 5-6).*** The dragon exhales fire in a 30-foot cone.
Bite. Melee Weapon Attack: +10 to hit, reach 10 ft., one target. Hit: 17 (2d10 + 6) piercing damage.
Claw. Melee Weapon Attack: +10 to hit, reach 5 ft., one target. Hit: 13 (2d6 + 6) slashing damage.";

const GOBLIN: &str =
    "Goblin\nAC 15\nHP 7\nSpeed 30 ft.\nMelee Attack: Scimitar +4 to hit, 1d6+2 slashing damage";

fn bench_single(c: &mut Criterion) {
    let settings = default_settings();
    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Elements(1));

    group.bench_function("parse_5e_block", |b| {
        b.iter(|| parse_stat_block(black_box(DRAGON), None))
    });

    let parsed = parse_stat_block(DRAGON, None).data;
    group.bench_function("convert", |b| {
        b.iter(|| convert(black_box(&parsed), black_box(&settings)))
    });

    let output = convert(&parsed, &settings);
    group.bench_function("validate_bands", |b| {
        b.iter(|| validate_output(black_box(&output), builtin_registry()))
    });

    group.bench_function("parse_convert_validate", |b| {
        b.iter(|| {
            let parsed = parse_stat_block(black_box(GOBLIN), None);
            let output = convert(&parsed.data, &settings);
            validate_output(&output, builtin_registry())
        })
    });
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let settings = default_settings();
    let blocks: Vec<String> = (0..256)
        .map(|i| if i % 2 == 0 { DRAGON } else { GOBLIN }.to_string())
        .collect();

    let mut group = c.benchmark_group("batch");
    group.sample_size(20);
    group.throughput(Throughput::Elements(blocks.len() as u64));

    for workers in [1usize, 4] {
        let pool = WorkerPool::with_workers(workers);
        group.bench_function(format!("blocks_256_workers_{workers}"), |b| {
            b.iter_batched(
                || blocks.clone(),
                |blocks| run_batch(&blocks, None, &settings, builtin_registry(), &pool),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single, bench_batch);
criterion_main!(benches);
