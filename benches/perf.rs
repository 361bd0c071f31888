use chrono::NaiveDate;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use mlb_watchability::digest::build_digest;
use mlb_watchability::fake_feed::synthetic_snapshot;
use mlb_watchability::mlb_fetch::{parse_schedule_json, parse_standings_json};
use mlb_watchability::model::standing_facts;
use mlb_watchability::scorer::{ScoringConfig, score_games};
use mlb_watchability::season::SeasonPhase;

fn bench_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 11).expect("valid date")
}

fn bench_score_slate(c: &mut Criterion) {
    let snapshot = synthetic_snapshot(bench_date(), 2025);
    let facts = standing_facts(&snapshot.standings);
    let cfg = ScoringConfig::for_phase(SeasonPhase::Late);
    c.bench_function("score_slate", |b| {
        b.iter(|| {
            let rows = score_games(black_box(&facts), black_box(&snapshot.schedule), &cfg);
            black_box(rows.len());
        })
    });
}

fn bench_normalize_standings(c: &mut Criterion) {
    let snapshot = synthetic_snapshot(bench_date(), 2025);
    c.bench_function("normalize_standings", |b| {
        b.iter(|| {
            let facts = standing_facts(black_box(&snapshot.standings));
            black_box(facts.len());
        })
    });
}

fn bench_build_digest(c: &mut Criterion) {
    let snapshot = synthetic_snapshot(bench_date(), 2025);
    let facts = standing_facts(&snapshot.standings);
    let rows = score_games(
        &facts,
        &snapshot.schedule,
        &ScoringConfig::for_phase(SeasonPhase::Late),
    );
    c.bench_function("build_digest", |b| {
        b.iter(|| {
            let digest = build_digest(black_box(&rows));
            black_box(digest.len());
        })
    });
}

fn bench_standings_parse(c: &mut Criterion) {
    c.bench_function("standings_parse", |b| {
        b.iter(|| {
            let rows = parse_standings_json(black_box(STANDINGS_JSON)).expect("fixture parses");
            black_box(rows.len());
        })
    });
}

fn bench_schedule_parse(c: &mut Criterion) {
    c.bench_function("schedule_parse", |b| {
        b.iter(|| {
            let rows = parse_schedule_json(black_box(SCHEDULE_JSON)).expect("fixture parses");
            black_box(rows.len());
        })
    });
}

criterion_group!(
    perf,
    bench_score_slate,
    bench_normalize_standings,
    bench_build_digest,
    bench_standings_parse,
    bench_schedule_parse
);
criterion_main!(perf);

static STANDINGS_JSON: &str = include_str!("../tests/fixtures/standings.json");
static SCHEDULE_JSON: &str = include_str!("../tests/fixtures/schedule.json");
