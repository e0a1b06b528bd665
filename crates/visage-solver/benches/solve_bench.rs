// ─────────────────────────────────────────────────────────────────────
// Visage Rig Engine — Solver Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks for definition parsing and the per-tick solve.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use visage_solver::Rig;

/// A mid-size rig: paired sliders, a min-combo per pair, and one
/// floater, in the v2 schema.
fn rig_definition(slider_pairs: usize) -> String {
    let mut shapes = vec![r#"{"name": "rest"}"#.to_string()];
    let mut progs = Vec::new();
    let mut sliders = Vec::new();
    let mut combos = Vec::new();

    for i in 0..slider_pairs {
        for side in ["a", "b"] {
            let shape_idx = shapes.len();
            shapes.push(format!(r#"{{"name": "s{i}{side}"}}"#));
            let prog_idx = progs.len();
            progs.push(format!(
                r#"{{"name": "p{i}{side}", "pairs": [[0, 0.0], [{shape_idx}, 1.0]], "interp": "linear"}}"#
            ));
            sliders.push(format!(r#"{{"name": "in{i}{side}", "prog": {prog_idx}}}"#));
        }
        let shape_idx = shapes.len();
        shapes.push(format!(r#"{{"name": "c{i}"}}"#));
        let prog_idx = progs.len();
        progs.push(format!(
            r#"{{"name": "pc{i}", "pairs": [[0, 0.0], [{shape_idx}, 1.0]], "interp": "linear"}}"#
        ));
        let sa = 2 * i;
        let sb = 2 * i + 1;
        combos.push(format!(
            r#"{{"name": "cmb{i}", "prog": {prog_idx}, "pairs": [[{sa}, 1.0], [{sb}, 1.0]], "solveType": "min"}}"#
        ));
    }

    // One floater over the first slider pair.
    let shape_idx = shapes.len();
    shapes.push(r#"{"name": "float0"}"#.to_string());
    let prog_idx = progs.len();
    progs.push(format!(
        r#"{{"name": "pf", "pairs": [[0, 0.0], [{shape_idx}, 1.0]], "interp": "linear"}}"#
    ));
    combos.push(format!(
        r#"{{"name": "flt0", "prog": {prog_idx}, "pairs": [[0, 0.5], [1, 0.5]]}}"#
    ));

    format!(
        r#"{{"encodingVersion": 2, "shapes": [{}], "progressions": [{}], "sliders": [{}], "combos": [{}]}}"#,
        shapes.join(", "),
        progs.join(", "),
        sliders.join(", "),
        combos.join(", ")
    )
}

fn bench_parse(c: &mut Criterion) {
    let doc = rig_definition(24);
    c.bench_function("parse_24_pairs", |b| {
        b.iter(|| {
            let mut rig = Rig::new();
            rig.parse(black_box(&doc)).unwrap();
            rig
        })
    });
}

fn bench_build(c: &mut Criterion) {
    let doc = rig_definition(24);
    c.bench_function("build_24_pairs", |b| {
        b.iter(|| {
            let mut rig = Rig::new();
            rig.parse(black_box(&doc)).unwrap();
            rig.build();
            rig
        })
    });
}

fn bench_solve(c: &mut Criterion) {
    let doc = rig_definition(24);
    let mut rig = Rig::new();
    rig.parse(&doc).unwrap();
    rig.build();
    let input: Vec<f64> = (0..rig.slider_count())
        .map(|i| 0.1 + 0.8 * ((i % 7) as f64) / 7.0)
        .collect();
    c.bench_function("solve_24_pairs", |b| {
        b.iter(|| rig.solve(black_box(&input)))
    });
}

fn bench_solve_floater_active(c: &mut Criterion) {
    let doc = rig_definition(4);
    let mut rig = Rig::new();
    rig.parse(&doc).unwrap();
    rig.build();
    let mut input = vec![0.0; rig.slider_count()];
    input[0] = 0.5;
    input[1] = 0.5;
    c.bench_function("solve_floater_active", |b| {
        b.iter(|| rig.solve(black_box(&input)))
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_build,
    bench_solve,
    bench_solve_floater_active,
);
criterion_main!(benches);
