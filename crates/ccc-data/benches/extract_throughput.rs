use ccc_data::{extract_from_str, summary_from_str};
use criterion::{criterion_group, criterion_main, Criterion};

fn export_text(rows: usize) -> String {
    let mut text = String::from(
        "Magnicon CCC bvd export\nstart date: 03/02/2026\nstart time: 11:27:04\n\
         stop date: 03/02/2026\nstop time: 11:58:40\nR1 Info:  R100\nR2 Info:  R1\n\
         R1 (Ohm): 100\nbvd averages: 30\nR2 (Ohm): 1\nN1 (Turns): 2000\nN2 (Turns): 20\n\
         NA (Turns): 1\ndelta N1/NA (mTurns): 0.5\ndelta (I2*R2) (V): 1.0\n\n",
    );
    for idx in 0..rows {
        text.push_str(&format!("{idx}\t11:28:00\t1.1e-6\t5.0e-9\n"));
    }
    text.push_str("avg\t--\t1.234e-6\t5.6e-9\n");
    text
}

fn bench_extract(c: &mut Criterion) {
    let text = export_text(2_000);

    c.bench_function("extract_label", |b| {
        b.iter(|| {
            let _ = extract_from_str(&text, "delta (I2*R2) (V)", ":").unwrap();
        })
    });
    c.bench_function("extract_summary", |b| {
        b.iter(|| {
            let _ = summary_from_str(&text).unwrap();
        })
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
