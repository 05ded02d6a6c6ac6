use criterion::{criterion_group, criterion_main, Criterion};
use rosterpix::{ClassSelector, OutputFormat, Roster, Row, TableRenderer};

/// Twenty classes of forty students each.
fn large_roster() -> Roster {
    let rows = (0..20)
        .flat_map(|c| (0..40).map(move |s| Row::new(format!("{:02}{:03}", c, s), format!("S{}", s), format!("C{:02}", c))))
        .collect();
    Roster::new(rows).expect("generated roster is grouped")
}

fn bench_filter(c: &mut Criterion) {
    let roster = large_roster();
    let selector = ClassSelector::parse("C13");
    c.bench_function("filter_one_class", |b| {
        b.iter(|| roster.filter(&selector).len())
    });
}

fn bench_rasterize(c: &mut Criterion) {
    let roster = large_roster();
    let renderer = TableRenderer::default();
    let class = roster.filter(&ClassSelector::parse("C13"));
    c.bench_function("rasterize_one_class", |b| {
        b.iter(|| renderer.rasterize(class, false))
    });
    c.bench_function("rasterize_all_classes", |b| {
        b.iter(|| renderer.rasterize(roster.rows(), true))
    });
}

fn bench_encode(c: &mut Criterion) {
    let roster = large_roster();
    let class = roster.filter(&ClassSelector::parse("C13"));
    for format in [OutputFormat::Png, OutputFormat::WebP(85)] {
        let renderer = TableRenderer::default().with_format(format);
        c.bench_function(&format!("render_one_class_{}", format.extension()), |b| {
            b.iter(|| renderer.render(class, false).expect("encode"))
        });
    }
}

criterion_group!(benches, bench_filter, bench_rasterize, bench_encode);
criterion_main!(benches);
