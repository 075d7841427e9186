use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use markdown2_rs::options::{ConversionOptions, TocOptions};
use markdown2_rs::Converter;

fn generate_markdown(num_sections: usize) -> String {
    let mut out = String::new();
    for i in 0..num_sections {
        out.push_str(&format!("## Section {i}\n\n"));
        out.push_str(&format!(
            "This is a paragraph with *emphasis*, **strong text**, and a [link](https://example.com/{i}).\n\n"
        ));
        out.push_str("- one\n- two\n- three\n\n");
        out.push_str("```rust\nlet x = 1;\n```\n\n");
        out.push_str("> a blockquote\n> spanning two lines\n\n");
    }
    out
}

fn bench_plain_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("plain-conversion");
    let sizes = [("small", 5), ("medium", 50), ("large", 400)];

    let converter = Converter::new(ConversionOptions::default()).unwrap();
    for (label, count) in &sizes {
        let text = generate_markdown(*count);
        group.bench_with_input(BenchmarkId::new("convert", label), &text, |b, t| {
            b.iter(|| converter.convert(black_box(t)))
        });
    }
    group.finish();
}

fn bench_with_extras(c: &mut Criterion) {
    let mut group = c.benchmark_group("extras-conversion");

    let mut opts = ConversionOptions::default();
    opts.extras.tables = true;
    opts.extras.strike = true;
    opts.extras.smarty_pants = true;
    opts.extras.fenced_code_blocks = Some(Default::default());
    opts.extras.footnotes = true;
    opts.extras.toc = Some(TocOptions::default());
    let converter = Converter::new(opts).unwrap();

    let text = generate_markdown(100);
    group.bench_function("convert/100_sections_all_extras", |b| b.iter(|| converter.convert(black_box(&text))));

    group.finish();
}

fn bench_hash_registry(c: &mut Criterion) {
    use markdown2_rs::hash::HashRegistry;

    let mut group = c.benchmark_group("hash-registry");
    group.bench_function("store/1000_fragments", |b| {
        b.iter(|| {
            let mut registry = HashRegistry::new();
            for i in 0..1000 {
                registry.store(black_box(&format!("<div>fragment {i}</div>")));
            }
            registry
        })
    });
    group.finish();
}

criterion_group!(benches, bench_plain_conversion, bench_with_extras, bench_hash_registry);
criterion_main!(benches);
