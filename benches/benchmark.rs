//! Performance benchmarks for rs-pagetext.
//!
//! Run with: `cargo bench`
//!
//! Benchmarks include:
//! - Small synthetic HTML (~1KB) through the full offline pipeline
//! - The same page with an alternate version to compare against
//! - Real-world HTML files, when present, for realistic performance

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rs_pagetext::{Extractor, Options};
use std::fs;

const SAMPLE_HTML: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Sample Article</title>
    <link rel="amphtml" href="https://example.com/amp/sample">
</head>
<body>
    <nav>
        <a href="/">Home</a>
        <a href="/about">About</a>
    </nav>
    <article>
        <h1>Sample Article Title</h1>
        <h2>Background</h2>
        <p>This is the first paragraph of the article. It contains some meaningful
        content that should survive noise filtering and candidate selection.</p>
        <p>Here is a second paragraph with more content. The extraction should
        preserve the text while removing navigation and other boilerplate.</p>
        <p>A third paragraph ensures we have enough content for meaningful
        benchmarking of the extraction performance.</p>
    </article>
    <aside>
        <h3>Related Articles</h3>
        <ul>
            <li>Related article 1</li>
            <li>Related article 2</li>
        </ul>
    </aside>
    <footer>
        <p>Copyright 2024</p>
    </footer>
</body>
</html>
"#;

const URL: &str = "https://example.com/sample";

fn bench_extract_default(c: &mut Criterion) {
    let Ok(extractor) = Extractor::new(Options::default()) else {
        return;
    };
    c.bench_function("extract_default", |b| {
        b.iter(|| extractor.extract_html(URL, black_box(SAMPLE_HTML), None));
    });
}

fn bench_extract_rules_only(c: &mut Criterion) {
    let options = Options {
        use_readability: false,
        ..Options::default()
    };
    let Ok(extractor) = Extractor::new(options) else {
        return;
    };

    c.bench_function("extract_rules_only", |b| {
        b.iter(|| extractor.extract_html(URL, black_box(SAMPLE_HTML), None));
    });
}

fn bench_extract_with_alternate(c: &mut Criterion) {
    let Ok(extractor) = Extractor::new(Options::default()) else {
        return;
    };
    let alternate = SAMPLE_HTML.replace("<nav>", "<nav hidden>");

    c.bench_function("extract_with_alternate", |b| {
        b.iter(|| extractor.extract_html(URL, black_box(SAMPLE_HTML), Some(black_box(&alternate))));
    });
}

/// Benchmark with real-world HTML files of varying sizes
fn bench_real_world_html(c: &mut Criterion) {
    let html_dir = "../data/html_files";
    let Ok(extractor) = Extractor::new(Options::default()) else {
        return;
    };

    // Try to load sample files of different sizes
    let sample_files = ["0001.html", "0010.html", "0100.html"];

    let mut group = c.benchmark_group("real_world");

    for filename in &sample_files {
        let path = format!("{html_dir}/{filename}");
        if let Ok(html) = fs::read_to_string(&path) {
            let size_kb = html.len() / 1024;
            group.throughput(Throughput::Bytes(html.len() as u64));
            group.bench_with_input(
                BenchmarkId::new("extract", format!("{filename} ({size_kb}KB)")),
                &html,
                |b, html| {
                    b.iter(|| extractor.extract_html(URL, black_box(html), None));
                },
            );
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_extract_default,
    bench_extract_rules_only,
    bench_extract_with_alternate,
    bench_real_world_html
);
criterion_main!(benches);
