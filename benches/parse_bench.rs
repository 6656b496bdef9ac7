use criterion::{criterion_group, criterion_main, Criterion, Throughput};

use mustache_core::{parse_template_str, ParserOptions, VecRender};

fn parse_message(source: &str) {
    let mut render = VecRender::new();
    parse_template_str(source, ParserOptions::default(), &mut render).unwrap();
}

fn parse_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("templates");
    group.throughput(Throughput::Elements(1));

    group.bench_function("nested sections", |b| {
        b.iter(|| {
            parse_message(
                r#"{{#items}}
  * {{name}}: {{#has_tags}}
    tags: {{#tags}}{{.}} {{/tags}}
  {{/has_tags}}{{^has_tags}}
    no tags
  {{/has_tags}}
{{/items}}
"#,
            )
        });
    });

    group.bench_function("partials and parents", |b| {
        b.iter(|| {
            parse_message(
                r#"{{<layout}}
{{$title}}Welcome, {{user.name}}{{/title}}
{{$body}}{{>greeting}}{{/body}}
{{/layout}}"#,
            )
        });
    });

    group.bench_function("flat interpolations", |b| {
        b.iter(|| parse_message("Hello, {{name}}! You have {{count}} new {{{raw_label}}}."));
    });

    group.bench_function("plain text", |b| {
        b.iter(|| parse_message("Hello, world, with no tags at all in this template."));
    });
}

criterion_group!(benches, parse_bench);
criterion_main!(benches);
