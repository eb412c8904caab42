//! Reader throughput on template-heavy and code-heavy input.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use plet_diagnostic::shared_path;
use plet_ir::SymbolTable;
use plet_lexer::{lex, Mode};

fn template_source(n: usize) -> String {
    let mut source = String::new();
    for i in 0..n {
        source.push_str("<li class=\"item\">Some literal text here ");
        source.push_str(&format!("{{item{i}.title | upper}}</li>\n"));
    }
    source
}

fn script_source(n: usize) -> String {
    let mut source = String::new();
    for i in 0..n {
        source.push_str(&format!(
            "x{i} = [1, 2.5, 'str\\n', \"a{{b}}c\"]\nif x{i} != nil then f(x{i}, y => y + 1) end\n"
        ));
    }
    source
}

fn bench_reader(c: &mut Criterion) {
    let file = shared_path("bench.html");
    let mut group = c.benchmark_group("reader");

    let template = template_source(1000);
    group.throughput(Throughput::Bytes(template.len() as u64));
    group.bench_function("template", |b| {
        let symbols = SymbolTable::new();
        b.iter(|| lex(black_box(template.as_bytes()), &file, &symbols, Mode::Template));
    });

    let script = script_source(1000);
    group.throughput(Throughput::Bytes(script.len() as u64));
    group.bench_function("script", |b| {
        let symbols = SymbolTable::new();
        b.iter(|| lex(black_box(script.as_bytes()), &file, &symbols, Mode::Script));
    });

    group.finish();
}

criterion_group!(benches, bench_reader);
criterion_main!(benches);
