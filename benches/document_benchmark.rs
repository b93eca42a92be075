// SPDX-License-Identifier: MIT OR Apache-2.0
// Benchmarks: missing_docs - criterion_group! macro generates undocumentable code
#![allow(missing_docs)]
// Benchmarks: clippy lints relaxed for benchmark code (not production)
#![allow(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Benchmarks for the format-preserving document model.
//!
//! Parsing is compared against `serde_json::from_str`, which keeps no
//! comments or layout.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use patchwork_core::PatchOperation;
use patchwork_doc::Document;
use serde_json::{Value, json};
use std::fmt::Write as _;
use std::hint::black_box;

/// A commented settings file with `sections` nested objects.
fn commented_source(sections: usize) -> String {
    let mut out = String::from("// generated settings\n{\n");
    for i in 0..sections {
        let _ = write!(
            out,
            "  // section {i}\n  \"section{i}\": {{\n    \"enabled\": true, // toggle\n    \"level\": {i},\n    \"tags\": [\"a\", \"b\"],\n  }}{}\n",
            if i + 1 == sections { "" } else { "," }
        );
    }
    out.push_str("}\n");
    out
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_parse");

    for sections in [10usize, 100, 1000] {
        let source = commented_source(sections);
        let plain = serde_json::to_string_pretty(&Document::parse_str(&source).unwrap().standardize())
            .unwrap();
        group.throughput(Throughput::Bytes(source.len() as u64));

        group.bench_with_input(BenchmarkId::new("jsonc", sections), &source, |b, src| {
            b.iter(|| Document::parse(black_box(src.as_bytes())));
        });

        group.bench_with_input(BenchmarkId::new("render", sections), &source, |b, src| {
            let doc = Document::parse_str(src).unwrap();
            b.iter(|| black_box(&doc).render());
        });

        // Baseline: serde_json on the same content without comments
        group.bench_with_input(BenchmarkId::new("serde_json", sections), &plain, |b, src| {
            b.iter(|| serde_json::from_str::<Value>(black_box(src)));
        });
    }

    group.finish();
}

fn bench_apply_and_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_apply");

    for sections in [10usize, 100, 1000] {
        let doc = Document::parse_str(&commented_source(sections)).unwrap();
        let ops: Vec<PatchOperation> = (0..sections)
            .step_by(3)
            .flat_map(|i| {
                [
                    PatchOperation::replace(format!("/section{i}/level"), json!(-1)),
                    PatchOperation::add(format!("/section{i}/extra"), json!({"on": true})),
                ]
            })
            .collect();
        group.throughput(Throughput::Elements(ops.len() as u64));

        group.bench_with_input(BenchmarkId::new("apply", sections), &ops, |b, ops| {
            b.iter(|| {
                let mut live = doc.clone();
                live.apply(black_box(ops)).unwrap();
                live
            });
        });

        group.bench_with_input(BenchmarkId::new("format", sections), &doc, |b, doc| {
            b.iter(|| {
                let mut live = doc.clone();
                live.format();
                live
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_apply_and_format);

criterion_main!(benches);
