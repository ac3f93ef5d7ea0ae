// ABOUTME: Criterion benchmarks for the settings engine hot paths
// ABOUTME: Measures value encoding, edit buffering and batch commits against the in-memory table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for the settings engine.
//!
//! Encoding and buffering run on every keystroke of the dashboard; commit
//! measures the per-key fan-out with the in-memory table.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use clinic_admin::settings::{
    BatchPersister, ChangeTracker, CommitOptions, Diff, SettingRow, SettingType, SettingsStore,
    ValueRenderer,
};
use clinic_admin::test_utils::MemoryTable;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

/// Rows cycling through every setting type
fn generate_rows(count: usize) -> Vec<SettingRow> {
    (0..count)
        .map(|i| {
            let setting_type = SettingType::ALL[i % SettingType::ALL.len()];
            let value = match setting_type {
                SettingType::Number => "10",
                SettingType::Boolean => "true",
                SettingType::Color => "#000000",
                _ => "",
            };
            SettingRow::new(
                &format!("bench.key_{i}"),
                &format!("Key {i}"),
                &format!("category_{}", i % 8),
                setting_type,
                value,
            )
        })
        .collect()
}

/// Raw edit that differs from the generated baseline
fn edit_for(setting_type: SettingType, i: usize) -> String {
    match setting_type {
        SettingType::Number => format!("{}.50", i + 11),
        SettingType::Boolean => "off".to_owned(),
        SettingType::Color => "#AbC".to_owned(),
        _ => format!("value {i}"),
    }
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for setting_type in SettingType::ALL {
        let renderer = ValueRenderer::for_type(setting_type, Some("0"));
        let raw = edit_for(setting_type, 1);
        group.bench_with_input(
            BenchmarkId::new("type", setting_type.as_str()),
            &raw,
            |b, raw| b.iter(|| renderer.encode(black_box("bench.key"), black_box(raw))),
        );
    }

    group.finish();
}

#[allow(clippy::cast_possible_truncation)]
fn bench_set_edit(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("set_edit");

    for count in [10_usize, 100, 1_000] {
        let rows = generate_rows(count);
        let edits: Vec<(String, String)> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let setting_type = SettingType::parse(&row.setting_type).unwrap();
                (row.key.clone(), edit_for(setting_type, i))
            })
            .collect();
        let store = Arc::new(SettingsStore::new(
            Arc::new(MemoryTable::new(rows)),
            Duration::from_secs(5),
        ));
        rt.block_on(store.load()).unwrap();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("keys", count), &edits, |b, edits| {
            b.iter(|| {
                let mut tracker = ChangeTracker::new(Arc::clone(&store));
                for (key, raw) in edits {
                    tracker.set_edit(key, raw).unwrap();
                }
                black_box(tracker.diff().len())
            });
        });
    }

    group.finish();
}

#[allow(clippy::cast_possible_truncation)]
fn bench_commit(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("commit");

    for count in [10_usize, 100] {
        let rows = generate_rows(count);
        let diff: Diff = rows
            .iter()
            .map(|row| (row.key.clone(), "x".to_owned()))
            .collect();
        let persister = BatchPersister::new(
            Arc::new(MemoryTable::new(rows)),
            CommitOptions::default(),
        );

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("keys", count), &diff, |b, diff| {
            b.iter(|| rt.block_on(persister.commit(black_box(diff))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_set_edit, bench_commit);
criterion_main!(benches);
