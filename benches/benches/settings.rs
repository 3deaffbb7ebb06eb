// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_settings`.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::cell::Cell;
use std::rc::Rc;
use std::vec::Vec;

use understory_settings::{GroupIndex, Property, Settings};

struct Counter {
    name: &'static str,
    value: Cell<u32>,
}

impl Property for Counter {
    fn name(&self) -> &str {
        self.name
    }
}

fn properties(count: usize) -> Vec<Rc<Counter>> {
    (0..count)
        .map(|_| {
            Rc::new(Counter {
                name: "counter",
                value: Cell::new(0),
            })
        })
        .collect()
}

/// Builds `groups` groups, each with `per_group` settings in its default
/// section and the same settings again in an explicit section.
fn populate(settings: &mut Settings, props: &[Rc<Counter>], groups: usize, per_group: usize) {
    for g in 0..groups {
        let group = settings.add_group(format!("group-{g}"));
        let targets: Vec<_> = props.iter().skip(g * per_group).take(per_group).cloned().collect();
        // Fill the default section first so it never has to be inserted in
        // front of (and shift) the explicit sections.
        for p in &targets {
            settings.add_setting(p, group);
        }
        let advanced = settings.add_section(group, "advanced");
        settings.add_section(group, "expert");
        for p in &targets {
            settings.add_setting_to_section(p, advanced);
        }
        settings.set_group_reset_function(group, move || {
            for t in &targets {
                t.value.set(0);
            }
        });
    }
}

fn bench_settings(c: &mut Criterion) {
    let mut group = c.benchmark_group("settings/build");
    for &groups in &[8_usize, 64] {
        let per_group = 16;
        let props = properties(groups * per_group);
        group.bench_function(BenchmarkId::new("populate", groups), |b| {
            b.iter_batched(
                Settings::new,
                |mut settings| {
                    populate(&mut settings, &props, groups, per_group);
                    black_box(settings)
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();

    let mut group = c.benchmark_group("settings/query");
    let props = properties(64 * 16);
    let mut settings = Settings::new();
    populate(&mut settings, &props, 64, 16);

    group.bench_function("find_group", |b| {
        b.iter(|| black_box(settings.find_group(black_box("group-63"))));
    });

    group.bench_function("add_group_existing", |b| {
        b.iter_batched_ref(
            || {
                let mut s = Settings::new();
                populate(&mut s, &props, 64, 0);
                s
            },
            |s| black_box(s.add_group("group-63")),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("walk_properties", |b| {
        b.iter(|| {
            let mut live = 0_usize;
            for g in settings.groups() {
                for s in settings.sections(g) {
                    for setting in settings.settings(s) {
                        live += usize::from(settings.property(setting).is_some());
                    }
                }
            }
            black_box(live)
        });
    });

    group.bench_function("reset_all", |b| {
        b.iter(|| settings.reset_all());
    });

    group.bench_function("reset_group", |b| {
        b.iter(|| settings.reset_group(black_box(GroupIndex::new(0))));
    });
    group.finish();
}

criterion_group!(benches, bench_settings);
criterion_main!(benches);
