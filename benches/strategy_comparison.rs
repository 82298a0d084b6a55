use core::hash::Hasher;
use core::hint::black_box;

use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::hash_table::Entry as HashbrownEntry;
use hashbrown::hash_table::HashTable as HashbrownHashTable;
use lin_hash::HashMap as LinHashMap;
use lin_hash::HashStrategy;
use rand::Rng;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::distr;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;
use siphasher::sip::SipHasher;

const SIZES: &[usize] = &[
    (1 << 8),
    (1 << 10),
    (1 << 12),
    (1 << 14),
    (1 << 16),
];

#[derive(Clone, Copy)]
enum Operation {
    Insert,
    Find,
    Remove,
}

fn make_key(key: u64) -> String {
    black_box(format!("key_{:016X}", key))
}

fn sip_hash(key: &str) -> u64 {
    let mut hasher = SipHasher::new();
    hasher.write(key.as_bytes());
    hasher.finish()
}

fn strategies() -> impl Iterator<Item = HashStrategy> {
    HashStrategy::BUILTIN.iter().copied()
}

fn random_keys(count: usize) -> Vec<String> {
    let mut rng = OsRng;
    (0..count)
        .map(|_| make_key(rng.try_next_u64().unwrap()))
        .collect()
}

fn bench_insert_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_random");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = random_keys(size);
        group.throughput(Throughput::Elements(size as u64));

        for strategy in strategies() {
            group.bench_function(format!("{}/{}", strategy.name(), size), |b| {
                b.iter_batched(
                    || {
                        let mut keys = keys.clone();
                        keys.shuffle(&mut SmallRng::from_os_rng());
                        keys
                    },
                    |keys| {
                        let mut map = LinHashMap::with_strategy(strategy);
                        for (i, key) in keys.into_iter().enumerate() {
                            black_box(map.insert(key, i as u64));
                        }
                        black_box(map)
                    },
                    BatchSize::SmallInput,
                )
            });
        }

        group.bench_function(format!("hashbrown/{}", size), |b| {
            b.iter_batched(
                || {
                    let mut keys = keys.clone();
                    keys.shuffle(&mut SmallRng::from_os_rng());
                    keys
                },
                |keys| {
                    let mut table = HashbrownHashTable::with_capacity(0);
                    for (i, key) in keys.into_iter().enumerate() {
                        let hash = sip_hash(&key);
                        match table.entry(
                            hash,
                            |(k, _): &(String, u64)| *k == key,
                            |(k, _)| sip_hash(k),
                        ) {
                            HashbrownEntry::Vacant(entry) => {
                                black_box(entry.insert((key, i as u64)));
                            }
                            HashbrownEntry::Occupied(_) => unreachable!(),
                        }
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_hit_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_hit_miss");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let present = random_keys(size);
        let mut probes = present.clone();
        probes.extend(random_keys(size));
        probes.shuffle(&mut SmallRng::from_os_rng());

        group.throughput(Throughput::Elements(probes.len() as u64));

        for strategy in strategies() {
            let mut map = LinHashMap::with_strategy(strategy);
            for (i, key) in present.iter().enumerate() {
                map.insert(key.clone(), i as u64);
            }

            group.bench_function(format!("{}/{}", strategy.name(), size), |b| {
                b.iter(|| {
                    for key in &probes {
                        black_box(map.get(key.as_str()).ok());
                    }
                })
            });
        }

        let mut table = HashbrownHashTable::with_capacity(0);
        for (i, key) in present.iter().enumerate() {
            let hash = sip_hash(key);
            table.insert_unique(hash, (key.clone(), i as u64), |(k, _)| sip_hash(k));
        }

        group.bench_function(format!("hashbrown/{}", size), |b| {
            b.iter(|| {
                for key in &probes {
                    let hash = sip_hash(key);
                    black_box(table.find(hash, |(k, _): &(String, u64)| k == key));
                }
            })
        });
    }

    group.finish();
}

fn bench_mixed_zipf(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_zipf");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    const KEY_SPACE_MULTIPLIER: f32 = 2.0;

    for &size in SIZES {
        let mut rng = SmallRng::from_os_rng();
        let op_count = size * 3;

        let operations = (0..op_count)
            .map(|_| {
                let op_choice: f64 = rng.sample(distr::Uniform::new(0.0, 1.0).unwrap());
                if op_choice < 0.5 {
                    Operation::Find
                } else if op_choice < 0.75 {
                    Operation::Insert
                } else {
                    Operation::Remove
                }
            })
            .collect::<Vec<Operation>>();

        let key_distr = Zipf::new(size as f32 * KEY_SPACE_MULTIPLIER - 1.0, 1.0).unwrap();
        let keys = operations
            .iter()
            .map(|_| make_key(rng.sample(key_distr) as u64))
            .collect::<Vec<String>>();

        group.throughput(Throughput::Elements(op_count as u64));

        for strategy in strategies() {
            group.bench_function(format!("{}/{}", strategy.name(), size), |b| {
                b.iter_batched(
                    || keys.clone(),
                    |keys| {
                        let mut map = LinHashMap::with_strategy(strategy);
                        for (operation, key) in operations.iter().zip(keys) {
                            match operation {
                                Operation::Insert => {
                                    *map.get_mut(key) += 1u64;
                                }
                                Operation::Find => {
                                    black_box(map.get(key.as_str()).ok());
                                }
                                Operation::Remove => {
                                    black_box(map.remove(key.as_str()));
                                }
                            }
                        }
                        black_box(map)
                    },
                    BatchSize::SmallInput,
                )
            });
        }

        group.bench_function(format!("hashbrown/{}", size), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut table: HashbrownHashTable<(String, u64)> =
                        HashbrownHashTable::with_capacity(0);
                    for (operation, key) in operations.iter().zip(keys) {
                        let hash = sip_hash(&key);
                        match operation {
                            Operation::Insert => {
                                match table.entry(hash, |(k, _)| *k == key, |(k, _)| sip_hash(k)) {
                                    HashbrownEntry::Vacant(entry) => {
                                        black_box(entry.insert((key, 1)));
                                    }
                                    HashbrownEntry::Occupied(mut occupied) => {
                                        occupied.get_mut().1 += 1;
                                    }
                                }
                            }
                            Operation::Find => {
                                black_box(table.find(hash, |(k, _)| *k == key));
                            }
                            Operation::Remove => {
                                if let Ok(occupied) = table.find_entry(hash, |(k, _)| *k == key) {
                                    black_box(occupied.remove());
                                }
                            }
                        }
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let initial = random_keys(size);
        let replacements = random_keys(size / 3);
        group.throughput(Throughput::Elements((size / 3 * 2) as u64));

        for strategy in strategies() {
            group.bench_function(format!("{}/{}", strategy.name(), size), |b| {
                b.iter_batched(
                    || {
                        let mut map = LinHashMap::with_strategy(strategy);
                        for (i, key) in initial.iter().enumerate() {
                            map.insert(key.clone(), i as u64);
                        }
                        (map, replacements.clone())
                    },
                    |(mut map, replacements)| {
                        for key in &initial[..size / 3] {
                            black_box(map.erase(key.as_str()).ok());
                        }
                        for (i, key) in replacements.into_iter().enumerate() {
                            black_box(map.insert(key, i as u64));
                        }
                        black_box(map)
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_random,
    bench_find_hit_miss,
    bench_mixed_zipf,
    bench_churn,
);

criterion_main!(benches);
