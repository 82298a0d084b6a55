use clap::Parser;
use clap::ValueEnum;
use lin_hash::HashMap;
use lin_hash::HashStrategy;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KeyKind {
    /// Random 15-letter lowercase strings.
    Words,
    /// Sequential integers formatted as decimal strings.
    Sequential,
    /// Random u64 values.
    Integers,
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "count", default_value_t = 10_000)]
    count: usize,

    #[arg(short = 'k', long = "keys", value_enum, default_value_t = KeyKind::Words)]
    keys: KeyKind,

    #[arg(short = 's', long = "seed", default_value_t = 0x5eed)]
    seed: u64,

    /// Erase every third key after filling, to show tombstone buildup.
    #[arg(short = 'e', long = "erase")]
    erase: bool,
}

fn print_histogram(hist: &[usize]) {
    let total: usize = hist.iter().sum();
    println!("Probe length histogram:");
    for (distance, &count) in hist.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let pct = count as f64 / total as f64 * 100.0;
        let bar = "#".repeat((pct / 2.0).ceil() as usize);
        println!("  {distance:>4}: {count:>8} ({pct:>6.2}%) {bar}");
    }
}

fn report<K: lin_hash::TableKey>(strategy: HashStrategy, keys: &[K], erase: bool)
where
    K: Clone,
{
    let mut map = HashMap::with_strategy(strategy);
    for (i, key) in keys.iter().enumerate() {
        map.insert(key.clone(), i);
    }
    if erase {
        for key in keys.iter().step_by(3) {
            let _ = map.erase(key);
        }
    }

    println!();
    println!("##### {} #####", strategy.name());
    map.debug_stats().print();
    println!("Tombstones: {}", map.table().tombstones());
    print_histogram(&map.probe_histogram());
}

fn run<K: lin_hash::TableKey + Clone>(keys: Vec<K>, erase: bool) {
    for strategy in HashStrategy::BUILTIN.iter().copied() {
        report(strategy, &keys, erase);
    }
}

fn main() {
    let args = Args::parse();
    let mut rng = SmallRng::seed_from_u64(args.seed);

    println!(
        "Filling one map per strategy with {} {:?} keys",
        args.count, args.keys
    );

    match args.keys {
        KeyKind::Words => {
            let keys = (0..args.count)
                .map(|_| {
                    (0..15)
                        .map(|_| rng.random_range(b'a'..=b'z') as char)
                        .collect::<String>()
                })
                .collect();
            run::<String>(keys, args.erase);
        }
        KeyKind::Sequential => {
            let keys = (0..args.count).map(|i| i.to_string()).collect();
            run::<String>(keys, args.erase);
        }
        KeyKind::Integers => {
            let keys = (0..args.count).map(|_| rng.random::<u64>()).collect();
            run::<u64>(keys, args.erase);
        }
    }
}
