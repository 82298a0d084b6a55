use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use clap::ValueEnum;
use lin_hash::HashStrategy;
use lin_hash::word_count::WordCounter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Strategy {
    Adler32,
    Djb2,
    Sdbm,
    Foldhash,
}

impl From<Strategy> for HashStrategy {
    fn from(value: Strategy) -> Self {
        match value {
            Strategy::Adler32 => HashStrategy::Adler32,
            Strategy::Djb2 => HashStrategy::Djb2,
            Strategy::Sdbm => HashStrategy::Sdbm,
            Strategy::Foldhash => HashStrategy::Foldhash,
        }
    }
}

/// Count word frequencies in a text file.
///
/// Writes one "<count> <word>" line per distinct word, most frequent first.
#[derive(Parser, Debug)]
struct Args {
    /// Text file to read.
    input: PathBuf,

    /// File the report is written to.
    output: PathBuf,

    #[arg(short = 's', long = "strategy", value_enum, default_value_t = Strategy::Adler32)]
    strategy: Strategy,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let mut counter = WordCounter::with_strategy(args.strategy.into());
    counter.add_reader(BufReader::new(File::open(&args.input)?))?;

    let mut out = BufWriter::new(File::create(&args.output)?);
    write!(out, "{}", counter.report())?;
    out.flush()?;

    eprintln!(
        "{} words, {} distinct, written to {}",
        counter.total(),
        counter.distinct(),
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_strategy_is_selectable() {
        for strategy in HashStrategy::BUILTIN {
            let parsed = Strategy::from_str(strategy.name(), true).unwrap();
            assert_eq!(HashStrategy::from(parsed).name(), strategy.name());
        }
    }
}
