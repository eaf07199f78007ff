//! Command line front end: load a rule file, then answer packet queries, one verdict per line.
use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::PathBuf,
};

use clap::{ArgAction, Parser};
use rangewall_core::{error::Result, record::RuleRecord};
use rangewall_io::{open_rules, QueryParser, ReaderConfig, RecordReader};
use rangewall_table::{DispatchTable, PacketFilter, TableConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rwall")]
#[command(about = "Answers packet queries against a list of range rules", long_about = None)]
pub struct Cli {
    /// Rule file, one `direction,protocol,port_spec,addr_spec` per line
    #[arg(short, long, value_name = "FILE")]
    pub rules: PathBuf,

    /// Query file, one `direction,protocol,port,address` per line (stdin if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub queries: Option<PathBuf>,

    /// Keep rules with inverted ranges instead of failing; they never match
    #[arg(long)]
    pub allow_inverted: bool,

    /// Do not treat lines starting with '#' as comments
    #[arg(long)]
    pub no_comments: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn reader_config(&self) -> ReaderConfig {
        ReaderConfig {
            comment_prefix: if self.no_comments { None } else { Some('#') },
            ..ReaderConfig::default()
        }
    }

    pub fn table_config(&self) -> TableConfig {
        TableConfig {
            allow_inverted: self.allow_inverted,
        }
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over the verbosity flag.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Loads `rules`, then writes `true`/`false` to `out` for every query read from `queries`.
/// Returns the number of queries answered.
pub fn answer<I, Q, W>(
    rules: I,
    queries: Q,
    out: &mut W,
    reader: ReaderConfig,
    table: TableConfig,
) -> Result<usize>
where
    I: IntoIterator<Item = Result<RuleRecord>>,
    Q: BufRead,
    W: Write,
{
    let table = DispatchTable::build(rules, table)?;
    let mut answered = 0;
    for query in RecordReader::with_config(queries, QueryParser, reader) {
        writeln!(out, "{}", table.accept(&query?))?;
        answered += 1;
    }
    tracing::info!(answered, "queries answered");
    Ok(answered)
}

pub fn run(cli: &Cli) -> Result<usize> {
    let rules = open_rules(&cli.rules, cli.reader_config())?;
    let mut out = BufWriter::new(io::stdout().lock());
    let answered = match &cli.queries {
        Some(path) => answer(
            rules,
            BufReader::new(File::open(path)?),
            &mut out,
            cli.reader_config(),
            cli.table_config(),
        )?,
        None => answer(
            rules,
            io::stdin().lock(),
            &mut out,
            cli.reader_config(),
            cli.table_config(),
        )?,
    };
    out.flush()?;
    Ok(answered)
}
