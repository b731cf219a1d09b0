//! kvbench Binary
//!
//! Runs the benchmark workload against a backend, or converts keys
//! between digit text and binary form.

use clap::{Parser, Subcommand, ValueEnum};
use kvbench::codec;
use kvbench::store::{self, DbInterface};
use kvbench::{BackendKind, Benchmark, Config, KvError};
use tracing_subscriber::{fmt, EnvFilter};

/// kvbench
#[derive(Parser, Debug)]
#[command(name = "kvbench")]
#[command(about = "Key-value store benchmark and key codec")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the benchmark workload
    Run {
        /// Backend to exercise
        #[arg(short, long, value_enum, default_value = "memory")]
        backend: Backend,

        /// Data directory
        #[arg(short, long, default_value = "./kvbench_data")]
        data_dir: String,

        /// Number of keys
        #[arg(short, long, default_value = "100000")]
        keys: u64,

        /// Value size in bytes
        #[arg(short = 'v', long, default_value = "100")]
        value_size: usize,

        /// Fraction of keys deleted and rewritten
        #[arg(long, default_value = "0.1")]
        delete_ratio: f64,

        /// fsync every write
        #[arg(short, long)]
        sync: bool,

        /// RNG seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Convert keys
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
}

#[derive(Subcommand, Debug)]
enum KeyAction {
    /// Digit text to hex of the 8-byte big-endian key
    Encode {
        /// Decimal digits
        digits: String,
    },

    /// Hex of a binary key back to digit text
    Decode {
        /// 16 hex characters
        hex: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Backend {
    Memory,
    Log,
}

impl From<Backend> for BackendKind {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Memory => BackendKind::Memory,
            Backend::Log => BackendKind::Log,
        }
    }
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kvbench=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let outcome = match args.command {
        Commands::Run {
            backend,
            data_dir,
            keys,
            value_size,
            delete_ratio,
            sync,
            seed,
        } => {
            let mut builder = Config::builder()
                .backend(backend.into())
                .data_dir(&data_dir)
                .key_count(keys)
                .value_size(value_size)
                .delete_ratio(delete_ratio)
                .sync_writes(sync);
            if let Some(seed) = seed {
                builder = builder.seed(seed);
            }
            run_benchmark(builder.build())
        }
        Commands::Key { action } => convert_key(action),
    };

    if let Err(e) = outcome {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run_benchmark(config: Config) -> kvbench::Result<()> {
    tracing::info!("kvbench v{}", kvbench::VERSION);
    tracing::info!("Backend: {:?}", config.backend);
    tracing::info!("Data directory: {}", config.data_dir.display());

    let benchmark = Benchmark::new(&config)?;
    let mut db: Box<dyn DbInterface> = store::new_store(&config);

    let report = store::scoped(db.as_mut(), &config.data_dir, config.sync_writes, |db| {
        benchmark.run(db)
    })?;

    println!("{}", report.stats);
    println!("{:<30}{}", "entries:", report.entries);
    Ok(())
}

fn convert_key(action: KeyAction) -> kvbench::Result<()> {
    let converted = match action {
        KeyAction::Encode { digits } => encode_key(&digits)?,
        KeyAction::Decode { hex: text } => decode_key(&text)?,
    };
    println!("{}", converted);
    Ok(())
}

/// Digit text to the hex form of its binary key
fn encode_key(digits: &str) -> kvbench::Result<String> {
    Ok(hex::encode(codec::digits_to_binary(digits)?))
}

/// Hex form of a binary key back to digit text
fn decode_key(text: &str) -> kvbench::Result<String> {
    let text = text.trim();
    let bytes = hex::decode(text).map_err(|e| KvError::Parse {
        input: text.to_string(),
        reason: e.to_string(),
    })?;
    codec::binary_to_digits(&bytes)
}
