use clap::{Args, Parser, Subcommand, ValueEnum};
use parallel_cipher::{benchmark, run, ChannelBackend, Mode, RunConfig, DEFAULT_SHIFT};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "parallel-cipher")]
#[command(version, about = "Parallel versus sequential line cipher with timing", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shift every line of INPUT forward and write it to OUTPUT
    #[command(alias = "e")]
    Encrypt {
        /// Input text file
        input: PathBuf,

        /// Output text file
        output: PathBuf,

        #[command(flatten)]
        driver: DriverArgs,
    },

    /// Shift every line of INPUT back and write it to OUTPUT
    #[command(alias = "d")]
    Decrypt {
        /// Input text file
        input: PathBuf,

        /// Output text file
        output: PathBuf,

        #[command(flatten)]
        driver: DriverArgs,
    },

    /// Print the longest line of INPUT
    #[command(alias = "l")]
    Longest {
        /// Input text file
        input: PathBuf,

        #[command(flatten)]
        driver: DriverArgs,
    },

    /// Encrypt INPUT once per thread count and write a timing report
    #[command(alias = "b")]
    Bench {
        /// Input text file
        input: PathBuf,

        /// Output text file, overwritten by every run
        output: PathBuf,

        /// Thread counts to time
        #[arg(long, value_delimiter = ',', default_value = "4,8,16,32")]
        threads: Vec<usize>,

        /// Cipher shift
        #[arg(
            long,
            env = "PARALLEL_CIPHER_SHIFT",
            default_value_t = DEFAULT_SHIFT,
            allow_hyphen_values = true
        )]
        shift: i64,

        /// CSV timing report
        #[arg(long, default_value = "execution_times.csv")]
        report: PathBuf,
    },
}

#[derive(Args)]
struct DriverArgs {
    /// Number of worker threads (defaults to the number of CPUs)
    #[arg(short, long, env = "PARALLEL_CIPHER_WORKERS")]
    workers: Option<usize>,

    /// Cipher shift
    #[arg(
        short,
        long,
        env = "PARALLEL_CIPHER_SHIFT",
        default_value_t = DEFAULT_SHIFT,
        allow_hyphen_values = true
    )]
    shift: i64,

    /// Run on the calling thread instead of the worker pool
    #[arg(long)]
    sequential: bool,

    /// Pin worker threads to CPU cores
    #[arg(long)]
    pin: bool,

    /// Channel used to collect per-worker results
    #[arg(long, value_enum, default_value_t = Backend::Flume)]
    channel: Backend,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    Flume,
    Crossbeam,
}

impl From<Backend> for ChannelBackend {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Flume => ChannelBackend::Flume,
            Backend::Crossbeam => ChannelBackend::Crossbeam,
        }
    }
}

impl DriverArgs {
    fn into_config(self, input: PathBuf, mode: Mode) -> RunConfig {
        let mut config = RunConfig::new(input)
            .with_mode(mode)
            .with_shift(self.shift)
            .with_sequential(self.sequential)
            .with_cpu_affinity(self.pin)
            .with_channel_backend(self.channel.into());
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        config
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Encrypt {
            input,
            output,
            driver,
        } => {
            let config = driver.into_config(input, Mode::Encrypt).with_output(output);
            run(&config).map(|outcome| {
                println!(
                    "Encryption with {} threads took: {} ms",
                    outcome.workers,
                    outcome.elapsed.as_millis()
                );
            })
        }

        Commands::Decrypt {
            input,
            output,
            driver,
        } => {
            let config = driver.into_config(input, Mode::Decrypt).with_output(output);
            run(&config).map(|outcome| {
                println!(
                    "Decryption with {} threads took: {} ms",
                    outcome.workers,
                    outcome.elapsed.as_millis()
                );
            })
        }

        Commands::Longest { input, driver } => {
            let config = driver.into_config(input, Mode::Longest);
            run(&config).map(|outcome| match outcome.longest {
                Some(line) => {
                    println!(
                        "Longest line ({} chars, {} threads, {} ms):",
                        line.chars().count(),
                        outcome.workers,
                        outcome.elapsed.as_millis()
                    );
                    println!("{}", line);
                }
                None => println!("Input has no lines"),
            })
        }

        Commands::Bench {
            input,
            output,
            threads,
            shift,
            report,
        } => {
            let config = RunConfig::new(input)
                .with_output(output)
                .with_shift(shift)
                .with_mode(Mode::Encrypt);
            benchmark(&config, &threads).and_then(|timings| {
                for (workers, elapsed) in timings.entries() {
                    println!(
                        "Encryption with {} threads took: {} ms",
                        workers,
                        elapsed.as_millis()
                    );
                }
                timings.save(&report)?;
                println!("Timing report written to {}", report.display());
                Ok(())
            })
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
