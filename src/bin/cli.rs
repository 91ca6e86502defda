//! memline CLI Client
//!
//! Command-line interface for talking to a memcache server.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use memline::{Client, ClientConfig, MemlineError, StoreOptions};
use tracing_subscriber::{fmt, EnvFilter};

/// memline CLI
#[derive(Parser, Debug)]
#[command(name = "memline-cli")]
#[command(about = "CLI for memcache servers (text protocol)")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = memline::config::DEFAULT_SERVER_ADDR)]
    server: String,

    /// Read/write timeout in milliseconds (0 = none)
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Get several keys in one request
    Mget {
        /// The keys to get
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,

        /// Opaque flags stored with the value
        #[arg(short, long, default_value = "0")]
        flags: u32,

        /// Expiration time in seconds (0 = never)
        #[arg(short, long, default_value = "0")]
        exptime: i32,

        /// Do not wait for the server to acknowledge
        #[arg(long)]
        noreply: bool,
    },

    /// Print server statistics
    Stats,

    /// Send a malformed command and print whatever comes back
    Probe,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,memline=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = ClientConfig::builder()
        .server_addr(&args.server)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms)
        .build();

    let mut client = match config.connect() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to connect to {}: {}", args.server, e);
            return ExitCode::FAILURE;
        }
    };

    match run(&mut client, args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_not_found() => {
            eprintln!("{}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(client: &mut Client, command: Commands) -> Result<(), MemlineError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Get { key } => {
            let item = client.get(&key)?;
            print_item(&mut out, &item)?;
        }
        Commands::Mget { keys } => {
            let items = client.get_multi(&keys)?;
            for item in items.values() {
                print_item(&mut out, item)?;
            }
        }
        Commands::Set {
            key,
            value,
            flags,
            exptime,
            noreply,
        } => {
            let options = StoreOptions {
                flags,
                exptime,
                noreply,
            };
            client.set_with(&key, value.as_bytes(), options)?;
            if !noreply {
                writeln!(out, "STORED")?;
            }
        }
        Commands::Stats => client.print_stats(&mut out)?,
        Commands::Probe => {
            let reply = client.send_malformed_command()?;
            writeln!(out, "{}", String::from_utf8_lossy(&reply))?;
        }
    }

    Ok(())
}

fn print_item<W: Write>(out: &mut W, item: &memline::Item) -> io::Result<()> {
    writeln!(
        out,
        "{} (flags={}): {}",
        item.key,
        item.flags,
        String::from_utf8_lossy(&item.value)
    )
}
