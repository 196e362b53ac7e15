//! hsclient CLI
//!
//! Command-line cache operations against a HandlerSocket-speaking server.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use hsclient::{CacheStore, Config, ConnectionPool, HandlerSocket, TableCache};

/// hsclient CLI
#[derive(Parser, Debug)]
#[command(name = "hs-cli")]
#[command(about = "Cache operations over the HandlerSocket protocol")]
#[command(version)]
struct Args {
    /// Read endpoint (host:port)
    #[arg(long, default_value = "localhost:9998")]
    read: String,

    /// Write endpoint (host:port)
    #[arg(long, default_value = "localhost:9999")]
    write: String,

    /// Shared secret for the read endpoint
    #[arg(long)]
    read_secret: Option<String>,

    /// Shared secret for the write endpoint
    #[arg(long)]
    write_secret: Option<String>,

    /// Database holding the cache tables
    #[arg(short, long)]
    db: String,

    /// Dump wire logs on exit
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value
    Get { group: String, key: String },

    /// Store a value, creating or updating
    Set {
        group: String,
        key: String,
        value: String,

        /// Seconds until expiry; 0 means never
        #[arg(long, default_value = "0")]
        ttl: i64,
    },

    /// Store a value only if the key is absent
    Add {
        group: String,
        key: String,
        value: String,

        #[arg(long, default_value = "0")]
        ttl: i64,
    },

    /// Delete a key
    Del { group: String, key: String },

    /// Whether a row exists, expired or not
    Exists { group: String, key: String },

    /// Whether a row exists and has not expired
    Valid { group: String, key: String },

    /// Remove expired rows of a group
    Gc { group: String },

    /// Remove every row of a group
    Flush { group: String },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hsclient=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let mut config = Config::builder()
        .read_addr(&args.read)
        .write_addr(&args.write)
        .debug(args.debug);
    if let Some(secret) = &args.read_secret {
        config = config.read_secret(secret);
    }
    if let Some(secret) = &args.write_secret {
        config = config.write_secret(secret);
    }

    let pool = ConnectionPool::new();
    let hs = HandlerSocket::new(&config.build(), &pool);
    let cache = TableCache::new(hs, &args.db);

    if let Err(e) = run(&cache, &args.command) {
        tracing::error!("command failed: {}", e);
        std::process::exit(1);
    }
}

fn run(cache: &TableCache, command: &Commands) -> hsclient::Result<()> {
    match command {
        Commands::Get { group, key } => match cache.get(group, key)? {
            Some(value) => println!("{}", String::from_utf8_lossy(&value)),
            None => println!("(nil)"),
        },
        Commands::Set {
            group,
            key,
            value,
            ttl,
        } => {
            let stored = cache.set(group, key, value.as_bytes(), *ttl)?;
            println!("{}", if stored { "OK" } else { "FAILED" });
        }
        Commands::Add {
            group,
            key,
            value,
            ttl,
        } => {
            let stored = cache.add(group, key, value.as_bytes(), *ttl)?;
            println!("{}", if stored { "OK" } else { "EXISTS" });
        }
        Commands::Del { group, key } => {
            cache.delete(group, key)?;
            println!("OK");
        }
        Commands::Exists { group, key } => {
            println!("{}", cache.exists(group, key)?);
        }
        Commands::Valid { group, key } => {
            println!("{}", cache.valid(group, key)?);
        }
        Commands::Gc { group } => {
            cache.gc(group)?;
            println!("OK");
        }
        Commands::Flush { group } => {
            cache.flush(group)?;
            println!("OK");
        }
    }

    Ok(())
}
