//! gamevault CLI Client
//!
//! Command-line interface for calling a gamevault server.

use std::time::Duration;

use clap::{Parser, Subcommand};
use gamevault::network::Client;
use gamevault::{RecordId, Result, VaultError, Videogame};

/// gamevault CLI
#[derive(Parser, Debug)]
#[command(name = "gamevault-cli")]
#[command(about = "CLI for the gamevault videogame service")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:1099")]
    server: String,

    /// Service name to look up
    #[arg(long, default_value = "VideogameService")]
    service: String,

    /// Give up on a reply after this many milliseconds (0 waits forever)
    #[arg(long, default_value_t = 10_000)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all records
    List,

    /// Get a record by id
    Get {
        /// Record id
        id: RecordId,
    },

    /// Create a record from a JSON object, e.g. '{"title":"Chess"}'
    Create {
        /// Record JSON (any id is ignored)
        json: String,
    },

    /// Replace or insert a record from a JSON object with an id
    Update {
        /// Record JSON including "id"
        json: String,
    },

    /// Delete a record by id
    Del {
        /// Record id
        id: RecordId,
    },

    /// Ping the server
    Ping,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut client = Client::connect(&args.server)?;
    let timeout = (args.timeout_ms > 0).then(|| Duration::from_millis(args.timeout_ms));
    client.set_timeout(timeout)?;
    if !client.lookup(&args.service)? {
        return Err(VaultError::ServiceNotBound(args.service));
    }

    match args.command {
        Commands::List => print_json(&client.list()?)?,
        Commands::Get { id } => match client.get(id)? {
            Some(record) => print_json(&record)?,
            None => println!("(not found)"),
        },
        Commands::Create { json } => {
            let record: Videogame = serde_json::from_str(&json)?;
            print_json(&client.create(&record)?)?;
        }
        Commands::Update { json } => {
            let record: Videogame = serde_json::from_str(&json)?;
            print_json(&client.update(&record)?)?;
        }
        Commands::Del { id } => println!("{}", client.delete(id)?),
        Commands::Ping => {
            client.ping()?;
            println!("PONG");
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
