//! flatkv CLI Client
//!
//! Command-line interface for interacting with a flatkv server.

use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream};

use clap::{Parser, Subcommand};
use flatkv::protocol::json::encode_flat;
use flatkv::protocol::{encode_request, parse_response, Request, Response};
use flatkv::{FlatKvError, Result};

/// flatkv CLI
#[derive(Parser, Debug)]
#[command(name = "flatkv-cli")]
#[command(about = "CLI for the flatkv HTTP key-value server")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every key-value pair
    List,

    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Create or merge a key-value pair (POST)
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Update a key's value (PUT)
    Update {
        /// The key to update
        key: String,

        /// The new value
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },
}

fn main() {
    let args = Args::parse();

    let request = build_request(&args.command, &args.server);

    match send(&args.server, &request) {
        Ok(response) => {
            println!("{} {}", response.status, response.reason);
            println!("{}", response.body);
            if response.status >= 400 {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

/// Translate a subcommand into an HTTP request
fn build_request(command: &Commands, host: &str) -> Request {
    let request = match command {
        Commands::List => Request::new("GET", "/api/data"),
        Commands::Get { key } => Request::new("GET", format!("/api/data/{}", key)),
        Commands::Set { key, value } => {
            Request::new("POST", "/api/data").with_body(encode_flat([(key, value)]))
        }
        Commands::Update { key, value } => Request::new("PUT", format!("/api/data/{}", key))
            .with_body(encode_flat([("value", value.as_str())])),
        Commands::Del { key } => Request::new("DELETE", format!("/api/data/{}", key)),
    };

    request
        .with_header("Host", host)
        .with_header("Content-Type", "application/json")
}

/// Send one request and read the response until the server closes
fn send(server: &str, request: &Request) -> Result<Response> {
    let mut stream = TcpStream::connect(server)?;
    stream.write_all(&encode_request(request))?;
    stream.shutdown(Shutdown::Write)?;

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw)?;
    if raw.is_empty() {
        return Err(FlatKvError::Network(
            "server closed the connection without responding".to_string(),
        ));
    }

    parse_response(&raw)
}
