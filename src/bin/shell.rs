//! TabulaDB Interactive Shell
//!
//! Reads commands from stdin, sends them to the server verbatim and prints
//! the raw response. `HELP` and `EXIT` are handled locally and never reach
//! the server.

use std::io::{self, BufRead, Write};

use clap::Parser;
use tabuladb::Client;

/// TabulaDB Shell
#[derive(Parser, Debug)]
#[command(name = "tabuladb-shell")]
#[command(about = "Interactive shell for TabulaDB")]
#[command(version)]
struct Args {
    /// Server address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:12345")]
    server: String,
}

const HELP: &str = "\
Available commands:
  CREATE TABLE <name>
  INSERT INTO <name> <json-row>
  SELECT * FROM <name> [WHERE <col> <op> <val> [AND ...]] [ORDER BY <col> [ASC|DESC]] [LIMIT <n>]
  DELETE TABLE <name>
  SHOW TABLES
  HELP  - show this help
  EXIT  - quit the shell";

fn main() {
    let args = Args::parse();

    let mut client = match Client::connect(&args.server) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Could not connect to {}: {}", args.server, e);
            std::process::exit(1);
        }
    };

    println!("Connected to TabulaDB at {}", args.server);
    println!("Type HELP for the command list, EXIT to quit.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!(">>> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                eprintln!("Error reading input: {e}");
                break;
            }
            None => break, // stdin closed
        };

        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("EXIT") {
            println!("Exiting...");
            break;
        }
        if query.eq_ignore_ascii_case("HELP") {
            println!("{HELP}");
            continue;
        }

        match client.request(query) {
            Ok(response) => println!("{response}"),
            Err(e) => {
                eprintln!("Request failed: {e}");
                break;
            }
        }
    }
}
