use clap::Parser;
use std::env;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Serve the popsicle catalogue over a REST API",
    long_about = "A small REST service that keeps a catalogue of popsicles in memory.\n\nEnvironment:\n  POPSICLE_API_LISTEN   Listen address (default 127.0.0.1:8080)\n  POPSICLE_LOG_FILE     Mirror logs to this file\n  RUST_LOG              Log filter (default info)\n  DOTENV_PATH           .env file to load (default .env)\n"
)]
pub struct Cli {
    #[arg(
        long = "api-listen",
        env = "POPSICLE_API_LISTEN",
        value_name = "ADDR",
        default_value = "127.0.0.1:8080",
        help = "REST API listen address (host:port)"
    )]
    pub api_listen: std::net::SocketAddr,

    #[arg(
        long = "log-file",
        env = "POPSICLE_LOG_FILE",
        value_name = "PATH",
        help = "Write logs to PATH (in addition to stderr)"
    )]
    pub log_file: Option<String>,
}

/// Loads the dotenv file (path from `DOTENV_PATH`, default `.env`) and parses
/// the command line. Returns the dotenv path when it was found.
pub fn parse() -> (Cli, Option<String>) {
    let dotenv_path = env::var("DOTENV_PATH").unwrap_or(".env".into());
    let loaded = dotenvy::from_filename(&dotenv_path).ok().map(|_| dotenv_path);

    (Cli::parse(), loaded)
}
