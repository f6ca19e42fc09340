use std::net::SocketAddr;
use std::path::PathBuf;

/// Runtime settings resolved from the CLI and environment.
#[derive(Clone, Debug)]
pub struct Context {
    pub api_listen: SocketAddr,
    pub log_file: Option<PathBuf>,
}

impl Context {
    pub fn from_cli(cli: &crate::cli::Cli) -> Self {
        Self {
            api_listen: cli.api_listen,
            log_file: cli.log_file.as_ref().map(PathBuf::from),
        }
    }
}
