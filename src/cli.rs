//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Stateful HTTP client with a persistent per-host cookie jar.
///
/// Cookies set by a server are remembered per host and sent back on later
/// requests. With --cookie-file they are saved after every request so the
/// session survives across runs.
#[derive(Parser, Debug)]
#[command(name = "jarhttp")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// JSON config file (cookie_file, proxy, timeout_secs, connect_timeout_secs)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Cookie jar file to load before and save after the request
    #[arg(short = 'c', long, global = true)]
    pub cookie_file: Option<PathBuf>,

    /// Proxy URL (socks5://, socks5h://, http://, https://)
    #[arg(short = 'x', long, global = true)]
    pub proxy: Option<String>,

    /// Overall request timeout in seconds (1-3600; default waits indefinitely)
    #[arg(short = 't', long, global = true, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available operations.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a GET request and print the response body
    Get {
        /// Request URL
        url: String,
    },
    /// Send a form-encoded POST request and print the response body
    Post {
        /// Request URL
        url: String,
        /// Form field as key=value (repeatable, order preserved)
        #[arg(short = 'd', long = "data", value_parser = parse_form_pair)]
        data: Vec<(String, String)>,
    },
    /// List cookie names stored in the cookie file (values are never shown)
    Cookies {
        /// Only list cookies for this host key (host or host:port)
        host: Option<String>,
    },
}

fn parse_form_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, _)) if key.is_empty() => Err(format!("empty field name in '{raw}'")),
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("expected key=value, got '{raw}'")),
    }
}
