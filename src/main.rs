//! CLI entry point for jarhttp.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Parser;
use jarhttp::{ClientConfig, CookieJar, HttpClient};
use tracing::{debug, info};

mod cli;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // Logs go to stderr; stdout carries the response body.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let config = resolve_config(&args)?;

    match args.command {
        Command::Get { url } => {
            let client = HttpClient::from_config(&config);
            let body = client.get(&url).await?;
            write_body(&body)?;
        }
        Command::Post { url, data } => {
            let client = HttpClient::from_config(&config);
            let body = client.post(&url, data.as_slice()).await?;
            write_body(&body)?;
        }
        Command::Cookies { host } => {
            let Some(path) = config.cookie_file.as_deref() else {
                bail!("No cookie file given. Use --cookie-file or set JARHTTP_COOKIE_FILE.");
            };
            list_cookies(path, host.as_deref())?;
        }
    }

    Ok(())
}

/// Builds the effective config: file, then environment, then CLI flags.
fn resolve_config(args: &Args) -> Result<ClientConfig> {
    let base = match &args.config {
        Some(path) => ClientConfig::from_json_file(path)?,
        None => ClientConfig::default(),
    };
    let mut config = base.with_env()?;

    if let Some(path) = &args.cookie_file {
        config.cookie_file = Some(path.clone());
    }
    if let Some(proxy) = &args.proxy {
        config.proxy = Some(proxy.clone());
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = Some(timeout);
    }

    config.validate()?;
    debug!(?config, "effective configuration");
    Ok(config)
}

fn write_body(body: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(body.as_bytes())
        .context("Failed to write response body")?;
    stdout.flush().context("Failed to flush stdout")
}

fn list_cookies(path: &Path, host: Option<&str>) -> Result<()> {
    let jar = match CookieJar::load(path) {
        Ok(jar) => jar,
        Err(error) if error.is_not_found() => {
            info!(path = %path.display(), "Cookie file does not exist yet");
            return Ok(());
        }
        Err(error) => {
            return Err(error)
                .with_context(|| format!("Cannot load cookie file '{}'", path.display()));
        }
    };

    let hosts = match host {
        Some(host) => vec![host.to_string()],
        None => jar.hosts(),
    };

    let mut stdout = io::stdout().lock();
    for host in hosts {
        for cookie in jar.get(&host) {
            writeln!(stdout, "{host}\t{}", cookie.name)?;
        }
    }
    Ok(())
}
