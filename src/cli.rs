//! Minimal CLI parsing for config overrides and report mode.

use std::env;

use anyhow::{Context, Result, bail};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub port_override: Option<u16>,
    /// Print a match report for this library instead of serving HTTP
    pub report_library: Option<String>,
    pub match_check_override: Option<bool>,
}

impl CliOptions {
    pub fn from_args() -> Result<Self> {
        Self::parse(env::args().skip(1))
    }

    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = CliOptions::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--port" => {
                    let value = args.next().context("--port requires a value")?;
                    options.port_override = Some(parse_port(&value)?);
                }
                "--report" => {
                    let value = args.next().context("--report requires a library name")?;
                    options.report_library = Some(value);
                }
                "--no-match-check" => options.match_check_override = Some(false),
                _ if arg.starts_with("--port=") => {
                    if let Some((_, value)) = arg.split_once('=') {
                        options.port_override = Some(parse_port(value)?);
                    }
                }
                _ if arg.starts_with("--report=") => {
                    if let Some((_, value)) = arg.split_once('=') {
                        options.report_library = Some(value.to_string());
                    }
                }
                _ => bail!("Unknown argument: {}", arg),
            }
        }
        Ok(options)
    }
}

fn parse_port(value: &str) -> Result<u16> {
    value
        .parse()
        .with_context(|| format!("Invalid port: {}", value))
}
