use std::net::{IpAddr, Ipv4Addr};

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub rust_log: String,
    /// Print the "CV generated on …" footer on exported pages.
    pub footer_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
            rust_log: "info".to_string(),
            footer_enabled: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Config::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw
                .trim()
                .parse::<IpAddr>()
                .with_context(|| format!("BIND_ADDR '{raw}' must be an IP address"))?,
            None => defaults.bind_addr,
        };
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            None => defaults.port,
        };
        let footer_enabled = match lookup("CV_FOOTER") {
            Some(raw) => parse_flag(&raw)
                .with_context(|| format!("CV_FOOTER '{raw}' must be true or false"))?,
            None => defaults.footer_enabled,
        };

        Ok(Config {
            bind_addr,
            port,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            footer_enabled,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
