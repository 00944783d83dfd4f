//! `pubdist`: operator CLI for the publication distribution server.
//!
//! # Usage
//!
//! ```text
//! pubdist --url http://localhost:3000 --user admin --password secret stats
//! pubdist --config ~/.config/pubdist/config.toml logs --search SN-104
//! pubdist resend-bulk 6f1c… 0b9e…
//! ```

mod client;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const DEFAULT_URL: &str = "http://localhost:3000";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "pubdist", about = "Operator CLI for publication distribution")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the pubdist server (default: http://localhost:3000).
  #[arg(long, env = "PUBDIST_URL")]
  url: Option<String>,

  /// API username.
  #[arg(long, env = "PUBDIST_USER")]
  user: Option<String>,

  /// API password (plaintext).
  #[arg(long, env = "PUBDIST_PASSWORD")]
  password: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Dashboard counters.
  Stats,
  /// List customers.
  Customers {
    #[arg(long)]
    search: Option<String>,
  },
  /// List publications, newest first.
  Publications {
    #[arg(long)]
    search: Option<String>,
  },
  /// Approve a publication and start its distribution.
  Approve { id: Uuid },
  /// List distribution log entries, newest first.
  Logs {
    #[arg(long)]
    search: Option<String>,
  },
  /// Resend one log entry.
  Resend { id: Uuid },
  /// Resend several log entries; failures are skipped.
  ResendBulk {
    #[arg(required = true)]
    ids: Vec<Uuid>,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

/// A flag (or its env var) wins over a non-empty file value.
fn pick(flag: Option<String>, file: &str) -> Option<String> {
  flag.or_else(|| (!file.is_empty()).then(|| file.to_owned()))
}

fn resolve(args: &mut Args, file_cfg: &ConfigFile) -> ApiConfig {
  ApiConfig {
    base_url: pick(args.url.take(), &file_cfg.url).unwrap_or_else(|| DEFAULT_URL.to_string()),
    username: pick(args.user.take(), &file_cfg.username).unwrap_or_default(),
    password: pick(args.password.take(), &file_cfg.password).unwrap_or_default(),
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let mut args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let client = ApiClient::new(resolve(&mut args, &file_cfg))?;

  match args.command {
    Command::Stats => println!("{}", render::stats(&client.stats().await?)),
    Command::Customers { search } => {
      for c in client.customers(search.as_deref()).await? {
        println!("{}", render::customer(&c));
      }
    }
    Command::Publications { search } => {
      for p in client.publications(search.as_deref()).await? {
        println!("{}", render::publication(&p));
      }
    }
    Command::Approve { id } => {
      let p = client.approve(id).await?;
      println!("approved {} ({}); distribution is running", p.number, p.title);
    }
    Command::Logs { search } => {
      for l in client.logs(search.as_deref()).await? {
        println!("{}", render::log_entry(&l));
      }
    }
    Command::Resend { id } => {
      let l = client.resend(id).await?;
      println!("resent {} to {}", l.publication_number, l.recipient_email);
    }
    Command::ResendBulk { ids } => {
      let reply = client.resend_bulk(&ids).await?;
      println!("resent {} of {}", reply.count, ids.len());
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flags_override_file_which_overrides_defaults() {
    let mut args = Args::parse_from(["pubdist", "--user", "ops", "stats"]);
    let file = ConfigFile {
      url:      "https://pubs.example.com".into(),
      username: "admin".into(),
      password: "from-file".into(),
    };
    let cfg = resolve(&mut args, &file);
    assert_eq!(cfg.base_url, "https://pubs.example.com");
    assert_eq!(cfg.username, "ops");
    assert_eq!(cfg.password, "from-file");

    let mut bare = Args::parse_from(["pubdist", "stats"]);
    let cfg = resolve(&mut bare, &ConfigFile::default());
    assert_eq!(cfg.base_url, DEFAULT_URL);
    assert!(cfg.username.is_empty());
  }

  #[test]
  fn resend_bulk_needs_ids() {
    assert!(Args::try_parse_from(["pubdist", "resend-bulk"]).is_err());
    let args = Args::try_parse_from([
      "pubdist",
      "resend-bulk",
      "00000000-0000-0000-0000-000000000001",
      "00000000-0000-0000-0000-000000000002",
    ])
    .unwrap();
    assert!(matches!(args.command, Command::ResendBulk { ids } if ids.len() == 2));
  }
}
