use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::mail::Sendmail;

pub const DEFAULT_STORAGE_DIR: &str = "emails";
pub const DEFAULT_FROM: &str = "noreply@localhost";

/// Settings read from the optional JSON config file.
///
/// Missing keys fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub storage_dir: PathBuf,
	pub from: String,
	/// Run the mailer after storing the message.
	pub dispatch: bool,
	/// Message id domain; the host name when unset.
	pub domain: Option<String>,
	pub sendmail: Sendmail,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			storage_dir: DEFAULT_STORAGE_DIR.into(),
			from: DEFAULT_FROM.into(),
			dispatch: true,
			domain: None,
			sendmail: Sendmail::default(),
		}
	}
}

impl Config {
	pub fn load(path: &Path) -> anyhow::Result<Self> {
		let raw =
			std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
		serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
	}

	/// Defaults, then the config file if one was given, then command-line flags.
	pub fn resolve(args: &crate::Args) -> anyhow::Result<Self> {
		let mut config = match &args.config {
			Some(path) => Self::load(path)?,
			None => Self::default(),
		};
		if let Some(dir) = &args.storage_dir {
			config.storage_dir = dir.clone();
		}
		if let Some(from) = &args.from {
			config.from = from.clone();
		}
		if args.no_dispatch {
			config.dispatch = false;
		}
		Ok(config)
	}
}
