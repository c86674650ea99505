#![deny(
	absolute_paths_not_starting_with_crate,
	keyword_idents,
	macro_use_extern_crate,
	meta_variable_misuse,
	missing_abi,
	missing_copy_implementations,
	non_ascii_idents,
	nonstandard_style,
	noop_method_call,
	rust_2018_idioms,
	unused_qualifications
)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, Local};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::sender::{EmailSender, Outcome};

mod config;
mod mail;
mod message;
mod prompt;
#[cfg(test)]
mod scratch;
mod sender;
mod storage;

/// Write a plain-text email to disk and hand it to sendmail.
#[derive(argh::FromArgs)]
struct Args {
	/// JSON config file
	#[argh(option)]
	config: Option<PathBuf>,
	/// directory messages are stored in (default: emails)
	#[argh(option)]
	storage_dir: Option<PathBuf>,
	/// sender address (default: noreply@localhost)
	#[argh(option)]
	from: Option<String>,
	/// only store the message, don't run sendmail
	#[argh(switch)]
	no_dispatch: bool,
	#[argh(subcommand)]
	command: Option<Command>,
}

#[derive(argh::FromArgs)]
#[argh(subcommand)]
enum Command {
	Send(SendCommand),
	List(ListCommand),
	View(ViewCommand),
}

/// Compose a message from stdin and send it (the default).
#[derive(argh::FromArgs)]
#[argh(subcommand, name = "send")]
struct SendCommand {}

/// List stored messages, newest first.
#[derive(argh::FromArgs)]
#[argh(subcommand, name = "list")]
struct ListCommand {}

/// Print a stored message.
#[derive(argh::FromArgs)]
#[argh(subcommand, name = "view")]
struct ViewCommand {
	/// file name of the message, as shown by `list`
	#[argh(positional)]
	name: String,
}

fn send(config: &Config) -> anyhow::Result<()> {
	let draft = prompt::read_draft(std::io::stdin().lock(), std::io::stdout().lock())?;

	let sender = EmailSender {
		storage_dir: config.storage_dir.clone(),
		from: config.from.clone(),
		domain: config.domain.clone().unwrap_or_else(message::default_domain),
		dispatch: config.dispatch,
		dispatcher: config.sendmail.clone(),
	};

	match sender.send_email(&draft.to, &draft.subject, &draft.body, Local::now())? {
		Outcome::Sent { message_id, .. } => {
			println!("Email sent successfully to: {}", draft.to);
			println!("Message ID: {message_id}");
		}
		Outcome::Stored { path, message_id } => {
			println!("Dispatch disabled, email saved to: {}", path.display());
			println!("Message ID: {message_id}");
		}
	}
	Ok(())
}

fn list(config: &Config) -> anyhow::Result<()> {
	let messages = storage::list_messages(&config.storage_dir)?;
	if messages.is_empty() {
		eprintln!("no stored messages in {}", config.storage_dir.display());
	}
	for stored in messages {
		let size = humansize::SizeFormatter::new(stored.size, humansize::BINARY.decimal_places(0));
		let modified = DateTime::<Local>::from(stored.modified).format(message::DATE_FORMAT);
		println!("- {} ({size}, {modified})", stored.name);
	}
	Ok(())
}

fn view(config: &Config, name: &str) -> anyhow::Result<()> {
	print!("{}", storage::read_message(&config.storage_dir, name)?);
	Ok(())
}

fn run(args: &Args) -> anyhow::Result<()> {
	let config = Config::resolve(args)?;
	tracing::debug!(?config, "resolved configuration");

	match &args.command {
		None | Some(Command::Send(_)) => send(&config),
		Some(Command::List(_)) => list(&config),
		Some(Command::View(ViewCommand { name })) => view(&config, name),
	}
}

fn main() -> ExitCode {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("eml_send=warn"));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();

	let args: Args = argh::from_env();

	match run(&args) {
		Ok(()) => ExitCode::SUCCESS,
		Err(error) => {
			eprintln!("error: {error:#}");
			ExitCode::FAILURE
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(argv: &[&str]) -> Args {
		<Args as argh::FromArgs>::from_args(&["eml-send"], argv).unwrap()
	}

	#[test]
	fn send_is_the_default_command() {
		assert!(parse(&[]).command.is_none());
		assert!(matches!(parse(&["send"]).command, Some(Command::Send(_))));
	}

	#[test]
	fn view_takes_a_name() {
		let args = parse(&["--no-dispatch", "view", "2024-03-09_10-00-00.eml"]);
		assert!(args.no_dispatch);
		assert!(matches!(
			args.command,
			Some(Command::View(ViewCommand { ref name })) if name == "2024-03-09_10-00-00.eml"
		));
	}

	#[test]
	fn unknown_command_is_rejected() {
		assert!(<Args as argh::FromArgs>::from_args(&["eml-send"], &["frobnicate"]).is_err());
	}
}
