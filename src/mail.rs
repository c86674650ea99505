use std::fs::File;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::Context as _;

/// Something that can take a stored message and try to deliver it.
pub trait Dispatcher {
	fn dispatch(&self, message: &Path) -> anyhow::Result<()>;
}

/// Hands the message file to a sendmail-compatible program on its stdin.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Sendmail {
	pub program: String,
	pub args: Vec<String>,
}

impl Default for Sendmail {
	fn default() -> Self {
		Self {
			program: "sendmail".into(),
			args: vec!["-t".into(), "-i".into()],
		}
	}
}

impl Dispatcher for Sendmail {
	fn dispatch(&self, message: &Path) -> anyhow::Result<()> {
		let program = &self.program;
		let input = File::open(message).with_context(|| format!("opening {}", message.display()))?;

		let mut process = Command::new(program)
			.args(&self.args)
			.stdin(Stdio::from(input))
			.spawn()
			.with_context(|| format!("spawning {program}"))?;
		tracing::debug!(%program, pid = process.id(), "spawned mailer");

		let status = process
			.wait()
			.with_context(|| format!("waiting for {program}"))?;
		tracing::debug!(%program, %status, "mailer exited");
		anyhow::ensure!(status.success(), "{program} exited unsuccessfully ({status})");

		Ok(())
	}
}

#[cfg(all(test, unix))]
mod tests {
	use super::*;
	use crate::scratch::Scratch;

	fn sendmail(program: &str, args: &[&str]) -> Sendmail {
		Sendmail {
			program: program.into(),
			args: args.iter().map(|&arg| arg.into()).collect(),
		}
	}

	fn stored(scratch: &Scratch, content: &str) -> std::path::PathBuf {
		let path = scratch.path().join("m.eml");
		std::fs::write(&path, content).unwrap();
		path
	}

	#[test]
	fn zero_exit_is_success() {
		let scratch = Scratch::new("mail-ok");
		let path = stored(&scratch, "To: a@b\n\nhi\n");
		sendmail("true", &[]).dispatch(&path).unwrap();
	}

	#[test]
	fn non_zero_exit_is_failure() {
		let scratch = Scratch::new("mail-fail");
		let path = stored(&scratch, "To: a@b\n\nhi\n");
		let error = sendmail("false", &[]).dispatch(&path).unwrap_err();
		assert!(error.to_string().contains("exited unsuccessfully"));
	}

	#[test]
	fn message_arrives_on_stdin() {
		let scratch = Scratch::new("mail-stdin");
		let path = stored(&scratch, "To: a@b\n\nhi\n");
		let copy = scratch.path().join("copy");
		let script = format!("cat > '{}'", copy.display());
		sendmail("sh", &["-c", &script]).dispatch(&path).unwrap();
		assert_eq!(std::fs::read_to_string(copy).unwrap(), "To: a@b\n\nhi\n");
	}

	#[test]
	fn killed_by_signal_is_failure() {
		let scratch = Scratch::new("mail-signal");
		let path = stored(&scratch, "");
		assert!(sendmail("sh", &["-c", "kill -9 $$"]).dispatch(&path).is_err());
	}

	#[test]
	fn missing_program_fails_to_spawn() {
		let scratch = Scratch::new("mail-missing");
		let path = stored(&scratch, "");
		let error = sendmail("/nonexistent/sendmail", &[])
			.dispatch(&path)
			.unwrap_err();
		assert!(error.to_string().starts_with("spawning"));
	}

	#[test]
	fn missing_message_file_fails() {
		let scratch = Scratch::new("mail-nofile");
		let error = sendmail("true", &[])
			.dispatch(&scratch.path().join("gone.eml"))
			.unwrap_err();
		assert!(error.to_string().starts_with("opening"));
	}

	#[test]
	fn default_runs_sendmail_with_recipients_from_headers() {
		assert_eq!(sendmail("sendmail", &["-t", "-i"]), Sendmail::default());
	}
}
