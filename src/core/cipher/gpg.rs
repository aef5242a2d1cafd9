//! GPG cipher backend.
//!
//! Encrypts the index using GnuPG (GNU Privacy Guard).
//!
//! ## Requirements
//!
//! - `gpg` CLI must be installed
//! - GPG keyring must hold the public keys named in `.gpg-id`
//!
//! No private key is needed: the server only ever encrypts.
//!
//! ## Usage
//!
//! ```toml
//! [gpg]
//! binary = "gpg"
//! timeout_secs = 60
//! homedir = "/var/lib/pass-server/gnupg"
//! ```

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{trace, warn};

use super::Cipher;
use crate::core::config::GpgConfig;
use crate::core::store::RecipientList;
use crate::core::types::Armored;
use crate::error::{CipherError, Result};

/// How often a running gpg is checked against its deadline.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// GPG cipher backend using gpg CLI
#[derive(Debug, Clone)]
pub struct Gpg {
    binary: String,
    homedir: Option<PathBuf>,
    timeout: Option<Duration>,
    extra_args: Vec<String>,
}

/// What a finished gpg run produced.
struct Finished {
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    stdin_result: io::Result<()>,
}

impl Gpg {
    /// Backend with settings taken from configuration.
    pub fn from_config(config: &GpgConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            homedir: config.homedir.clone(),
            timeout: config.timeout(),
            extra_args: config.extra_args.clone(),
        }
    }

    /// Locate the gpg binary on PATH (or accept an explicit path).
    fn resolve(&self) -> Result<PathBuf> {
        which::which(&self.binary).map_err(|source| {
            CipherError::GpgNotFound {
                binary: self.binary.clone(),
                source,
            }
            .into()
        })
    }

    /// Build the encrypt command line.
    fn command(&self, program: &Path, recipients: &RecipientList) -> Command {
        let mut cmd = Command::new(program);
        if let Some(homedir) = &self.homedir {
            cmd.arg("--homedir").arg(homedir);
        }
        cmd.args([
            "--batch", // Non-interactive mode
            "--yes",   // Assume yes to all questions
            "--quiet", // Minimize output
            "--encrypt",
            "--armor",
        ]);
        cmd.args(&self.extra_args);

        // Order matters to gpg; keep the .gpg-id order
        for recipient in recipients.as_slice() {
            cmd.args(["--recipient", recipient]);
        }

        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    /// Feed stdin and drain stdout/stderr concurrently, then wait for exit.
    ///
    /// Writing everything before reading can deadlock once gpg fills its
    /// output pipe, so each stream gets its own thread.
    fn communicate(&self, mut child: Child, input: &[u8]) -> Result<Finished> {
        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        thread::scope(|scope| {
            let writer = scope.spawn(move || -> io::Result<()> {
                if let Some(mut stdin) = stdin {
                    stdin.write_all(input)?;
                }
                // dropping stdin closes the pipe so gpg sees EOF
                Ok(())
            });
            let out_reader = scope.spawn(move || drain(stdout));
            let err_reader = scope.spawn(move || drain(stderr));

            let status = self.wait(&mut child)?;

            let stdin_result = writer.join().unwrap_or_else(|_| Err(panicked("stdin writer")));
            let stdout = out_reader
                .join()
                .unwrap_or_else(|_| Err(panicked("stdout reader")))
                .map_err(CipherError::Spawn)?;
            let stderr = err_reader
                .join()
                .unwrap_or_else(|_| Err(panicked("stderr reader")))
                .map_err(CipherError::Spawn)?;

            Ok(Finished {
                status,
                stdout,
                stderr,
                stdin_result,
            })
        })
    }

    /// Wait for gpg, killing it once the timeout passes.
    ///
    /// gpg never outlives a failed wait; the pipe threads would otherwise
    /// block on it forever.
    fn wait(&self, child: &mut Child) -> Result<ExitStatus> {
        let result = self.poll(child);
        if result.is_err() {
            reap(child);
        }
        result
    }

    fn poll(&self, child: &mut Child) -> Result<ExitStatus> {
        let Some(timeout) = self.timeout else {
            return child.wait().map_err(|e| CipherError::Spawn(e).into());
        };

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child.try_wait().map_err(CipherError::Spawn)? {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                warn!(timeout = ?timeout, "gpg timed out, killing it");
                return Err(CipherError::Timeout(timeout).into());
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

/// Kill and collect a child. It may already have exited, so errors are moot.
fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

impl Default for Gpg {
    fn default() -> Self {
        Self::from_config(&GpgConfig::default())
    }
}

impl Cipher for Gpg {
    fn name(&self) -> &'static str {
        "gpg"
    }

    fn encrypt(&self, plaintext: &[u8], recipients: &RecipientList) -> Result<Armored> {
        trace!(
            recipients = recipients.len(),
            plaintext_len = plaintext.len(),
            "encrypting with GPG"
        );

        if recipients.is_empty() {
            return Err(CipherError::NoRecipients.into());
        }

        let program = self.resolve()?;
        let child = self
            .command(&program, recipients)
            .spawn()
            .map_err(CipherError::Spawn)?;

        let finished = self.communicate(child, plaintext)?;

        if !finished.status.success() {
            let stderr = String::from_utf8_lossy(&finished.stderr);
            return Err(CipherError::Failed {
                status: finished.status.to_string(),
                stderr: stderr.trim().to_string(),
            }
            .into());
        }
        // gpg exited cleanly but never got the whole index
        finished.stdin_result.map_err(CipherError::Spawn)?;

        // GPG armor is ASCII
        let ciphertext = String::from_utf8(finished.stdout)
            .map_err(|e| CipherError::NotArmored(format!("UTF-8 error: {}", e)))?;
        if !ciphertext.trim_start().starts_with("-----BEGIN PGP MESSAGE-----") {
            return Err(CipherError::NotArmored("missing PGP MESSAGE header".to_string()).into());
        }

        trace!(ciphertext_len = ciphertext.len(), "encrypted with GPG");
        Ok(ciphertext)
    }
}

fn drain<R: Read>(stream: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut stream) = stream {
        stream.read_to_end(&mut buf)?;
    }
    Ok(buf)
}

fn panicked(what: &str) -> io::Error {
    io::Error::other(format!("{} thread panicked", what))
}
