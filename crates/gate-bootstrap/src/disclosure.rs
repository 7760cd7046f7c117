//! One-time disclosure of root credentials.
//!
//! Generated credentials exist nowhere else in plaintext, so the sink is
//! the operator's only chance to learn them. Operator-supplied credentials
//! are already known and are never repeated.

use std::io::{self, Write};

use parking_lot::Mutex;

use crate::resolver::RootCredentials;

const ROTATE_WARNING: &str = "WARNING: YOU MUST delete this client once in production, as credentials \
     may have been leaked in your logfiles.";

/// Receives the root credentials once, right after they are created.
pub trait CredentialDisclosure: Send + Sync {
    /// Called with generated credentials.
    fn generated(&self, credentials: &RootCredentials);

    /// Called instead of [`generated`](Self::generated) whenever an operator
    /// override was supplied, including one that was rejected as malformed.
    fn overridden(&self);
}

/// Discloses through `tracing`.
///
/// Anything that collects logs will keep the secret; pick
/// [`ConsoleDisclosure`] when logs are shipped off-host.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDisclosure;

impl CredentialDisclosure for LogDisclosure {
    fn generated(&self, credentials: &RootCredentials) {
        tracing::info!("client_id: {}", credentials.id);
        tracing::info!("client_secret: {}", credentials.secret);
        tracing::warn!("{ROTATE_WARNING}");
    }

    fn overridden(&self) {
        tracing::info!("Root client credentials are not disclosed because an override was supplied.");
    }
}

/// Writes straight to a terminal stream instead of the log pipeline.
pub struct ConsoleDisclosure {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleDisclosure {
    /// Discloses on stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_writer(io::stderr())
    }

    /// Discloses on an arbitrary writer.
    #[must_use]
    pub fn with_writer(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }

    fn emit(&self, lines: &[&str]) {
        let mut out = self.out.lock();
        if let Err(e) = write_lines(&mut **out, lines) {
            tracing::error!("Could not write root client credentials: {}", e);
        }
    }
}

fn write_lines(out: &mut dyn Write, lines: &[&str]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

impl CredentialDisclosure for ConsoleDisclosure {
    fn generated(&self, credentials: &RootCredentials) {
        let id = format!("client_id: {}", credentials.id);
        let secret = format!("client_secret: {}", credentials.secret);
        self.emit(&["Temporary root client created.", &id, &secret, ROTATE_WARNING]);
    }

    fn overridden(&self) {
        self.emit(&["Temporary root client created."]);
    }
}

impl std::fmt::Debug for ConsoleDisclosure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleDisclosure").finish_non_exhaustive()
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDisclosure;

impl CredentialDisclosure for NoDisclosure {
    fn generated(&self, _credentials: &RootCredentials) {}

    fn overridden(&self) {}
}
