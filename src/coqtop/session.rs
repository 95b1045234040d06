//! coqtop process driver
//!
//! coqtop prints a prompt such as `Coq < ` whenever it is ready for input, on stderr
//! when it is not attached to a terminal. Both output streams of the child share a
//! single pipe, so responses and prompts arrive in the order coqtop wrote them. A
//! reader thread forwards that pipe in chunks over a channel; the session scans the
//! accumulated bytes for the prompt pattern with a deadline.
//!
//! A prompt must start a line, otherwise answers such as `1 < 2` would end the
//! response early. `^` in the pattern only matches at the very start of the stream,
//! which is where coqtop prints its first prompt.

use coqrst_config::CoqtopConfig;
use once_cell::sync::Lazy;
use regex::bytes::Regex as BytesRegex;
use regex::Regex;
use std::io::{self, Read, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

pub const DEFAULT_PROMPT: &str = r"(?:^|\r?\n)[^<\s]+ < ";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n]+").unwrap());

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a coqtop session is already open")]
    AlreadyOpen,

    #[error("no coqtop session is open")]
    NotOpen,

    #[error("could not start {binary:?}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid prompt pattern: {0}")]
    Prompt(#[from] regex::Error),

    #[error("no prompt from coqtop within {timeout:?} (pending output: {pending:?})")]
    Desync { timeout: Duration, pending: String },

    #[error("coqtop exited (pending output: {pending:?})")]
    Exited { pending: String },
}

/// A prover that answers one sentence at a time.
pub trait Repl {
    /// Send one sentence and return the response printed before the next prompt.
    fn sendone(&mut self, sentence: &str) -> Result<String, SessionError>;
}

/// How to start coqtop and recognise its prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub binary: String,
    pub args: Vec<String>,
    pub color: bool,
    pub prompt: String,
    pub timeout: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            binary: "coqtop".to_string(),
            args: Vec::new(),
            color: false,
            prompt: DEFAULT_PROMPT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl From<&CoqtopConfig> for SessionSettings {
    fn from(config: &CoqtopConfig) -> Self {
        SessionSettings {
            binary: config.binary.clone(),
            args: config.args.clone(),
            color: config.color,
            prompt: config.prompt.clone(),
            timeout: config.timeout(),
        }
    }
}

impl SessionSettings {
    /// Command-line arguments, including the colour switch when requested.
    pub fn command_args(&self) -> Vec<String> {
        let mut args = self.args.clone();
        if self.color {
            args.extend(["-color".to_string(), "on".to_string()]);
        }
        args
    }
}

/// Collapse line breaks to single spaces and trim.
///
/// Spaces inside the sentence are kept; they can be significant in notations.
pub fn normalize_sentence(sentence: &str) -> String {
    LINE_BREAKS.replace_all(sentence, " ").trim().to_string()
}

struct Process {
    child: Child,
    stdin: ChildStdin,
    output: Receiver<Vec<u8>>,
    pending: Vec<u8>,
    /// Where the unread part of `pending` starts
    start: usize,
}

fn forward(mut stream: impl Read + Send + 'static) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buffer = [0u8; 4096];
        loop {
            match stream.read(&mut buffer) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if tx.send(buffer[..n].to_vec()).is_err() {
                        break;
                    }
                }
            }
        }
    });
    rx
}

/// A coqtop child process, opened and closed explicitly.
///
/// Dropping the session kills the process.
pub struct CoqtopSession {
    settings: SessionSettings,
    prompt: BytesRegex,
    process: Option<Process>,
}

impl CoqtopSession {
    pub fn new(settings: SessionSettings) -> Result<Self, SessionError> {
        let prompt = BytesRegex::new(&settings.prompt)?;
        Ok(CoqtopSession {
            settings,
            prompt,
            process: None,
        })
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn is_open(&self) -> bool {
        self.process.is_some()
    }

    /// Start coqtop and wait for its first prompt.
    pub fn open(&mut self) -> Result<(), SessionError> {
        if self.process.is_some() {
            return Err(SessionError::AlreadyOpen);
        }

        let args = self.settings.command_args();
        tracing::debug!(binary = %self.settings.binary, ?args, "starting coqtop");

        let (reader, writer) = io::pipe()?;
        let mut child = {
            let mut command = Command::new(&self.settings.binary);
            command
                .args(&args)
                .stdin(Stdio::piped())
                .stdout(writer.try_clone()?)
                .stderr(writer);
            command.spawn().map_err(|source| SessionError::Spawn {
                binary: self.settings.binary.clone(),
                source,
            })?
        };

        let stdin = match child.stdin.take() {
            Some(stdin) => stdin,
            None => {
                let _ = child.kill();
                let err = io::Error::new(io::ErrorKind::BrokenPipe, "coqtop stdin unavailable");
                return Err(err.into());
            }
        };

        self.process = Some(Process {
            child,
            stdin,
            output: forward(reader),
            pending: Vec::new(),
            start: 0,
        });

        if let Err(err) = self.next_prompt() {
            self.close();
            return Err(err);
        }
        Ok(())
    }

    /// Kill coqtop. Does nothing if no session is open.
    pub fn close(&mut self) {
        if let Some(mut process) = self.process.take() {
            tracing::debug!("stopping coqtop");
            let _ = process.child.kill();
            let _ = process.child.wait();
        }
    }

    /// Wait for the next prompt; return what was printed before it.
    fn next_prompt(&mut self) -> Result<String, SessionError> {
        let prompt = &self.prompt;
        let timeout = self.settings.timeout;
        let process = self.process.as_mut().ok_or(SessionError::NotOpen)?;
        let deadline = Instant::now() + timeout;

        loop {
            if let Some(found) = prompt.find_at(&process.pending, process.start) {
                let before =
                    String::from_utf8_lossy(&process.pending[process.start..found.start()])
                        .into_owned();
                // Keep the prompt's last byte so the stream start is never seen again.
                let keep = usize::from(found.end() > 0);
                process.pending.drain(..found.end() - keep);
                process.start = keep;
                return Ok(before);
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            match process.output.recv_timeout(remaining) {
                Ok(chunk) => process.pending.extend_from_slice(&chunk),
                Err(RecvTimeoutError::Timeout) => {
                    return Err(SessionError::Desync {
                        timeout,
                        pending: String::from_utf8_lossy(&process.pending[process.start..])
                            .into_owned(),
                    })
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(SessionError::Exited {
                        pending: String::from_utf8_lossy(&process.pending[process.start..])
                            .into_owned(),
                    })
                }
            }
        }
    }
}

impl Repl for CoqtopSession {
    fn sendone(&mut self, sentence: &str) -> Result<String, SessionError> {
        let process = self.process.as_mut().ok_or(SessionError::NotOpen)?;
        let line = normalize_sentence(sentence);
        tracing::trace!(sentence = %line, "sending to coqtop");
        writeln!(process.stdin, "{}", line)?;
        process.stdin.flush()?;
        self.next_prompt()
    }
}

impl Drop for CoqtopSession {
    fn drop(&mut self) {
        self.close();
    }
}
