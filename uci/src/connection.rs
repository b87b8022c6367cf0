use super::commands::{EngineOutput, UciCommand};
use super::decoder::Decoder;
use super::encoder::Encoder;
use log::debug;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

const QUIT_GRACE_PERIOD: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("failed to start engine {path}: {source}")]
    Spawn { path: String, source: io::Error },

    #[error("engine closed its output")]
    Closed,

    #[error("engine did not answer within {0:?}")]
    Timeout(Duration),

    #[error("engine i/o failed: {0}")]
    Io(#[from] io::Error),
}

/// A running UCI engine process.
///
/// Engine output is read on a dedicated thread and handed over through a channel,
/// which lets the handshake wait with a timeout. Dropping the connection shuts the
/// engine down.
pub struct EngineConnection {
    child: Arc<Mutex<Child>>,
    stdin: BufWriter<ChildStdin>,
    output_rx: Receiver<String>,
    encoder: Encoder,
    decoder: Decoder,
}

impl EngineConnection {
    pub fn spawn(path: impl AsRef<Path>) -> Result<Self, ConnectionError> {
        let path = path.as_ref();
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ConnectionError::Spawn {
                path: path.display().to_string(),
                source,
            })?;

        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                let _ = child.kill();
                return Err(ConnectionError::Closed);
            }
        };

        let (output_tx, output_rx) = channel();
        thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                let Ok(line) = line else { break };
                if output_tx.send(line).is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            child: Arc::new(Mutex::new(child)),
            stdin: BufWriter::new(stdin),
            output_rx,
            encoder: Encoder {},
            decoder: Decoder::new(),
        })
    }

    pub fn send(&mut self, command: &UciCommand) -> Result<(), ConnectionError> {
        let line = self.encoder.encode(command);
        debug!("Engine <- {}", line);

        self.stdin.write_all(line.as_bytes())?;
        self.stdin.write_all(b"\n")?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Blocks until the engine produces its next line.
    pub fn recv(&mut self) -> Result<EngineOutput, ConnectionError> {
        let line = self.output_rx.recv().map_err(|_| ConnectionError::Closed)?;
        Ok(self.decode(&line))
    }

    pub fn recv_timeout(&mut self, timeout: Duration) -> Result<EngineOutput, ConnectionError> {
        let line = self.output_rx.recv_timeout(timeout).map_err(|e| match e {
            RecvTimeoutError::Timeout => ConnectionError::Timeout(timeout),
            RecvTimeoutError::Disconnected => ConnectionError::Closed,
        })?;
        Ok(self.decode(&line))
    }

    /// Reads output until `accept` picks a line. The whole wait is bounded by `timeout`, however
    /// much unrelated output the engine prints meanwhile.
    pub fn wait_for<F>(&mut self, timeout: Duration, mut accept: F) -> Result<(), ConnectionError>
    where
        F: FnMut(&EngineOutput) -> bool,
    {
        let deadline = Instant::now() + timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let output = match self.recv_timeout(remaining) {
                Err(ConnectionError::Timeout(_)) => return Err(ConnectionError::Timeout(timeout)),
                result => result?,
            };
            if accept(&output) {
                return Ok(());
            }
        }
    }

    /// A handle that can kill the engine from another thread, e.g. a signal handler.
    pub fn terminator(&self) -> Terminator {
        Terminator {
            child: Arc::clone(&self.child),
        }
    }

    fn decode(&self, line: &str) -> EngineOutput {
        let line = line.trim();
        debug!("Engine -> {}", line);
        self.decoder.decode(line)
    }
}

impl Drop for EngineConnection {
    fn drop(&mut self) {
        let Ok(mut child) = self.child.lock() else {
            return;
        };

        // Ask the engine to quit, force kill it if that fails or it lingers
        let quit = self.encoder.encode(&UciCommand::Quit);
        let sent = writeln!(self.stdin, "{}", quit).and_then(|_| self.stdin.flush());
        if sent.is_err() {
            let _ = child.kill();
            let _ = child.wait();
            return;
        }

        thread::sleep(QUIT_GRACE_PERIOD);

        match child.try_wait() {
            Ok(Some(status)) => {
                debug!("Engine exited with {}", status);
            }
            Ok(None) | Err(_) => {
                debug!("Engine still running, killing it");
                let _ = child.kill();
                let _ = child.wait();
            }
        }
    }
}

/// Kills the engine process it was created from.
#[derive(Clone)]
pub struct Terminator {
    child: Arc<Mutex<Child>>,
}

impl Terminator {
    pub fn terminate(&self) {
        if let Ok(mut child) = self.child.lock() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
