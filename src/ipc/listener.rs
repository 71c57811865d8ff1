//! Unix-socket [`CommandSource`] implementation.
//!
//! Binds a Unix stream socket and accepts one connection at a time.
//! Each line received is parsed as a JSON-encoded [`Command`].
//!
//! # Wire format
//!
//! Every message is a single line of JSON followed by `\n`:
//!
//! ```json
//! {"SelectCategory":2}
//! {"AddCategory":{"name":"Reading","icon":"Book"}}
//! {"Reorder":{"category":0,"from":4,"to":1}}
//! "EndDrag"
//! {"QuickAdd":{"title":"","url":"https://docs.rs","favIconUrl":null}}
//! {"Export":{"directory":"/tmp"}}
//! ```

use crate::command::Command;
use crate::traits::CommandSource;
use log::{debug, error, info, warn};
use std::io::{BufRead, BufReader};
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// A [`CommandSource`] that listens on a Unix stream socket for
/// JSON-encoded commands.
///
/// Each accepted connection can send multiple newline-delimited JSON
/// commands.  When the connection closes, the listener waits for the
/// next one.
pub struct UnixSocketListener {
    path: PathBuf,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl UnixSocketListener {
    /// Create a new listener bound to `path`.
    ///
    /// The socket file is created when [`run`](CommandSource::run) is called.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The filesystem path of the socket.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CommandSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and start accepting connections.
    ///
    /// This method **blocks** until the sink is dropped.  Run it on a
    /// dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error> {
        // Remove stale socket if present.
        let _ = std::fs::remove_file(&self.path);

        let listener = UnixListener::bind(&self.path)?;
        info!("listening on {}", self.path.display());

        for stream in listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    error!("accept error: {}", e);
                    continue;
                }
            };
            debug!("client connected");
            for line in BufReader::new(stream).lines() {
                let text = match line {
                    Ok(text) => text,
                    Err(e) => {
                        error!("read error: {}", e);
                        break;
                    }
                };
                if text.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<Command>(&text) {
                    Ok(cmd) => {
                        debug!("received {:?}", cmd);
                        if sink.send(cmd).is_err() {
                            info!("sink closed, shutting down");
                            let _ = std::fs::remove_file(&self.path);
                            return Ok(());
                        }
                    }
                    Err(e) => warn!("bad command {:?}: {}", text, e),
                }
            }
            debug!("client disconnected");
        }
        Ok(())
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CategoryId, Link};
    use std::io::Write;
    use std::os::unix::net::UnixStream;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// Monotonic counter to generate unique socket paths per test.
    static TEST_ID: AtomicU32 = AtomicU32::new(0);

    /// Helper: create a unique temporary socket path for each test.
    fn tmp_socket_path() -> PathBuf {
        let id = TEST_ID.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!("linkgrid-test-{}-{}.sock", std::process::id(), id))
    }

    fn spawn_listener(path: &Path) -> mpsc::Receiver<Command> {
        let (tx, rx) = mpsc::channel();
        let path = path.to_path_buf();
        std::thread::spawn(move || {
            let mut listener = UnixSocketListener::new(&path);
            let _ = listener.run(tx);
        });
        // Give the listener a moment to bind.
        std::thread::sleep(Duration::from_millis(150));
        rx
    }

    #[test]
    fn round_trip_commands_over_socket() {
        let path = tmp_socket_path();
        let rx = spawn_listener(&path);

        {
            let mut stream = UnixStream::connect(&path).expect("connect");
            writeln!(stream, r#"{{"SelectCategory":2}}"#).unwrap();
            writeln!(
                stream,
                r#"{{"AddLink":{{"category":"2","link":{{"name":"Docs","url":"https://docs.rs"}}}}}}"#
            )
            .unwrap();
            writeln!(stream).unwrap();
            writeln!(stream, r#""EndDrag""#).unwrap();
            stream.shutdown(std::net::Shutdown::Write).unwrap();
        }

        std::thread::sleep(Duration::from_millis(150));
        let cmds: Vec<Command> = rx.try_iter().collect();

        assert_eq!(cmds.len(), 3);
        assert_eq!(cmds[0], Command::SelectCategory(CategoryId(2)));
        assert_eq!(
            cmds[1],
            Command::AddLink {
                category: CategoryId(2),
                link: Link::new("Docs", "https://docs.rs"),
            }
        );
        assert_eq!(cmds[2], Command::EndDrag);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn malformed_json_does_not_crash() {
        let path = tmp_socket_path();
        let rx = spawn_listener(&path);

        {
            let mut stream = UnixStream::connect(&path).expect("connect");
            writeln!(stream, "not json at all").unwrap();
            writeln!(stream, r#"{{"SelectCategory":"nope"}}"#).unwrap();
            writeln!(stream, r#""CancelImport""#).unwrap();
            stream.shutdown(std::net::Shutdown::Write).unwrap();
        }

        std::thread::sleep(Duration::from_millis(150));
        let cmds: Vec<Command> = rx.try_iter().collect();
        // Only the valid command should have arrived.
        assert_eq!(cmds, vec![Command::CancelImport]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn successive_connections_are_served() {
        let path = tmp_socket_path();
        let rx = spawn_listener(&path);

        for _ in 0..2 {
            let mut stream = UnixStream::connect(&path).expect("connect");
            writeln!(stream, r#""ConfirmImport""#).unwrap();
            stream.shutdown(std::net::Shutdown::Write).unwrap();
            std::thread::sleep(Duration::from_millis(50));
        }

        std::thread::sleep(Duration::from_millis(150));
        assert_eq!(rx.try_iter().count(), 2);

        let _ = std::fs::remove_file(&path);
    }
}
