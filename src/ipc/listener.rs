//! Unix-socket [`RequestSource`] implementation.
//!
//! Binds a Unix stream socket and accepts one connection at a time.
//! Each line received is parsed as a JSON-encoded [`Request`].
//!
//! # Wire format
//!
//! Every message is a single line of JSON followed by `\n`:
//!
//! ```json
//! {"Event":{"event":{"id":338},"subject":{"Item":{"payload":{"Shortcut":{"shortcut_name":"compose"}}}}}}
//! {"Event":{"event":{"id":12},"subject":{"Placed":{"container":"AllApps"}},"src_state":2,"dst_state":4}}
//! {"Snapshot":{"record":{"container":{"Hotseat":{"index":0}}},"instance_id":7}}
//! ```

use crate::ipc::Request;
use crate::traits::RequestSource;
use log::{debug, error, info};
use std::io::{BufRead, BufReader};
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// A [`RequestSource`] that listens on a Unix stream socket for
/// JSON-encoded requests.
///
/// Each accepted connection can send multiple newline-delimited requests.
/// When the connection closes, the listener waits for the next one.
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
    /// The socket file is created when [`run`](RequestSource::run) is called.
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

impl RequestSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and start accepting connections.
    ///
    /// This method **blocks** until the sink is closed.  Run it on a
    /// dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<Request>) -> Result<(), Self::Error> {
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
            debug!("producer connected");
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
                match serde_json::from_str::<Request>(&text) {
                    Ok(req) => {
                        debug!("received {:?}", req);
                        if sink.send(req).is_err() {
                            info!("sink closed, shutting down");
                            let _ = std::fs::remove_file(&self.path);
                            return Ok(());
                        }
                    }
                    Err(e) => error!("bad request: {}: {}", text, e),
                }
            }
            debug!("producer disconnected");
        }
        Ok(())
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::InstanceId;
    use std::io::Write;
    use std::os::unix::net::UnixStream;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// Monotonic counter to generate unique socket paths per test.
    static TEST_ID: AtomicU32 = AtomicU32::new(0);

    fn tmp_socket_path() -> PathBuf {
        let id = TEST_ID.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!(
            "statslog-test-{}-{}.sock",
            std::process::id(),
            id
        ))
    }

    fn spawn_listener(path: &Path) -> mpsc::Receiver<Request> {
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
    fn requests_over_socket() {
        let path = tmp_socket_path();
        let rx = spawn_listener(&path);

        {
            let mut stream = UnixStream::connect(&path).expect("connect");
            writeln!(stream, r#"{{"Event":{{"event":{{"id":338}}}}}}"#).unwrap();
            writeln!(stream).unwrap();
            writeln!(stream, r#"{{"Snapshot":{{"record":{{}},"instance_id":7}}}}"#).unwrap();
            stream.shutdown(std::net::Shutdown::Write).unwrap();
        }

        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        let second = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(first, Request::Event(ref ev) if ev.event.id == 338));
        assert!(matches!(
            second,
            Request::Snapshot { instance_id, .. } if instance_id == InstanceId(7)
        ));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn malformed_json_does_not_crash() {
        let path = tmp_socket_path();
        let rx = spawn_listener(&path);

        {
            let mut stream = UnixStream::connect(&path).expect("connect");
            writeln!(stream, "not json at all").unwrap();
            writeln!(stream, r#"{{"Event":{{"event":{{"id":1}}}}}}"#).unwrap();
            stream.shutdown(std::net::Shutdown::Write).unwrap();
        }

        let only = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(only, Request::Event(ref ev) if ev.event.id == 1));
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());

        let _ = std::fs::remove_file(&path);
    }
}
