//! Shared helpers for unit tests.

use crate::error::{Result, TtvError};
use crate::service::{GenerateVideoRequest, GeneratedArtifact, VideoService};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A raw HTTP request captured by [`StubServer`].
#[derive(Debug)]
pub struct ReceivedRequest(String);

impl ReceivedRequest {
    /// Returns everything after the header block.
    pub fn body(&self) -> &str {
        self.0.split_once("\r\n\r\n").map(|(_, body)| body).unwrap_or("")
    }
}

impl std::ops::Deref for ReceivedRequest {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

/// A loopback HTTP server that answers exactly one request.
pub struct StubServer {
    base_url: String,
    handle: JoinHandle<String>,
}

impl StubServer {
    /// Starts a server that replies with the given status line and body.
    pub async fn respond(status: &'static str, content_type: &'static str, body: Vec<u8>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;

            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(&body).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });

        Self { base_url, handle }
    }

    /// Returns a base URL nothing is listening on.
    pub async fn unused_base_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Waits for the served request and returns it.
    pub async fn received(self) -> ReceivedRequest {
        ReceivedRequest(self.handle.await.unwrap())
    }
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// What a [`MockVideoService`] does for one call.
pub enum MockReply {
    /// Return an artifact with this `video_path`.
    Path(&'static str),
    /// Return this error.
    Error(TtvError),
    /// Signal the test, then wait for it to send the real reply.
    Gated {
        entered: oneshot::Sender<()>,
        release: oneshot::Receiver<MockReply>,
    },
    /// Panic inside the call.
    Panic,
}

/// A scripted generation service that records every request.
pub struct MockVideoService {
    base_url: String,
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<GenerateVideoRequest>>,
}

impl MockVideoService {
    pub fn new(replies: impl IntoIterator<Item = MockReply>) -> Self {
        Self {
            base_url: "http://localhost:5000".into(),
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<GenerateVideoRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of generation calls so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Creates a gated reply and the handles that drive it.
    pub fn gate() -> (MockReply, oneshot::Receiver<()>, oneshot::Sender<MockReply>) {
        let (entered_tx, entered_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        (
            MockReply::Gated {
                entered: entered_tx,
                release: release_rx,
            },
            entered_rx,
            release_tx,
        )
    }
}

fn settle(reply: MockReply) -> Result<GeneratedArtifact> {
    match reply {
        MockReply::Path(path) => Ok(GeneratedArtifact::new(path)),
        MockReply::Error(err) => Err(err),
        MockReply::Panic => panic!("mock service panicked"),
        MockReply::Gated { .. } => panic!("nested gated replies are not supported"),
    }
}

#[async_trait]
impl VideoService for MockVideoService {
    async fn generate_video(&self, request: &GenerateVideoRequest) -> Result<GeneratedArtifact> {
        self.requests.lock().unwrap().push(request.clone());

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("mock service ran out of replies");

        match reply {
            MockReply::Gated { entered, release } => {
                let _ = entered.send(());
                let reply = release.await.expect("gate dropped without a reply");
                settle(reply)
            }
            other => settle(other),
        }
    }

    async fn fetch_video(&self, filename: &str) -> Result<Vec<u8>> {
        Ok(filename.as_bytes().to_vec())
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
