//! Minimal HTTP/1.1 server standing in for Steam and Discord.
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    pub target: String,
    pub body: String,
}

#[derive(Clone)]
struct Reply {
    status: u16,
    body: String,
}

#[derive(Default)]
struct State {
    routes: Vec<(String, Vec<Reply>)>,
    requests: Vec<Request>,
}

pub struct MockServer {
    addr: SocketAddr,
    state: Arc<Mutex<State>>,
}

impl MockServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(State::default()));

        let shared = Arc::clone(&state);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let state = Arc::clone(&shared);
                tokio::spawn(async move {
                    let _ = serve(stream, state).await;
                });
            }
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Answers requests whose target contains `pattern` with `replies` in order. The
    /// last reply repeats. Unrouted requests get a 404.
    pub fn route(&self, pattern: &str, replies: &[(u16, &str)]) {
        let replies = replies
            .iter()
            .map(|(status, body)| Reply {
                status: *status,
                body: body.to_string(),
            })
            .collect();
        self.state
            .lock()
            .unwrap()
            .routes
            .push((pattern.to_string(), replies));
    }

    pub fn requests(&self, pattern: &str) -> Vec<Request> {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|request| request.target.contains(pattern))
            .cloned()
            .collect()
    }
}

async fn serve(stream: TcpStream, state: Arc<Mutex<State>>) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream);

    let mut line = String::new();
    reader.read_line(&mut line).await?;
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();

    let mut content_length = 0;
    loop {
        let mut header = String::new();
        reader.read_line(&mut header).await?;
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }
    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).await?;

    let reply = {
        let mut state = state.lock().unwrap();
        let reply = state
            .routes
            .iter_mut()
            .find(|(pattern, _)| target.contains(pattern.as_str()))
            .map(|(_, replies)| {
                if replies.len() > 1 {
                    replies.remove(0)
                } else {
                    replies[0].clone()
                }
            })
            .unwrap_or(Reply {
                status: 404,
                body: "{}".to_string(),
            });
        state.requests.push(Request {
            method,
            target,
            body: String::from_utf8_lossy(&body).into_owned(),
        });
        reply
    };

    let response = format!(
        "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status,
        reply.body.len(),
        reply.body
    );
    let mut stream = reader.into_inner();
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}
