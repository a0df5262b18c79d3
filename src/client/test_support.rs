//! In-process mock servers for exercising the protocol halves in tests.

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

/// Reads one full HTTP/1.1 request from `stream` (headers plus a
/// `Content-Length`-delimited body) and returns the raw bytes.
pub async fn read_http_request(stream: &mut TcpStream) -> Vec<u8> {
    let mut request = Vec::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = stream.read(&mut buf).await.unwrap();
        request.extend_from_slice(&buf[..n]);
        if n == 0 || request_complete(&request) {
            return request;
        }
    }
}

fn request_complete(raw: &[u8]) -> bool {
    let Some(headers_end) = raw.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let headers = String::from_utf8_lossy(&raw[..headers_end]);
    let content_length = headers
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);
    raw.len() >= headers_end + 4 + content_length
}

/// Writes a canned HTTP/1.1 response and closes the write side.
pub async fn write_http_response(stream: &mut TcpStream, status_line: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await.unwrap();
    stream.shutdown().await.unwrap();
}

/// One-shot HTTP server: accepts a single connection, answers with the
/// given status line and body, and hands back the captured request bytes.
pub async fn one_shot_http_server(
    status_line: &'static str,
    body: &'static str,
) -> (String, JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_http_request(&mut stream).await;
        write_http_response(&mut stream, status_line, body).await;
        request
    });
    (format!("http://{}", addr), handle)
}

/// Accepts one WebSocket connection on `listener`, reads the hello frame,
/// replies with `frames` in order, then closes. Returns the raw hello.
pub async fn serve_watch_session(listener: &TcpListener, frames: Vec<String>) -> String {
    let (stream, _) = listener.accept().await.unwrap();
    let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
    let hello = match ws.next().await.unwrap().unwrap() {
        Message::Text(text) => text,
        other => panic!("unexpected hello frame: {:?}", other),
    };
    for frame in frames {
        // The client may hang up early after a stop/error callback.
        if ws.send(Message::Text(frame)).await.is_err() {
            break;
        }
    }
    let _ = ws.close(None).await;
    hello
}

/// One-shot watch server on its own listener.
pub async fn one_shot_watch_server(frames: Vec<String>) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle =
        tokio::spawn(async move { serve_watch_session(&listener, frames).await });
    (format!("http://{}", addr), handle)
}
