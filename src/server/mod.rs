use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::time::Duration;

use tracing::{info, warn};

use crate::data::registry::ProfileRegistry;

pub mod api;
pub mod routes;

/// Requests larger than this are truncated.
const MAX_REQUEST_BYTES: usize = 1 << 20;
/// A client that stops sending for this long is dropped.
const READ_TIMEOUT: Duration = Duration::from_secs(10);

pub fn run_server(bind_addr: &str, registry: &ProfileRegistry) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_addr)?;
    info!(%bind_addr, profiles = registry.len(), "statcard server listening");

    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                if let Err(err) = handle_connection(&mut stream, registry) {
                    warn!(error = %err, "request error");
                }
            }
            Err(err) => warn!(error = %err, "connection failed"),
        }
    }

    Ok(())
}

fn header_end(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(4)
        .position(|window| window == b"\r\n\r\n")
        .map(|pos| pos + 4)
}

/// Declared body length, capped at [MAX_REQUEST_BYTES].
fn content_length(headers: &str) -> usize {
    headers
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0)
        .min(MAX_REQUEST_BYTES)
}

/// True once the headers and the declared body have arrived, or the size cap is hit.
fn request_complete(request: &[u8]) -> bool {
    if request.len() >= MAX_REQUEST_BYTES {
        return true;
    }
    header_end(request).is_some_and(|end| {
        let headers = String::from_utf8_lossy(&request[..end]);
        request.len() >= end.saturating_add(content_length(&headers))
    })
}

/// Read until [request_complete] or end of stream.
fn read_request<R: Read>(reader: &mut R) -> std::io::Result<Vec<u8>> {
    let mut request = Vec::new();
    let mut chunk = [0_u8; 16_384];
    loop {
        let bytes_read = reader.read(&mut chunk)?;
        if bytes_read == 0 {
            break;
        }
        request.extend_from_slice(&chunk[..bytes_read]);
        if request_complete(&request) {
            break;
        }
    }
    Ok(request)
}

fn handle_connection(stream: &mut TcpStream, registry: &ProfileRegistry) -> std::io::Result<()> {
    stream.set_read_timeout(Some(READ_TIMEOUT))?;
    let raw = read_request(stream)?;
    if raw.is_empty() {
        return Ok(());
    }

    let request = String::from_utf8_lossy(&raw);
    let request_line = request.lines().next().unwrap_or_default();
    let mut request_parts = request_line.split_whitespace();
    let method = request_parts.next().unwrap_or("GET");
    let path = request_parts.next().unwrap_or("/");

    let body = request
        .split_once("\r\n\r\n")
        .or_else(|| request.split_once("\n\n"))
        .map(|(_, body)| body)
        .unwrap_or("");

    let response = routes::route_request(registry, method, path, body);
    info!(method, path, status = response.status_code, "handled request");
    stream.write_all(response.to_http_string().as_bytes())?;
    stream.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_length_header_is_case_insensitive() {
        assert_eq!(content_length("POST / HTTP/1.1\r\ncontent-length: 42\r\n"), 42);
        assert_eq!(content_length("GET / HTTP/1.1\r\nHost: x\r\n"), 0);
        assert_eq!(
            content_length("POST / HTTP/1.1\r\nContent-Length: 18446744073709551615\r\n"),
            MAX_REQUEST_BYTES
        );
    }

    #[test]
    fn oversized_content_length_waits_without_overflow() {
        let request = b"POST /api/parse HTTP/1.1\r\nContent-Length: 18446744073709551615\r\n\r\n{}";
        assert!(!request_complete(request));
        assert!(request_complete(b"POST / HTTP/1.1\r\nContent-Length: 2\r\n\r\n{}"));
        assert!(!request_complete(b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\n{}"));

        let mut reader = std::io::Cursor::new(request.to_vec());
        assert_eq!(read_request(&mut reader).unwrap(), request.to_vec());
    }

    #[test]
    fn header_end_finds_blank_line() {
        assert_eq!(header_end(b"GET / HTTP/1.1\r\n\r\n{}"), Some(18));
        assert_eq!(header_end(b"GET / HTTP/1.1\r\n"), None);
    }
}
