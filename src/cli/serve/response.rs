//! Writing replies to `tiny_http` connections.

use std::fs::File;
use std::io::{self, Cursor, Read, Take};

use anyhow::{Result, anyhow};
use tiny_http::{Header, Request, Response, StatusCode};

use super::handler::{Body, Reply};

/// Write a handler reply.
///
/// File bodies are streamed; a read or write failure mid-stream surfaces
/// here and the connection is dropped, never retried.
pub fn respond(request: Request, reply: Reply) -> Result<()> {
    let headers = reply
        .headers
        .iter()
        .map(|(key, value)| make_header(key, value))
        .collect::<Result<Vec<_>>>()?;

    let (reader, len): (Box<dyn Read + Send>, u64) = match reply.body {
        Body::Shared(bytes) => {
            let len = bytes.len() as u64;
            (Box::new(Cursor::new(bytes)), len)
        }
        Body::File { file, len } => (Box::new(ExactReader::new(file, len)), len),
    };

    let response = Response::new(
        StatusCode(reply.status),
        headers,
        reader,
        usize::try_from(len).ok(),
        None,
    );
    request.respond(response)?;
    Ok(())
}

/// File body that yields exactly the advertised length.
///
/// A file that grows after it was opened is cut off at `len`. A file that
/// shrinks fails the read, so the short body surfaces as a respond error.
struct ExactReader {
    file: Take<File>,
    remaining: u64,
}

impl ExactReader {
    fn new(file: File, len: u64) -> Self {
        Self {
            file: file.take(len),
            remaining: len,
        }
    }
}

impl Read for ExactReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 || buf.is_empty() {
            return Ok(0);
        }
        let n = self.file.read(buf)?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("file ended {} bytes short", self.remaining),
            ));
        }
        self.remaining -= n as u64;
        Ok(n)
    }
}

/// Respond with 500 for a handler error (`from_string` sets text/plain).
pub fn respond_error(request: Request) -> Result<()> {
    let response =
        Response::from_string("500 Internal Server Error").with_status_code(StatusCode(500));
    request.respond(response)?;
    Ok(())
}

/// Build a header, rejecting values that would split the header block.
fn make_header(key: &str, value: &str) -> Result<Header> {
    if value.contains(['\r', '\n']) {
        return Err(anyhow!("invalid header {key}: {value:?}"));
    }
    Header::from_bytes(key, value).map_err(|()| anyhow!("invalid header {key}: {value:?}"))
}
