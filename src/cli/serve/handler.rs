//! Request handlers and the asset server.
//!
//! Handlers are transport-agnostic: they turn an [`HttpRequest`] into a
//! [`Reply`], and the request loop writes that reply to the connection.
//! [`AssetServer`] wraps a `next` handler, so it sits in front of the rest
//! of the application and only answers the paths it knows about.

use std::fs::File;
use std::sync::Arc;

use anyhow::{Context, Result};
use tiny_http::Method;

use crate::asset::AssetPipeline;

use super::path::request_path;

/// The parts of an incoming request handlers look at.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// Decoded URL path without query string.
    pub path: String,
}

impl HttpRequest {
    pub fn new(method: Method, url: &str) -> Self {
        Self {
            method,
            path: request_path(url),
        }
    }

    pub fn is_read(&self) -> bool {
        matches!(self.method, Method::Get | Method::Head)
    }
}

/// Response body.
#[derive(Debug)]
pub enum Body {
    /// In-memory bytes shared with the bundle store.
    Shared(Arc<[u8]>),
    /// Open file streamed to the client, closed when the body is dropped.
    ///
    /// `len` is taken from metadata at open time and sent as
    /// `Content-Length`. If the file shrinks before it is streamed, the
    /// response is truncated and the write fails with `UnexpectedEof`.
    File { file: File, len: u64 },
}

/// A complete response, ready to be written.
#[derive(Debug)]
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Body,
}

impl Reply {
    pub fn new(status: u16, content_type: &str, body: Body) -> Self {
        Self {
            status,
            headers: vec![("Content-Type", content_type.to_string())],
            body,
        }
    }

    pub fn text(status: u16, content_type: &str, text: impl Into<String>) -> Self {
        let bytes: Arc<[u8]> = Arc::from(text.into().into_bytes());
        Self::new(status, content_type, Body::Shared(bytes))
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }
}

#[cfg(test)]
impl Reply {
    /// First value of header `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Something that can answer a request.
pub trait Handler: Send + Sync {
    fn handle(&self, request: &HttpRequest) -> Result<Reply>;
}

impl<F> Handler for F
where
    F: Fn(&HttpRequest) -> Result<Reply> + Send + Sync,
{
    fn handle(&self, request: &HttpRequest) -> Result<Reply> {
        self(request)
    }
}

/// Serves bundles and pass-through files; delegates everything else.
///
/// Resolution order per request:
/// 1. dev mode only: rebuild and publish a fresh store
/// 2. style or script bundle by exact virtual path
/// 3. pass-through file by request key
/// 4. `next`
pub struct AssetServer<N> {
    pipeline: Arc<AssetPipeline>,
    cache_control: String,
    next: N,
}

impl<N: Handler> AssetServer<N> {
    pub fn new(pipeline: Arc<AssetPipeline>, cache_control: impl Into<String>, next: N) -> Self {
        Self {
            pipeline,
            cache_control: cache_control.into(),
            next,
        }
    }

    /// Attach `Cache-Control` unless hot reload is on.
    ///
    /// Dev bundle paths never change while their content does, so dev
    /// responses carry no cache directive at all.
    fn cached(&self, reply: Reply) -> Reply {
        if self.pipeline.is_dev() {
            reply
        } else {
            reply.with_header("Cache-Control", self.cache_control.as_str())
        }
    }
}

impl<N: Handler> Handler for AssetServer<N> {
    fn handle(&self, request: &HttpRequest) -> Result<Reply> {
        // Blocking rebuild: dev mode trades latency for freshness
        let store = if self.pipeline.is_dev() {
            self.pipeline
                .rebuild()
                .context("hot reload: asset rebuild failed")?
        } else {
            self.pipeline.current()
        };

        if let Some(bundle) = store.bundle(&request.path) {
            let body = Body::Shared(Arc::clone(&bundle.content));
            return Ok(self.cached(Reply::new(200, bundle.kind.content_type(), body)));
        }

        if let Some(record) = store.file(&request.path) {
            let path = &record.physical_path;
            let file =
                File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            let len = file
                .metadata()
                .with_context(|| format!("failed to stat {}", path.display()))?
                .len();
            let body = Body::File { file, len };
            return Ok(self.cached(Reply::new(200, record.content_type, body)));
        }

        self.next.handle(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::BuildOptions;
    use crate::utils::mime::types;
    use std::fs;
    use std::io::Read;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    const CACHE: &str = "public, max-age=15552000";

    fn fallback(request: &HttpRequest) -> Result<Reply> {
        Ok(Reply::text(418, types::PLAIN, format!("fallback {}", request.path)))
    }

    fn get(path: &str) -> HttpRequest {
        HttpRequest::new(Method::Get, path)
    }

    fn server(dir: &Path, dev: bool) -> AssetServer<fn(&HttpRequest) -> Result<Reply>> {
        let pipeline = AssetPipeline::new(BuildOptions::new(dir, dev)).unwrap();
        let next: fn(&HttpRequest) -> Result<Reply> = fallback;
        AssetServer::new(Arc::new(pipeline), CACHE, next)
    }

    fn body_bytes(reply: Reply) -> Vec<u8> {
        match reply.body {
            Body::Shared(bytes) => bytes.to_vec(),
            Body::File { mut file, len } => {
                let mut buf = Vec::new();
                file.read_to_end(&mut buf).unwrap();
                assert_eq!(buf.len() as u64, len);
                buf
            }
        }
    }

    fn write_site(dir: &Path) {
        fs::write(dir.join("a.css"), "body{color:red;}").unwrap();
        fs::write(dir.join("b.css"), "body{color:  red; }").unwrap();
        fs::write(dir.join("app.js"), "window.ready = 1;").unwrap();
        fs::write(dir.join("logo.png"), [0x89, b'P', b'N', b'G', 0, 1]).unwrap();
    }

    #[test]
    fn test_serves_style_bundle() {
        let dir = TempDir::new().unwrap();
        write_site(dir.path());
        let server = server(dir.path(), false);
        let store = server.pipeline.current();

        let reply = server.handle(&get(&store.style.virtual_path)).unwrap();

        assert_eq!(reply.status, 200);
        assert_eq!(reply.header("Content-Type"), Some(types::CSS));
        assert_eq!(reply.header("Cache-Control"), Some(CACHE));
        assert_eq!(body_bytes(reply), store.style.content.to_vec());
    }

    #[test]
    fn test_serves_script_bundle() {
        let dir = TempDir::new().unwrap();
        write_site(dir.path());
        let server = server(dir.path(), false);
        let store = server.pipeline.current();

        let reply = server.handle(&get(&store.script.virtual_path)).unwrap();

        assert_eq!(reply.status, 200);
        assert_eq!(reply.header("Content-Type"), Some(types::JAVASCRIPT));
        assert_eq!(body_bytes(reply), store.script.content.to_vec());
    }

    #[test]
    fn test_serves_pass_through_file() {
        let dir = TempDir::new().unwrap();
        write_site(dir.path());
        let server = server(dir.path(), false);

        let reply = server.handle(&get("/logo.png?v=3")).unwrap();

        assert_eq!(reply.status, 200);
        assert_eq!(reply.header("Content-Type"), Some(types::PNG));
        assert_eq!(reply.header("Cache-Control"), Some(CACHE));
        assert_eq!(body_bytes(reply), vec![0x89, b'P', b'N', b'G', 0, 1]);
    }

    #[test]
    fn test_unknown_path_reaches_fallback() {
        let dir = TempDir::new().unwrap();
        write_site(dir.path());
        let server = server(dir.path(), false);

        let reply = server.handle(&get("/does-not-exist.xyz")).unwrap();

        assert_eq!(reply.status, 418);
        assert_eq!(body_bytes(reply), b"fallback /does-not-exist.xyz".to_vec());
    }

    #[test]
    fn test_raw_sources_are_not_served() {
        let dir = TempDir::new().unwrap();
        write_site(dir.path());
        let server = server(dir.path(), false);

        assert_eq!(server.handle(&get("/a.css")).unwrap().status, 418);
        assert_eq!(server.handle(&get("/app.js")).unwrap().status, 418);
    }

    #[test]
    fn test_dev_mode_omits_cache_header() {
        let dir = TempDir::new().unwrap();
        write_site(dir.path());
        let server = server(dir.path(), true);

        let reply = server.handle(&get("/output.dev.css")).unwrap();
        assert_eq!(reply.status, 200);
        assert_eq!(reply.header("Cache-Control"), None);

        let reply = server.handle(&get("/logo.png")).unwrap();
        assert_eq!(reply.status, 200);
        assert_eq!(reply.header("Content-Type"), Some(types::PNG));
        assert_eq!(reply.header("Cache-Control"), None);
    }

    #[test]
    fn test_dev_mode_reflects_disk_changes() {
        let dir = TempDir::new().unwrap();
        write_site(dir.path());
        let server = server(dir.path(), true);

        let before = body_bytes(server.handle(&get("/output.dev.js")).unwrap());
        fs::write(dir.path().join("app.js"), "window.ready = 2;").unwrap();
        let after = body_bytes(server.handle(&get("/output.dev.js")).unwrap());
        assert_ne!(before, after);

        // New files are picked up without a restart
        assert_eq!(server.handle(&get("/new.svg")).unwrap().status, 418);
        fs::write(dir.path().join("new.svg"), "<svg/>").unwrap();
        assert_eq!(server.handle(&get("/new.svg")).unwrap().status, 200);
    }

    #[test]
    fn test_dev_rebuild_failure_fails_request_only() {
        let dir = TempDir::new().unwrap();
        write_site(dir.path());
        let server = server(dir.path(), true);
        let before = server.pipeline.current();

        fs::write(dir.path().join("broken.js"), "function (").unwrap();
        let err = server.handle(&get("/logo.png")).unwrap_err();
        assert!(format!("{err:#}").contains("JavaScript"));
        assert!(Arc::ptr_eq(&before, &server.pipeline.current()));

        fs::remove_file(dir.path().join("broken.js")).unwrap();
        assert_eq!(server.handle(&get("/logo.png")).unwrap().status, 200);
    }

    #[test]
    fn test_dev_rebuild_on_single_worker() {
        let dir = TempDir::new().unwrap();
        write_site(dir.path());
        fs::create_dir_all(dir.path().join("img/icons")).unwrap();
        fs::write(dir.path().join("img/icons/home.svg"), "<svg/>").unwrap();
        let server = server(dir.path(), true);

        // Request workers run on a fixed pool; rebuilds must not need a spare thread
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .unwrap();
        pool.install(|| {
            let reply = server.handle(&get("/logo.png")).unwrap();
            assert_eq!(reply.status, 200);

            let reply = server.handle(&get("/img/icons/home.svg")).unwrap();
            assert_eq!(reply.status, 200);

            let reply = server.handle(&get("/output.dev.js")).unwrap();
            assert_eq!(reply.status, 200);
            assert_eq!(reply.header("Content-Type"), Some(types::JAVASCRIPT));
        });
    }

    #[test]
    fn test_missing_physical_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        write_site(dir.path());
        let server = server(dir.path(), false);

        fs::remove_file(dir.path().join("logo.png")).unwrap();
        let err = server.handle(&get("/logo.png")).unwrap_err();
        assert!(err.to_string().contains("logo.png"));
    }

    #[test]
    fn test_closure_handler_chain() {
        let dir = TempDir::new().unwrap();
        write_site(dir.path());
        let calls = AtomicUsize::new(0);
        let pipeline = Arc::new(AssetPipeline::new(BuildOptions::new(dir.path(), false)).unwrap());
        let server = AssetServer::new(pipeline, CACHE, |_: &HttpRequest| -> Result<Reply> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Reply::text(404, types::PLAIN, "nope"))
        });

        server.handle(&get("/logo.png")).unwrap();
        server.handle(&get("/missing")).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_request_methods() {
        assert!(HttpRequest::new(Method::Get, "/").is_read());
        assert!(HttpRequest::new(Method::Head, "/").is_read());
        assert!(!HttpRequest::new(Method::Post, "/").is_read());
    }
}
