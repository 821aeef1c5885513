//! Asset server with optional hot reload.
//!
//! ```text
//! request ─► AssetServer ─► bundle? ─► 200 text/css | text/javascript
//!                       └─► file?   ─► 200 <recorded type>, streamed
//!                       └─► IndexPage (/) ─► NotFound (404)
//! ```

mod fallback;
mod handler;
mod lifecycle;
mod path;
mod response;

use fallback::{IndexPage, NotFound};
use handler::{AssetServer, Handler, HttpRequest};

use crate::asset::AssetPipeline;
use crate::config::Config;
use crate::log;
use anyhow::{Context, Result};
use std::sync::Arc;
use tiny_http::{Request, Server};

/// Build the asset store, bind, and serve until Ctrl+C.
///
/// The initial build runs before binding: a broken asset tree keeps the
/// server from starting at all.
pub fn serve(config: &Config) -> Result<()> {
    let pipeline = Arc::new(
        AssetPipeline::new(config.build_options())
            .with_context(|| format!("initial asset build failed for {}", config.assets_dir().display()))?,
    );
    super::build::log_store(&pipeline.current());

    let app = AssetServer::new(
        Arc::clone(&pipeline),
        config.assets.cache_control.as_str(),
        IndexPage::new(Arc::clone(&pipeline), NotFound),
    );

    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    lifecycle::setup_shutdown_handler(Arc::clone(&server))?;

    log!("serve"; "http://{}", addr);
    if pipeline.is_dev() {
        log!("serve"; "hot reload on: assets are rebuilt before every request");
    }

    run_request_loop(&server, &app, config.serve.workers)
}

/// Dispatch requests onto a fixed worker pool until the server unblocks.
///
/// Returns once every in-flight request has been answered.
fn run_request_loop<H: Handler>(server: &Server, handler: &H, workers: usize) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("hotbundle-worker-{i}"))
        .build()
        .context("failed to create request thread pool")?;

    pool.in_place_scope(|scope| {
        for request in server.incoming_requests() {
            scope.spawn(move |_| {
                if let Err(e) = handle_request(request, handler) {
                    log!("serve"; "request error: {e:#}");
                }
            });
        }
    });
    Ok(())
}

/// Handle a single HTTP request
///
/// Handler errors (a failed dev rebuild, an unreadable file) become a 500
/// for this request only; the published store is untouched.
fn handle_request<H: Handler>(request: Request, handler: &H) -> Result<()> {
    let req = HttpRequest::new(request.method().clone(), request.url());

    match handler.handle(&req) {
        Ok(reply) => response::respond(request, reply)
            .with_context(|| format!("failed to respond to {} {}", req.method, req.path)),
        Err(e) => {
            log!("error"; "{} {}: {e:#}", req.method, req.path);
            response::respond_error(request)
        }
    }
}
