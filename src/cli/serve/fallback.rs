//! Handlers behind the asset server.

use std::sync::Arc;

use anyhow::Result;

use super::handler::{Handler, HttpRequest, Reply};
use crate::asset::AssetPipeline;
use crate::utils::mime::types::{HTML, PLAIN};

/// Terminal handler: plain 404.
pub struct NotFound;

impl Handler for NotFound {
    fn handle(&self, _request: &HttpRequest) -> Result<Reply> {
        Ok(Reply::text(404, PLAIN, "404 Not Found"))
    }
}

/// Index page at `/` linking the current bundles.
///
/// Reads the live store on every request, which is how templates are
/// expected to reference bundles: by looking the paths up, never by
/// hardcoding them.
pub struct IndexPage<N> {
    pipeline: Arc<AssetPipeline>,
    next: N,
}

impl<N: Handler> IndexPage<N> {
    pub fn new(pipeline: Arc<AssetPipeline>, next: N) -> Self {
        Self { pipeline, next }
    }
}

impl<N: Handler> Handler for IndexPage<N> {
    fn handle(&self, request: &HttpRequest) -> Result<Reply> {
        if request.path != "/" || !request.is_read() {
            return self.next.handle(request);
        }

        let store = self.pipeline.current();
        let body = format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>hotbundle</title>\n{}\n</head>\n<body>\n<p>{} pass-through files</p>\n</body>\n</html>\n",
            store.html_tags(),
            store.file_count()
        );
        Ok(Reply::text(200, HTML, body).with_header("Cache-Control", "no-cache"))
    }
}
