//! MIME type constants.
//!
//! The asset pipeline maps a fixed, short list of suffixes, so these are
//! the exact strings sent in `Content-Type`.

/// Common MIME type constants.
pub mod types {
    // Text
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain";
    pub const CSS: &str = "text/css";
    pub const JAVASCRIPT: &str = "text/javascript";
    pub const JSON: &str = "application/json";
    pub const XML: &str = "application/xml";

    // Images
    pub const PNG: &str = "image/png";
    pub const JPG: &str = "image/jpg";
    pub const SVG: &str = "image/svg+xml";
    pub const ICO: &str = "image/x-icon";
}
