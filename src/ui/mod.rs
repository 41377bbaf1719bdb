//! RepoScout UI layer.
//!
//! Uses `wry` for cross-platform WebView rendering:
//! - Windows: WebView2 (Chromium-based)
//! - Linux: WebKitGTK
//! - macOS: WKWebView
//!
//! Internal pages are rendered from the pure functions in [`crate::pages`]
//! and served over a custom protocol. Communication between the Rust side
//! and the page JS uses wry IPC; network work runs on a tokio runtime and
//! re-enters the event loop as user events.

pub mod webview_app;
