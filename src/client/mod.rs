//! Browser-side behavior of the starter, expressed against small platform traits.
//!
//! The page (`static/index.html`) and the service worker (`static/sw.js`) run this logic in
//! the browser. Here each piece is a plain state machine so it can be embedded in a wasm
//! front end or driven by tests with fake platforms. Browsers are single-threaded, so the
//! async traits are `?Send`.

use thiserror::Error;

pub mod install;
pub mod push_controller;
pub mod service_worker;

/// A failed browser or network call. Never surfaced to callers; it ends up as a toast.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct PlatformError(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toast {
    Success(String),
    Error(String),
    Warning(String),
    Info(String),
}

/// Where user-visible feedback goes.
pub trait Toaster {
    fn show(&self, toast: Toast);
}
