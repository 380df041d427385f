//! Platform layer
//!
//! The simulation is host-agnostic. On the web the JS page drives a
//! [`WebSession`] through wasm-bindgen; natively the binary drives a
//! [`Session`](crate::Session) directly.

#[cfg(target_arch = "wasm32")]
mod web;
#[cfg(target_arch = "wasm32")]
pub use web::WebSession;
