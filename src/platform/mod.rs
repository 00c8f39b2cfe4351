//! Platform abstraction layer
//!
//! The core is platform-free; this module adapts it to the browser:
//! - LocalStorage-backed progress/settings storage
//! - A JS-facing session handle that turns raw pointer coordinates into
//!   board input events

#[cfg(target_arch = "wasm32")]
pub mod web;
