#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Scroll-driven slide deck with lazily started background effects.
//!
//! The navigation core is target independent and tested on the host; the
//! browser shell in `wasm` wires it to the DOM.

pub mod config;
pub mod demo;
pub mod dispatcher;
pub mod effect;
pub mod error;
pub mod feed;
pub mod globe;
pub mod impact;
pub mod input;
pub mod lock;
pub mod navigator;
pub mod particles;
pub mod registry;
pub mod stats;
pub mod timelapse;

pub use config::{DeckConfig, EffectKind, ParticleVariant};
pub use dispatcher::VisibilityDispatcher;
pub use effect::{Effect, EffectHandle, EffectState};
pub use error::{DeckError, Result};
pub use navigator::{SlideNavigator, SlideView, Transition};
pub use registry::EffectRegistry;

// Only compile wasm-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// When compiling for non-wasm targets (e.g., `cargo test` on host),
// provide an empty stub so the crate still builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn main() {}
