//! Markdown pipeline modules.

pub mod block;
pub mod common;
pub mod engine;
pub mod env;
pub mod inlines;
pub mod loader;
pub mod options;
pub mod pipeline;
pub mod plugins;
pub mod render;
pub mod ruler;
pub mod testing;
pub mod token;
