//! Built-in block rules, in chain order.

pub mod code;
pub mod fence;
pub mod heading;
pub mod hr;
pub mod paragraph;
pub mod reference;
