//! Shared types: resource kinds, identities, descriptor headers, configuration

mod config;
mod descriptor;
mod kind;
mod reference;

pub use config::*;
pub use descriptor::*;
pub use kind::*;
pub use reference::*;
