//! Script templates: kinds, sources, filters and rendering.

pub mod filters;
pub mod kind;
pub mod manager;
pub mod source;

pub use kind::*;
pub use manager::*;
pub use source::*;
