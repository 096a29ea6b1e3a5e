//! Quarry Site Library
//!
//! Site-access matching: derive a named configuration scope from the shape
//! of an incoming request.

pub mod matcher;
pub mod port;
pub mod request;

pub use matcher::{MapMatcher, Matcher};
pub use port::PortMatcher;
pub use request::SimplifiedRequest;
