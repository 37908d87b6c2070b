//! Top-level facade crate for healwatch.
//!
//! Re-exports core types and the client library so users can depend on a single crate.

pub mod core {
    pub use healwatch_core::*;
}

pub mod client {
    pub use healwatch_client::*;
}
