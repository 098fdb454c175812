//! Request middleware.
//!
//! Currently only request tracing; see [`trace`].

pub mod trace;

pub use trace::Trace;
