//! Actix middleware wrapped around the whole app.

pub mod trace;

pub use trace::Trace;
