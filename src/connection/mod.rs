//! The `connection` module defines what a connection to an in-process broker
//! carries: the handle returned by `connect`, the credentials presented with
//! it, and the rules for deriving a broker name from connection input.

pub mod context;
pub mod uri;

pub use context::{ConnectionContext, Credentials};
pub use uri::broker_name_from_uri;

#[cfg(test)]
mod tests;
