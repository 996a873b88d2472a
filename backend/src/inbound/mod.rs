//! Inbound adapters translating external requests into domain port calls.
//!
//! The HTTP gateway in [`http`] is currently the only transport.

pub mod http;
