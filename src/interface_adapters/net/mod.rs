// Network adapter: TCP connections speaking the line protocol.

pub mod client;
pub mod framing;
pub mod session;

pub use client::{NetError, SESSION_OUTBOUND_CAPACITY, handle_connection};
