//! Socket gateways — one session task per connection.
//!
//! - [`panel`]: Browser control panels on the base port.
//! - [`client`]: Game clients on the base port + 1.

pub mod client;
pub mod panel;

pub use client::client_handler;
pub use panel::panel_handler;
