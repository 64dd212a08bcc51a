//! Relay core — fan-out between panels and game clients.
//!
//! - [`messages`]: Wire contract and decoding.
//! - [`clients`]: Live client set.
//! - [`panels`]: Panel broadcast hub.
//! - [`broadcaster`]: Routing in both directions.

pub mod broadcaster;
pub mod clients;
pub mod messages;
pub mod panels;

pub use broadcaster::{Outcome, Relay};
pub use clients::{ClientId, ClientRegistry};
pub use messages::{ClientCommand, ClientReport, PanelEvent, PanelRequest, RelayError};
pub use panels::PanelHub;
