//! Real-time relay between browser control panels and Kerbal Space Program
//! game clients.

pub mod api;
pub mod config;
pub mod gateway;
pub mod relay;
