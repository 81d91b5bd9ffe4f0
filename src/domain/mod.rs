//! Domain types and the ports through which the core talks to its collaborators.

pub mod ports;
pub mod product;
pub mod status;
pub mod transition;
pub mod webhook;
