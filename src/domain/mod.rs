//! Domain layer: value objects, the commitment entity and the ports the
//! engine depends on.

pub mod account;
pub mod commitment;
pub mod notification;
pub mod ports;
