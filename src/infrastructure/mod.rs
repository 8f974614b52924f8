//! Infrastructure adapters for the domain ports: in-memory stores, clocks
//! and capability guards.

pub mod clock;
pub mod guards;
pub mod in_memory;
