//! Interface adapters: CSV replay input and table output.

pub mod csv;
