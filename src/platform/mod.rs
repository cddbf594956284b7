// exprmatrix - platform/mod.rs
//
// Platform abstraction layer: filesystem reads and config resolution.
// Dependencies: standard library, directories crate, core model types.
// Must NOT depend on: app.

pub mod config;
pub mod fs;
