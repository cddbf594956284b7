// exprmatrix - app/mod.rs
//
// Application layer: run orchestration.
// Dependencies: core layer, platform layer.

pub mod pipeline;
