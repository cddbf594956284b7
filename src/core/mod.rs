// exprmatrix - core/mod.rs
//
// Core pipeline logic: discovery, parsing, aggregation, export.
// The parser and matrix modules are pure; discovery reads directory
// entries only; export writes to any `Write`.
// Must NOT depend on: app or platform.

pub mod discovery;
pub mod export;
pub mod matrix;
pub mod model;
pub mod parser;
