//! TUI views

pub mod grid;
