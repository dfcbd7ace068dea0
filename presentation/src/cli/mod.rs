//! CLI argument definitions

pub mod commands;
