//! Application use cases

pub mod chat;
