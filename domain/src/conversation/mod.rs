//! Conversation domain: turns, model responses, and stream events

pub mod entities;
pub mod response;
pub mod stream;
