//! Tool domain: catalog, typed invocations, validation, and results.
//!
//! The registry ([`entities::ToolSpec`]) is a closed, exact-match catalog.
//! Raw model requests arrive as loosely-typed [`entities::ToolCall`]s and
//! are converted into the strongly-typed [`invocation::ToolInvocation`]
//! variant set before any tool body runs. Unknown names are a distinct
//! parse case, not an error the loop would propagate.

pub mod entities;
pub mod invocation;
pub mod traits;
pub mod value_objects;
