//! Output formatting

mod formatter;

pub use formatter::ConsoleFormatter;
