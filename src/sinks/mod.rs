//! Destination implementations

pub mod console;
pub mod file;
pub mod memory;
pub mod pretty;

pub use console::ConsoleSink;
pub use file::FileSink;
pub use memory::MemorySink;
pub use pretty::{pretty_console_sink, PrettyConsole};

pub use crate::core::Destination;
