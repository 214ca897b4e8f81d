//! Platform bindings provided by the presentation layer

pub mod console;

pub use console::ConsoleAdapter;
