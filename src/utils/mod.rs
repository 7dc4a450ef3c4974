// Shared byte and text helpers

pub mod encoding;
pub mod io;
pub mod sanitize;

pub use sanitize::sanitize;
