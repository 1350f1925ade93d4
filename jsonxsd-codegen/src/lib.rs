mod basic_types;
mod builder;

pub use basic_types::emit_basic_types;
pub use builder::XsdBuilder;
