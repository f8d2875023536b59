#[macro_use]
extern crate lazy_static;

pub mod builder;
pub mod cmdline;
pub mod core;
pub mod environment;
pub mod evaluator;
pub mod interpreter;
pub mod printer;
pub mod reader;
mod tokens;
pub mod types;

pub use types::Value;
