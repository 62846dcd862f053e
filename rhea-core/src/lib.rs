#![forbid(unsafe_code)]

mod builtins;
mod error;
mod sema;
mod symbols;

pub use builtins::Builtins;
pub use error::CheckError;
pub use sema::{check_module, Checker};
pub use symbols::SymbolTable;
