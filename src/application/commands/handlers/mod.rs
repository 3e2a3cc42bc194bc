//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod clone_handlers;
mod profile_handlers;

pub use clone_handlers::*;
pub use profile_handlers::*;
