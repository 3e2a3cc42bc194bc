//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作

mod clone_commands;
mod profile_commands;

pub mod handlers;

pub use clone_commands::*;
pub use profile_commands::*;
