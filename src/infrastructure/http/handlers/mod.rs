//! HTTP Handlers

mod clone;
mod download;
mod files;
mod profiles;
mod system;
mod upload;

pub use clone::*;
pub use download::*;
pub use files::*;
pub use profiles::*;
pub use system::*;
pub use upload::*;
