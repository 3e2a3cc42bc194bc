//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod clock;
pub mod storage;
pub mod tts;

pub use clock::*;
pub use storage::*;
pub use tts::*;
