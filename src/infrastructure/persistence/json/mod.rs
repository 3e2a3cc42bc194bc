//! JSON Persistence - 单文档 JSON 持久化实现

mod profile_index;

pub use profile_index::*;
