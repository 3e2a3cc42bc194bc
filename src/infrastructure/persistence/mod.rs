//! Persistence Layer - 数据持久化
//!
//! 档案索引以单个 JSON 文档落盘

pub mod json;

pub use self::json::JsonProfileIndex;
