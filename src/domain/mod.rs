//! Domain Layer - 领域层
//!
//! - Profile Context: 音色档案管理
//! - Language: 合成语言

pub mod profile;

mod language;

pub use language::{Language, DEFAULT_LANGUAGE, SUPPORTED_LANGUAGES};
