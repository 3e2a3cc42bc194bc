//! Profile Context - 音色档案限界上下文
//!
//! 职责:
//! - 音色档案（Profile）聚合及其不变量
//! - 档案 ID 生成规则
//! - 档案错误定义

mod aggregate;
mod errors;
mod value_objects;

pub use aggregate::Profile;
pub use errors::ProfileError;
pub use value_objects::{
    ProfileId, ProfileName, SampleName, CREATED_AT_FORMAT, MAX_NAME_CHARS,
};
