//! Storage Adapter - 文件系统存储实现

mod sample_store;

pub use sample_store::FsSampleStore;
