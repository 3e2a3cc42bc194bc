//! 应用层 - 用例编排
//!
//! 包含：
//! - profile_manager: 音色档案存储核心（锁保护的同步 API）
//! - ports: 六边形架构端口定义（ProfileIndex、SampleStore、Clock、TtsEngine）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

mod blocking;

pub mod commands;
pub mod error;
pub mod ports;
pub mod profile_manager;
pub mod queries;

// Re-exports
pub use commands::{
    // Profile commands
    AddSample,
    CreateProfile,
    DeleteProfile,
    RemoveSample,
    RenameProfile,
    // Clone commands
    CloneWithProfile,
    CloneWithReference,
    // Handlers
    handlers::{
        AddSampleHandler, CloneResponse, CloneWithProfileHandler, CloneWithReferenceHandler,
        CreateProfileHandler, DeleteProfileHandler, RemoveSampleHandler, RenameProfileHandler,
    },
};

pub use error::ApplicationError;
pub use profile_manager::ProfileManager;

pub use ports::{
    // Clock
    Clock,
    // Profile index
    IndexError,
    ProfileIndexPort,
    ProfileMap,
    // Sample store
    SampleStoreError,
    SampleStorePort,
    // TTS engine
    SynthesisRequest,
    SynthesisResponse,
    TtsEnginePort,
    TtsError,
};

pub use queries::{
    GetProfile,
    ListProfiles,
    // Handlers
    handlers::{GetProfileHandler, ListProfilesHandler, ProfileView},
};
