//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod clock;
mod profile_index;
mod sample_store;
mod tts_engine;

pub use clock::Clock;
pub use profile_index::{IndexError, ProfileIndexPort, ProfileMap};
pub use sample_store::{SampleStoreError, SampleStorePort};
pub use tts_engine::{SynthesisRequest, SynthesisResponse, TtsEnginePort, TtsError};
