//! 阻塞调用桥接
//!
//! ProfileManager 是同步的，异步处理器通过阻塞线程池调用它

use crate::application::error::ApplicationError;
use crate::domain::profile::ProfileError;

/// 在阻塞线程池上执行档案操作
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, ApplicationError>
where
    F: FnOnce() -> Result<T, ProfileError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApplicationError::internal(format!("Blocking task failed: {}", e)))?
        .map_err(ApplicationError::from)
}
