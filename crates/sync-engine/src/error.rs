//! 에러 타입 정의.

use std::fmt;

/// 동기화 엔진 에러 타입.
#[derive(Debug)]
pub enum SyncError {
    /// 저장소 에러
    Data(sync_data::DataError),
    /// 제공자 에러
    Provider(sync_provider::ProviderError),
    /// 설정 에러
    Config(String),
    /// 일반 에러
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(e) => write!(f, "Data error: {}", e),
            Self::Provider(e) => write!(f, "Provider error: {}", e),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Other(e) => write!(f, "Error: {}", e),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<sync_data::DataError> for SyncError {
    fn from(err: sync_data::DataError) -> Self {
        Self::Data(err)
    }
}

impl From<sync_provider::ProviderError> for SyncError {
    fn from(err: sync_provider::ProviderError) -> Self {
        Self::Provider(err)
    }
}

impl From<sync_core::CoreError> for SyncError {
    fn from(err: sync_core::CoreError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result 타입 별칭.
pub type Result<T> = std::result::Result<T, SyncError>;
