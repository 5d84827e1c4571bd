//! tracing을 사용한 로깅 인프라.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 로깅 시스템을 초기화합니다.
///
/// `RUST_LOG` 환경변수가 설정되어 있으면 그 필터를 사용하고, 없으면
/// 전달받은 레벨을 기본값으로 사용합니다.
pub fn init(default_level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    Ok(())
}
