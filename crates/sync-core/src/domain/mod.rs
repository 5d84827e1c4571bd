//! 도메인 모델 정의.

pub mod candle;
pub mod deadzone;
pub mod reconcile;
pub mod staleness;

pub use candle::{Candle, CandleColor};
pub use deadzone::Deadzone;
pub use reconcile::{BoundaryCheck, FixedPolicy, MismatchResolution, SyncPolicy};
pub use staleness::Staleness;
