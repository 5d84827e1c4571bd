//! 기본 타입 정의.

pub mod schema;
pub mod symbol;
pub mod timeframe;

pub use schema::Schema;
pub use symbol::Symbol;
pub use timeframe::Timeframe;
