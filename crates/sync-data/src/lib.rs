//! 캔들 테이블 저장소.
//!
//! 이 crate는 다음을 제공합니다:
//! - `<schema>.<symbol>_<timeframe>` 캔들 테이블에 대한 조회/업서트
//! - `public.<symbol>_1m` 원본 아카이브 범위 조회 (데드존 채우기용)
//! - JSON 덤프 문서 임포트 (벌크 로더 코어)

pub mod error;
pub mod import;
pub mod storage;

pub use error::{DataError, Result};
pub use import::{import_document, DumpDocument, DumpRow, DumpTable, ImportStats};
pub use storage::archive::MinuteArchive;
pub use storage::candles::CandleStore;
pub use storage::{ArchiveSource, CandleStorage};
