//! 동기화 워크플로우 모듈.

pub mod reconcile;
pub mod staleness;
pub mod update;

pub use staleness::{scan_pairs, ScanReport, StatusRow};
pub use update::{run_sync, sync_pair, PairOutcome};
