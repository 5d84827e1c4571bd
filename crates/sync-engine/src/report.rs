//! 캔들 테이블 상태 표 출력.

use crate::modules::staleness::StatusRow;
use sync_core::Staleness;

/// 한 행을 표 형식 문자열로 만듭니다.
pub fn format_row(row: &StatusRow) -> String {
    let table = format!("{}_{}", row.symbol, row.timeframe);

    let (latest, status) = match &row.staleness {
        Staleness::UpToDate { stored_latest } => (
            stored_latest.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            "✅".to_string(),
        ),
        Staleness::Stale { stored_latest } => (
            stored_latest.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            "❌".to_string(),
        ),
        Staleness::NoProviderData => ("NO PROVIDER DATA".to_string(), "❌".to_string()),
        Staleness::NoStoredData => ("NO STORED DATA".to_string(), "❌".to_string()),
    };

    format!("{table:<20}  {latest:<25}  {status:<6}")
}

/// 전체 상태 표를 표준 출력으로 내보냅니다.
pub fn print_status_table(rows: &[StatusRow]) {
    println!("\n---- CANDLE TABLE STATUS ----");
    println!("{:<20}  {:<25}  {:<6}", "Table", "Latest stored candle", "Status");
    for row in rows {
        println!("{}", format_row(row));
    }
    println!();
}
