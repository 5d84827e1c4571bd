//! 캔들 덤프 일괄 적재 CLI.
//!
//! JSON 덤프 문서 두 개(backtest_data.json, fronttest_data.json)를
//! 읽어 각각 backtest, fronttest 스키마의 캔들 테이블에 업서트합니다.
//! 문서가 없거나 읽기에 실패하면 보고 후 다음 문서로 진행합니다.
//!
//! # 사용 예시
//!
//! ```bash
//! # 현재 디렉터리의 덤프 파일을 적재
//! sync-cli
//!
//! # 덤프 파일이 있는 디렉터리 지정
//! sync-cli --data-dir ./dumps
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use sync_core::Schema;
use sync_data::{import_document, CandleStore, DumpDocument};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "sync-cli")]
#[command(about = "Candle Dump Bulk Loader", long_about = None)]
#[command(version)]
struct Cli {
    /// 덤프 파일이 있는 디렉터리
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// 적재할 덤프 문서와 대상 스키마.
const DOCUMENTS: [(&str, Schema); 2] = [
    ("backtest_data.json", Schema::Backtest),
    ("fronttest_data.json", Schema::Fronttest),
];

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    sync_core::logging::init(&format!("sync_cli={}", cli.log_level))
        .map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {e}"))?;

    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL 환경변수가 설정되지 않았습니다")?;

    let pool = sqlx::PgPool::connect(&database_url)
        .await
        .context("데이터베이스 연결 실패")?;
    info!("데이터베이스 연결 성공");

    let mut failures = 0usize;

    for (file_name, schema) in DOCUMENTS {
        let path = cli.data_dir.join(file_name);

        let document = match load_document(&path) {
            Ok(document) => document,
            Err(e) => {
                error!(path = %path.display(), error = %e, "덤프 문서 읽기 실패, 다음 문서로 진행");
                failures += 1;
                continue;
            }
        };

        info!(
            path = %path.display(),
            schema = %schema,
            tables = document.tables.len(),
            "덤프 문서 적재 시작"
        );

        let pb = ProgressBar::new(document.tables.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )?
                .progress_chars("#>-"),
        );

        let store = CandleStore::new(pool.clone(), schema);
        match import_document(&store, document).await {
            Ok(stats) => {
                pb.finish_with_message("Import completed");
                info!(
                    schema = %schema,
                    tables = stats.tables,
                    rows_written = stats.rows_written,
                    skipped_empty = stats.skipped_empty,
                    skipped_unknown = stats.skipped_unknown,
                    "덤프 문서 적재 완료"
                );
            }
            Err(e) => {
                pb.abandon_with_message("Import failed");
                error!(schema = %schema, error = %e, "덤프 문서 적재 실패, 다음 문서로 진행");
                failures += 1;
            }
        }
    }

    pool.close().await;

    if failures > 0 {
        warn!(failures, "일부 덤프 문서를 적재하지 못했습니다");
    }
    info!("일괄 적재 종료");

    Ok(())
}

/// 덤프 문서를 파일에서 읽고 역직렬화합니다.
fn load_document(path: &Path) -> Result<DumpDocument> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("{} 읽기 실패", path.display()))?;
    let document: DumpDocument =
        serde_json::from_str(&raw).with_context(|| format!("{} 파싱 실패", path.display()))?;
    Ok(document)
}
