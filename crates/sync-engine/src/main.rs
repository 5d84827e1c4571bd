//! 캔들 테이블 동기화 CLI.

use clap::{Args, Parser, Subcommand};
use sync_core::{FixedPolicy, SyncConfig};
use sync_data::{CandleStore, MinuteArchive};
use sync_engine::modules::{run_sync, scan_pairs};
use sync_engine::report::print_status_table;
use sync_provider::YahooProvider;

#[derive(Parser)]
#[command(name = "sync-engine")]
#[command(about = "Candle Table Sync Engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Args)]
struct PolicyArgs {
    /// 경계 캔들 불일치 시 저장된 값 유지 (기본: 제공자 값 유지)
    #[arg(long)]
    prefer_stored: bool,

    /// 1분봉 데드존 자동 보충 비활성화
    #[arg(long)]
    no_gap_fill: bool,
}

impl PolicyArgs {
    fn policy(&self) -> FixedPolicy {
        let base = if self.prefer_stored {
            FixedPolicy::prefer_stored()
        } else {
            FixedPolicy::prefer_provider()
        };
        base.with_gap_fill(!self.no_gap_fill)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// 캔들 테이블 신선도 상태 표 출력
    Status,

    /// 모든 페어 동기화 (최신이 아닌 페어만)
    Sync {
        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// 데몬 모드: 주기적으로 전체 동기화 실행
    Daemon {
        #[command(flatten)]
        policy: PolicyArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    sync_core::logging::init(&format!("sync_engine={}", cli.log_level))?;

    tracing::info!("Candle Sync Engine 시작");

    let config = SyncConfig::from_env()?;
    tracing::debug!(schema = %config.schema, pairs = config.pairs().len(), "설정 로드 완료");

    let pool = sqlx::PgPool::connect(&config.database_url).await?;
    tracing::info!("데이터베이스 연결 성공");

    let store = CandleStore::new(pool.clone(), config.schema);
    let archive = MinuteArchive::new(pool.clone());
    let provider = YahooProvider::new()?;

    match cli.command {
        Commands::Status => {
            let report = scan_pairs(&store, &provider, &config).await;
            print_status_table(&report.rows);
            if report.failed_pairs > 0 {
                tracing::warn!(failed_pairs = report.failed_pairs, "일부 쌍의 신선도 검사 실패");
            }
        }
        Commands::Sync { policy } => {
            let policy = policy.policy();
            let stats = run_sync(&store, &archive, &provider, &policy, &config).await;
            stats.log_summary("캔들 동기화");
        }
        Commands::Daemon { policy } => {
            let policy = policy.policy();
            tracing::info!(
                "=== 데몬 모드 시작 (주기: {}분) ===",
                config.daemon.interval_minutes
            );

            let mut interval = tokio::time::interval(config.daemon.interval());
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("종료 신호 수신, 데몬 종료 중...");
                        break;
                    }
                    _ = interval.tick() => {
                        tracing::info!("=== 동기화 실행 시작 ===");

                        let stats = run_sync(&store, &archive, &provider, &policy, &config).await;
                        stats.log_summary("캔들 동기화");

                        tracing::info!(
                            "=== 동기화 완료, 다음 실행: {}분 후 ===",
                            config.daemon.interval_minutes
                        );
                    }
                }
            }
        }
    }

    pool.close().await;
    tracing::info!("Candle Sync Engine 종료");

    Ok(())
}
