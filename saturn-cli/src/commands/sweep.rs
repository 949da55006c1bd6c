use agent_core::error::Result;
use agent_core::sweep::RetentionSweeper;
use tracing::{info, instrument, warn};

use crate::app::CliApp;

/// 仅清理过期归档
#[instrument(skip(app))]
pub async fn run_sweep(app: &CliApp) -> Result<()> {
    info!(
        "🧹 清理过期归档 (保留 {} 天)",
        app.config.backup.retention_days
    );

    let sweeper = RetentionSweeper::new(app.config.backup_dir());
    let report = sweeper.sweep(app.config.age_limit()).await;

    info!(
        "📊 清理结果: 扫描 {} 个文件, 删除 {} 个, 失败 {} 个",
        report.examined, report.deleted, report.failed
    );
    if report.failed > 0 {
        warn!("⚠️  部分文件删除失败，详见日志");
    }
    Ok(())
}
