use agent_core::docker;
use agent_core::error::{Result, SaturnError};
use agent_core::notify::HttpNotifier;
use agent_core::process::SystemCommandRunner;
use agent_core::run::{RunContext, RunCoordinator};
use tracing::{error, info, instrument, warn};

use crate::app::CliApp;

/// 执行一次完整备份任务
///
/// 顺序固定：清理过期归档、按配置逐服务备份、发送一次通知。
/// 任一服务失败时通知照常发送，进程以失败退出码结束，便于
/// cron 邮件等机制感知。
#[instrument(skip(app))]
pub async fn run_backup_run(app: &CliApp) -> Result<()> {
    info!("🛰️  Saturn 备份任务");
    info!("==================");

    // 工具缺失不提前终止，对应命令会以失败计入任务结果
    if let Err(e) = docker::check_required_tools() {
        warn!("⚠️  {}", e);
    }

    let context = RunContext::from_config(&app.config);
    let notifier = HttpNotifier::with_options(
        app.config.notify.url.clone(),
        app.config.notify.danger_accept_invalid_certs,
    )?;
    let coordinator = RunCoordinator::new(context, SystemCommandRunner, notifier)?;

    let summary = coordinator.execute().await;

    info!("📊 任务结果 (run_id: {}):", summary.run_id);
    info!(
        "   清理: 扫描 {} 个文件, 删除 {} 个过期归档",
        summary.swept.examined, summary.swept.deleted
    );
    for report in &summary.reports {
        if report.failed {
            error!("   ❌ {}", display_service_name(&report.service));
        } else {
            info!("   ✅ {}", report.service);
        }
    }

    if summary.contains_errors {
        // 通知已发出，这里再以退出码向调用方反映失败
        return Err(SaturnError::backup("部分服务备份失败，详见日志"));
    }

    info!("🎉 备份任务全部成功");
    Ok(())
}

fn display_service_name(name: &str) -> &str {
    if name.is_empty() { "(空服务名)" } else { name }
}
