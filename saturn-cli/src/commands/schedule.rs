use agent_core::config::validate_cron_expression;
use agent_core::error::{Result, SaturnError};
use tracing::{error, info};

use crate::app::CliApp;

/// 查看或设置备份计划的 cron 表达式
///
/// 表达式只在这里校验并写回配置文件，实际调度由系统 crontab
/// 触发 saturn-cli run 完成。
pub async fn run_schedule(app: &mut CliApp, expression: Option<String>) -> Result<()> {
    match expression {
        Some(expr) => {
            if !validate_cron_expression(&expr) {
                error!("❌ 无效的 cron 表达式: '{}'", expr);
                info!("💡 表达式需要 5 个字段: 分 时 日 月 周，例如 '0 2 * * *'");
                return Err(SaturnError::custom(format!("无效的 cron 表达式: '{expr}'")));
            }

            app.config.schedule.cron = expr.clone();
            app.config.save_to_file(&app.config_path)?;

            info!("✅ cron 表达式已更新: {}", expr);
            info!("💡 本工具不内置定时器，请同步更新系统 crontab:");
            info!("   {} saturn-cli run", expr);
        }
        None => {
            info!("📋 当前备份计划:");
            info!("   cron 表达式: {}", app.config.schedule.cron);
            info!("   crontab 配置示例:");
            info!("   {} saturn-cli run", app.config.schedule.cron);
        }
    }
    Ok(())
}
