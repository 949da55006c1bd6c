use agent_core::archive;
use agent_core::backup::BackupExecutor;
use agent_core::docker;
use agent_core::error::{Result, SaturnError};
use agent_core::process::SystemCommandRunner;
use chrono::{DateTime, Local};
use std::path::Path;
use tracing::{error, info, instrument, warn};

use crate::app::CliApp;

/// 仅执行服务备份，不清理过期归档也不发送通知
#[instrument(skip(app))]
pub async fn run_backup(app: &CliApp, service: Option<String>) -> Result<()> {
    info!("💾 创建数据备份");
    info!("===============");

    if let Err(e) = docker::check_required_tools() {
        warn!("⚠️  {}", e);
    }

    let executor = BackupExecutor::new(
        app.config.base_dir(),
        app.config.backup_dir(),
        app.config.backup.verify_archive,
        SystemCommandRunner,
    )?;

    let services = match service {
        Some(name) => vec![name],
        None => app.config.service_names(),
    };

    let mut contains_errors = false;
    for name in &services {
        let report = executor.backup_service(name).await;
        if report.failed {
            contains_errors = true;
            continue;
        }
        if let Some(path) = &report.archive_path {
            let size = tokio::fs::metadata(path).await.map(|m| m.len()).unwrap_or(0);
            info!("   📦 {} -> {} ({})", name, path.display(), format_size(size));
        }
    }

    if contains_errors {
        return Err(SaturnError::backup("部分服务备份失败，详见日志"));
    }
    info!("🎉 备份完成");
    Ok(())
}

/// 列出备份目录下的归档文件
pub async fn run_list_backups(app: &CliApp) -> Result<()> {
    let backup_dir = app.config.backup_dir();
    let archives = archive::list_archives(&backup_dir).await?;

    if archives.is_empty() {
        info!("📦 暂无备份归档");
        info!("💡 使用以下命令创建备份:");
        info!("   saturn-cli run");
        return Ok(());
    }

    info!("📦 备份归档列表");
    info!("================");
    info!("{:<44} {:<10} {}", "文件", "大小", "修改时间");
    info!("{}", "-".repeat(78));

    let mut total_size = 0u64;
    for entry in &archives {
        total_size += entry.size;
        let name = entry
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| entry.path.display().to_string());
        let modified: DateTime<Local> = entry.modified.into();
        info!(
            "{:<44} {:<10} {}",
            name,
            format_size(entry.size),
            modified.format("%Y-%m-%d %H:%M:%S")
        );
    }

    info!("{}", "-".repeat(78));
    info!(
        "📊 共 {} 个归档, 总大小 {}",
        archives.len(),
        format_size(total_size)
    );
    Ok(())
}

/// 校验归档文件完整性
pub async fn run_verify(file: &Path) -> Result<()> {
    info!("🔍 校验归档: {}", file.display());
    match archive::verify_archive(file).await {
        Ok(entries) => {
            info!("✅ 归档完整 ({} 个条目)", entries);
            Ok(())
        }
        Err(e) => {
            error!("❌ 归档校验失败: {}", e);
            Err(e)
        }
    }
}

/// 人类可读的文件大小
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.1}GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.1}MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.1}KB", size as f64 / KB as f64)
    } else {
        format!("{size}B")
    }
}
