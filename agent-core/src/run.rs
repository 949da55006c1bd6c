//! 备份任务协调
//!
//! 一次完整任务的固定顺序：清理过期归档、按配置顺序逐个备份
//! 服务、发送一次结果通知。单个服务失败不会中断任务，但会让
//! 整次任务被标记为含错误。

use crate::backup::{BackupExecutor, ServiceBackupReport};
use crate::config::AppConfig;
use crate::constants::notify as notify_consts;
use crate::error::Result;
use crate::notify::Notifier;
use crate::process::CommandRunner;
use crate::sweep::{RetentionSweeper, SweepReport};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

/// 一次备份任务所需的全部参数
#[derive(Debug, Clone)]
pub struct RunContext {
    /// 按备份顺序排列的服务名，可能包含空串条目
    pub services: Vec<String>,
    pub base_dir: PathBuf,
    pub backup_dir: PathBuf,
    /// 归档保留期限
    pub age_limit: Duration,
    pub verify_archive: bool,
}

impl RunContext {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            services: config.service_names(),
            base_dir: config.base_dir(),
            backup_dir: config.backup_dir(),
            age_limit: config.age_limit(),
            verify_archive: config.backup.verify_archive,
        }
    }
}

/// 一次完整备份任务的汇总结果
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub swept: SweepReport,
    pub reports: Vec<ServiceBackupReport>,
    /// 任一服务失败即为 true
    pub contains_errors: bool,
}

impl RunSummary {
    /// 本次任务对应的通知消息
    pub fn notification_message(&self) -> &'static str {
        if self.contains_errors {
            notify_consts::CONTAINS_ERRORS_MESSAGE
        } else {
            notify_consts::COMPLETED_MESSAGE
        }
    }

    /// 失败服务的名称列表
    pub fn failed_services(&self) -> Vec<&str> {
        self.reports
            .iter()
            .filter(|report| report.failed)
            .map(|report| report.service.as_str())
            .collect()
    }
}

/// 备份任务协调器
pub struct RunCoordinator<R, N> {
    context: RunContext,
    executor: BackupExecutor<R>,
    sweeper: RetentionSweeper,
    notifier: N,
}

impl<R: CommandRunner, N: Notifier> RunCoordinator<R, N> {
    /// 组装协调器，备份目录不存在时会被建立
    pub fn new(context: RunContext, runner: R, notifier: N) -> Result<Self> {
        let executor = BackupExecutor::new(
            &context.base_dir,
            &context.backup_dir,
            context.verify_archive,
            runner,
        )?;
        let sweeper = RetentionSweeper::new(&context.backup_dir);
        Ok(Self {
            context,
            executor,
            sweeper,
            notifier,
        })
    }

    /// 执行一次完整备份任务
    ///
    /// 服务按配置顺序串行备份，失败只影响结果标记。通知在所有
    /// 步骤结束后恰好发送一次。
    pub async fn execute(&self) -> RunSummary {
        let run_id = Uuid::new_v4();
        info!(
            run_id = %run_id,
            services = self.context.services.len(),
            "开始备份任务"
        );

        // 清理与新归档写入共享备份目录，先后执行不交错
        let swept = self.sweeper.sweep(self.context.age_limit).await;

        let mut reports = Vec::with_capacity(self.context.services.len());
        let mut contains_errors = false;
        for service in &self.context.services {
            let report = self.executor.backup_service(service).await;
            contains_errors = contains_errors || report.failed;
            reports.push(report);
        }

        let summary = RunSummary {
            run_id,
            swept,
            reports,
            contains_errors,
        };

        if summary.contains_errors {
            warn!(
                run_id = %run_id,
                "备份任务结束，失败服务: {:?}",
                summary.failed_services()
            );
        } else {
            info!(run_id = %run_id, "备份任务全部成功");
        }

        self.notifier.notify(summary.notification_message()).await;
        summary
    }
}
