//! 服务备份执行
//!
//! 单个服务的冷备份按固定顺序执行：停止容器、归档数据目录、
//! 重启容器。除空服务名外任何一步失败都不会跳过后续步骤，
//! 服务必须被尝试重启。

use crate::archive;
use crate::constants::docker as docker_consts;
use crate::docker;
use crate::error::Result;
use crate::process::{CommandRunner, CommandStatus};
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// 单个服务一次备份的执行结果
#[derive(Debug, Clone)]
pub struct ServiceBackupReport {
    pub service: String,
    /// 停止命令的退出状态，仅作诊断，不计入失败
    pub stop_status: Option<CommandStatus>,
    /// 归档命令的退出状态
    pub archive_status: Option<CommandStatus>,
    /// 本次备份的归档目标路径
    pub archive_path: Option<PathBuf>,
    /// 重启命令的退出状态
    pub start_status: Option<CommandStatus>,
    /// 本服务备份是否失败
    pub failed: bool,
}

impl ServiceBackupReport {
    pub fn succeeded(&self) -> bool {
        !self.failed
    }

    fn rejected(service: &str) -> Self {
        Self {
            service: service.to_string(),
            stop_status: None,
            archive_status: None,
            archive_path: None,
            start_status: None,
            failed: true,
        }
    }
}

/// 服务备份执行器
#[derive(Debug, Clone)]
pub struct BackupExecutor<R> {
    runner: R,
    base_dir: PathBuf,
    backup_dir: PathBuf,
    verify_archive: bool,
}

impl<R: CommandRunner> BackupExecutor<R> {
    /// 创建执行器，备份目录不存在时会被建立
    pub fn new(
        base_dir: impl Into<PathBuf>,
        backup_dir: impl Into<PathBuf>,
        verify_archive: bool,
        runner: R,
    ) -> Result<Self> {
        let backup_dir = backup_dir.into();
        if !backup_dir.exists() {
            std::fs::create_dir_all(&backup_dir)?;
        }
        Ok(Self {
            runner,
            base_dir: base_dir.into(),
            backup_dir,
            verify_archive,
        })
    }

    /// 备份一个服务
    ///
    /// 空服务名直接判失败，不发起任何外部命令。其余情况下
    /// 停止、归档、重启三步全部执行完毕后汇总结果。
    pub async fn backup_service(&self, service: &str) -> ServiceBackupReport {
        if service.is_empty() {
            error!("服务名为空，跳过备份");
            return ServiceBackupReport::rejected(service);
        }

        let mut failed = false;

        info!("停止服务: {}", service);
        let stop_status = self.runner.run(&docker::stop_invocation(service)).await;
        if !stop_status.success() {
            // 停止失败不计入备份失败，但数据目录此时可能仍在被写入
            warn!(
                "停止服务 {} 失败 (退出码 {})，继续备份",
                service, stop_status.exit_code
            );
        }

        let data_dir = docker_consts::get_data_dir(&self.base_dir, service);
        let dest = archive::archive_path(&self.backup_dir, service, Local::now().date_naive());
        info!("创建归档: {}", dest.display());
        let archive_status = self.runner.run(&archive::create_invocation(&dest, &data_dir)).await;
        if !archive_status.success() {
            error!(
                "归档服务 {} 失败 (退出码 {})",
                service, archive_status.exit_code
            );
            failed = true;
        } else if self.verify_archive {
            match archive::verify_archive(&dest).await {
                Ok(entries) => {
                    info!("归档校验通过: {} ({} 个条目)", dest.display(), entries);
                }
                Err(e) => {
                    error!("归档校验失败: {}: {}", dest.display(), e);
                    failed = true;
                }
            }
        }

        // 无论归档结果如何都必须尝试恢复服务
        info!("启动服务: {}", service);
        let start_status = self.runner.run(&docker::start_invocation(service)).await;
        if !start_status.success() {
            error!(
                "启动服务 {} 失败 (退出码 {})",
                service, start_status.exit_code
            );
            failed = true;
        }

        if failed {
            warn!("服务 {} 备份结束，存在错误", service);
        } else {
            info!("服务 {} 备份成功", service);
        }

        ServiceBackupReport {
            service: service.to_string(),
            stop_status: Some(stop_status),
            archive_status: Some(archive_status),
            archive_path: Some(dest),
            start_status: Some(start_status),
            failed,
        }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::testing::FakeRunner;
    use tempfile::tempdir;

    fn make_executor(dir: &Path, runner: FakeRunner) -> BackupExecutor<FakeRunner> {
        BackupExecutor::new(dir, dir.join("backup"), true, runner).unwrap()
    }

    #[tokio::test]
    async fn test_successful_backup_produces_archive() {
        let dir = tempdir().unwrap();
        let runner = FakeRunner::succeeding();
        let executor = make_executor(dir.path(), runner.clone());

        let report = executor.backup_service("mysql").await;

        assert!(report.succeeded());
        let today = Local::now().date_naive();
        let expected = dir
            .path()
            .join("backup")
            .join(archive::archive_file_name("mysql", today));
        assert!(expected.exists());
        assert_eq!(report.archive_path, Some(expected));

        let calls = runner.invocations();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].command_line(), "docker stop mysql");
        assert_eq!(calls[1].program, "tar");
        assert_eq!(calls[2].command_line(), "docker start mysql");
    }

    #[tokio::test]
    async fn test_empty_service_name_short_circuits() {
        let dir = tempdir().unwrap();
        let runner = FakeRunner::succeeding();
        let executor = make_executor(dir.path(), runner.clone());

        let report = executor.backup_service("").await;

        assert!(report.failed);
        assert!(report.stop_status.is_none());
        assert!(report.archive_status.is_none());
        assert!(report.start_status.is_none());
        assert!(runner.invocations().is_empty());
    }

    #[tokio::test]
    async fn test_stop_failure_is_diagnostic_only() {
        let dir = tempdir().unwrap();
        let runner = FakeRunner::with_stop_failure();
        let executor = make_executor(dir.path(), runner.clone());

        let report = executor.backup_service("mysql").await;

        assert!(report.succeeded());
        assert_eq!(report.stop_status.as_ref().unwrap().exit_code, 1);
        // 停止失败后归档与重启仍然执行
        assert_eq!(runner.invocations().len(), 3);
    }

    #[tokio::test]
    async fn test_archive_failure_still_restarts_service() {
        let dir = tempdir().unwrap();
        let runner = FakeRunner::with_archive_failure();
        let executor = make_executor(dir.path(), runner.clone());

        let report = executor.backup_service("mysql").await;

        assert!(report.failed);
        let calls = runner.invocations();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2].command_line(), "docker start mysql");
    }

    #[tokio::test]
    async fn test_verify_failure_marks_backup_failed_but_restarts() {
        let dir = tempdir().unwrap();
        let runner = FakeRunner::with_corrupt_archive();
        let executor = make_executor(dir.path(), runner.clone());

        let report = executor.backup_service("mysql").await;

        // 归档命令本身成功，失败来自校验
        assert!(report.failed);
        assert!(report.archive_status.as_ref().unwrap().success());
        let calls = runner.invocations();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2].command_line(), "docker start mysql");
    }

    #[tokio::test]
    async fn test_start_failure_marks_backup_failed() {
        let dir = tempdir().unwrap();
        let runner = FakeRunner::with_start_failure();
        let executor = make_executor(dir.path(), runner.clone());

        let report = executor.backup_service("mysql").await;

        assert!(report.failed);
        assert!(report.archive_status.as_ref().unwrap().success());
    }
}
