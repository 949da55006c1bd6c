//! 过期备份清理
//!
//! 每次备份任务开始前，删除备份目录中超过保留期限的归档文件。
//! 判断依据是文件修改时间，非归档文件一律保留。

use crate::archive;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{error, info, warn};
use walkdir::WalkDir;

/// 一次清理的统计结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// 扫描到的文件数
    pub examined: usize,
    /// 成功删除的过期归档数
    pub deleted: usize,
    /// 删除失败的文件数
    pub failed: usize,
}

/// 过期归档清理器
#[derive(Debug, Clone)]
pub struct RetentionSweeper {
    root: PathBuf,
}

impl RetentionSweeper {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 删除修改时间早于 now - age_limit 的归档文件
    pub async fn sweep(&self, age_limit: Duration) -> SweepReport {
        let cutoff = SystemTime::now()
            .checked_sub(age_limit)
            .unwrap_or(SystemTime::UNIX_EPOCH);
        self.sweep_before(cutoff).await
    }

    /// 删除修改时间早于 cutoff 的归档文件
    ///
    /// 单个文件的失败只计数，不中断整个清理过程。
    pub(crate) async fn sweep_before(&self, cutoff: SystemTime) -> SweepReport {
        info!("清理过期备份: {}", self.root.display());
        let root = self.root.clone();
        let result = tokio::task::spawn_blocking(move || sweep_dir(&root, cutoff)).await;

        match result {
            Ok(report) => {
                info!(
                    "清理完成: 扫描 {} 个文件, 删除 {} 个, 失败 {} 个",
                    report.examined, report.deleted, report.failed
                );
                report
            }
            Err(e) => {
                error!("清理任务异常退出: {}", e);
                SweepReport::default()
            }
        }
    }
}

fn sweep_dir(root: &Path, cutoff: SystemTime) -> SweepReport {
    let mut report = SweepReport::default();

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("遍历备份目录失败: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        report.examined += 1;

        if !archive::is_archive_name(&entry.file_name().to_string_lossy()) {
            continue;
        }

        let modified = match entry.metadata() {
            Ok(meta) => match meta.modified() {
                Ok(modified) => modified,
                Err(e) => {
                    warn!("读取修改时间失败: {}: {}", entry.path().display(), e);
                    continue;
                }
            },
            Err(e) => {
                warn!("读取文件元数据失败: {}: {}", entry.path().display(), e);
                continue;
            }
        };
        if modified >= cutoff {
            continue;
        }

        match std::fs::remove_file(entry.path()) {
            Ok(()) => {
                info!("已删除过期归档: {}", entry.path().display());
                report.deleted += 1;
            }
            Err(e) => {
                error!("删除过期归档失败: {}: {}", entry.path().display(), e);
                report.failed += 1;
            }
        }
    }

    report
}
