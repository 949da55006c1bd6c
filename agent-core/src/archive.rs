//! 归档文件管理
//!
//! 归档命名约定为 <服务名>-<YYYY-MM-DD>.tar.gz。创建由外部 tar
//! 命令完成，这里负责命名、完整性校验与备份目录清点。

use crate::constants::backup as backup_consts;
use crate::error::{Result, SaturnError};
use crate::process::ProcessInvocation;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::warn;
use walkdir::WalkDir;

/// 归档文件名: <服务名>-<YYYY-MM-DD>.tar.gz
pub fn archive_file_name(service: &str, date: NaiveDate) -> String {
    format!(
        "{}-{}{}",
        service,
        date.format(backup_consts::DATE_FORMAT),
        backup_consts::ARCHIVE_EXTENSION
    )
}

/// 归档文件完整路径
pub fn archive_path(backup_dir: &Path, service: &str, date: NaiveDate) -> PathBuf {
    backup_dir.join(archive_file_name(service, date))
}

/// 构造创建 gzip 压缩归档的命令: tar -zcvf <目标> <数据目录>
pub fn create_invocation(dest: &Path, data_dir: &Path) -> ProcessInvocation {
    ProcessInvocation::new(
        backup_consts::TAR_PROGRAM,
        [
            backup_consts::TAR_CREATE_FLAGS.to_string(),
            dest.to_string_lossy().into_owned(),
            data_dir.to_string_lossy().into_owned(),
        ],
    )
}

/// 按后缀判断文件是否属于清理范围
pub fn is_archive_name(name: &str) -> bool {
    name.ends_with(backup_consts::ARCHIVE_SUFFIX)
}

/// 校验归档完整性
///
/// 解压并遍历全部条目，任何一个条目读取失败即视为损坏。
/// 返回条目数量。
pub async fn verify_archive(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Err(SaturnError::backup(format!(
            "归档文件不存在: {}",
            path.display()
        )));
    }

    let path = path.to_path_buf();
    let entries = tokio::task::spawn_blocking(move || {
        use flate2::read::GzDecoder;
        use std::fs::File;
        use tar::Archive;

        let file = File::open(&path)?;
        let decoder = GzDecoder::new(file);
        let mut archive = Archive::new(decoder);

        let mut count = 0usize;
        for entry in archive.entries()? {
            entry.map_err(|e| SaturnError::backup(format!("归档已损坏: {e}")))?;
            count += 1;
        }
        Ok::<usize, SaturnError>(count)
    })
    .await??;

    Ok(entries)
}

/// 备份目录中的一个归档文件
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
}

/// 清点备份目录下的归档文件，按修改时间从新到旧排序
pub async fn list_archives(backup_dir: &Path) -> Result<Vec<ArchiveEntry>> {
    let dir = backup_dir.to_path_buf();
    let mut entries = tokio::task::spawn_blocking(move || {
        let mut found = Vec::new();
        for entry in WalkDir::new(&dir) {
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
            if !is_archive_name(&entry.file_name().to_string_lossy()) {
                continue;
            }
            match entry.metadata() {
                Ok(meta) => found.push(ArchiveEntry {
                    path: entry.path().to_path_buf(),
                    size: meta.len(),
                    modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
                }),
                Err(e) => {
                    warn!("读取归档元数据失败: {}: {}", entry.path().display(), e);
                }
            }
        }
        found
    })
    .await?;

    entries.sort_by(|a, b| b.modified.cmp(&a.modified));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use tempfile::tempdir;

    fn write_archive(path: &Path, entries: &[(&str, &[u8])]) {
        let file = std::fs::File::create(path).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, *name, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_archive_naming() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 22).unwrap();
        assert_eq!(
            archive_file_name("mysql", date),
            "mysql-2026-08-22.tar.gz"
        );
        assert_eq!(
            archive_path(Path::new("/data/backup"), "mysql", date),
            PathBuf::from("/data/backup/mysql-2026-08-22.tar.gz")
        );
    }

    #[test]
    fn test_create_invocation_shape() {
        let invocation = create_invocation(
            Path::new("/data/backup/mysql-2026-08-22.tar.gz"),
            Path::new("/data/docker/mysql"),
        );
        assert_eq!(
            invocation.command_line(),
            "tar -zcvf /data/backup/mysql-2026-08-22.tar.gz /data/docker/mysql"
        );
    }

    #[test]
    fn test_archive_name_suffix_match() {
        assert!(is_archive_name("mysql-2026-08-22.tar.gz"));
        assert!(is_archive_name("legacy-dump.gz"));
        assert!(!is_archive_name("notes.txt"));
        assert!(!is_archive_name("mysql-2026-08-22.tar"));
    }

    #[tokio::test]
    async fn test_verify_valid_archive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ok.tar.gz");
        write_archive(&path, &[("data/a.txt", b"aaa"), ("data/b.txt", b"bb")]);
        let entries = verify_archive(&path).await.unwrap();
        assert_eq!(entries, 2);
    }

    #[tokio::test]
    async fn test_verify_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.tar.gz");
        std::fs::write(&path, b"this is not a gzip stream").unwrap();
        assert!(verify_archive(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_verify_rejects_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.tar.gz");
        assert!(verify_archive(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_list_archives_filters_and_sorts() {
        let dir = tempdir().unwrap();
        write_archive(&dir.path().join("alpha-2026-08-20.tar.gz"), &[("a", b"1")]);
        write_archive(&dir.path().join("beta-2026-08-21.tar.gz"), &[("b", b"2")]);
        std::fs::write(dir.path().join("notes.txt"), b"keep me").unwrap();

        let archives = list_archives(dir.path()).await.unwrap();
        assert_eq!(archives.len(), 2);
        for entry in &archives {
            assert!(is_archive_name(&entry.path.file_name().unwrap().to_string_lossy()));
            assert!(entry.size > 0);
        }
    }

    #[tokio::test]
    async fn test_list_archives_missing_dir_is_empty() {
        let dir = tempdir().unwrap();
        let archives = list_archives(&dir.path().join("absent")).await.unwrap();
        assert!(archives.is_empty());
    }
}
