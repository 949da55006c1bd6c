//! 应用常量定义
//!
//! 集中管理备份代理使用的路径约定、命令参数和消息文本，
//! 避免在代码中散落魔法字符串。

use std::path::{Path, PathBuf};

/// Docker 相关常量
pub mod docker {
    use super::*;

    /// Docker 命令名称
    pub const DOCKER_PROGRAM: &str = "docker";

    /// 停止容器的子命令
    pub const STOP_SUBCOMMAND: &str = "stop";

    /// 启动容器的子命令
    pub const START_SUBCOMMAND: &str = "start";

    /// 服务数据目录的父目录名，位于基础目录之下
    pub const DOCKER_DIR_NAME: &str = "docker";

    /// 获取服务数据目录: <base_dir>/docker/<服务名>
    pub fn get_data_dir(base_dir: &Path, service: &str) -> PathBuf {
        base_dir.join(DOCKER_DIR_NAME).join(service)
    }
}

/// 备份与归档相关常量
pub mod backup {
    use super::*;

    /// 备份输出目录名，位于基础目录之下
    pub const BACKUP_DIR_NAME: &str = "backup";

    /// 清理时识别归档文件的后缀
    pub const ARCHIVE_SUFFIX: &str = ".gz";

    /// 新建归档的完整扩展名
    pub const ARCHIVE_EXTENSION: &str = ".tar.gz";

    /// 归档文件名中的日期格式
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// 默认备份保留天数
    pub const DEFAULT_RETENTION_DAYS: u64 = 30;

    /// 归档命令名称
    pub const TAR_PROGRAM: &str = "tar";

    /// 创建 gzip 压缩归档的参数
    pub const TAR_CREATE_FLAGS: &str = "-zcvf";

    /// 获取备份输出目录: <base_dir>/backup
    pub fn get_backup_dir(base_dir: &Path) -> PathBuf {
        base_dir.join(BACKUP_DIR_NAME)
    }
}

/// 通知相关常量
pub mod notify {
    /// 通知请求的 Content-Type
    pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

    /// 全部服务备份成功时的通知消息
    pub const COMPLETED_MESSAGE: &str = "Saturn backup completed";

    /// 任一服务备份失败时的通知消息
    pub const CONTAINS_ERRORS_MESSAGE: &str = "Saturn backup contains errors";

    /// 通知请求超时（秒）
    pub const HTTP_TIMEOUT_SECS: u64 = 30;
}

/// 定时任务相关常量
pub mod cron {
    /// 默认备份时间：每天凌晨 2 点
    pub const DEFAULT_BACKUP_CRON: &str = "0 2 * * *";

    /// cron 表达式的字段数：分 时 日 月 周
    pub const CRON_FIELDS_COUNT: usize = 5;
}

/// 配置文件相关常量
pub mod config {
    /// 按顺序查找的配置文件名
    pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["config.toml", "saturn.toml", ".saturn.toml"];

    /// init 创建的默认配置文件名
    pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
}

/// 日志相关常量
pub mod logging {
    /// 默认日志级别
    pub const DEFAULT_LOG_LEVEL: &str = "info";

    /// 指定日志输出文件的环境变量
    pub const LOG_FILE_ENV: &str = "SATURN_LOG_FILE";
}

/// 进程执行相关常量
pub mod process {
    /// 命令无法启动时约定的退出码
    pub const SPAWN_FAILURE_EXIT_CODE: i32 = 127;

    /// 进程被信号终止时约定的退出码
    pub const SIGNAL_EXIT_CODE: i32 = -1;
}

/// 技术版本信息
pub mod version {
    /// 版本号常量
    pub mod version_info {
        /// 核心库版本（自动从 Cargo.toml 同步）
        pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");
    }
}
