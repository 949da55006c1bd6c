use crate::constants::{
    backup as backup_consts, config as config_consts, cron as cron_consts, docker as docker_consts,
};
use crate::error::{Result, SaturnError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 应用配置结构
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub backup: BackupConfig,
    pub services: ServicesConfig,
    pub schedule: ScheduleConfig,
    pub notify: NotifyConfig,
}

/// 备份相关配置
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BackupConfig {
    /// 基础目录：服务数据位于 <base_dir>/docker/<服务名>，归档写入 <base_dir>/backup
    pub base_dir: String,
    /// 备份保留天数，早于该期限的归档在每次任务开始时被清理
    pub retention_days: u64,
    /// 归档创建成功后是否立即校验完整性
    pub verify_archive: bool,
}

/// 服务列表配置
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServicesConfig {
    /// 需要备份的服务名列表，逗号分隔，按出现顺序依次备份
    pub names: String,
}

/// 定时任务配置
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScheduleConfig {
    /// cron 表达式（5 字段），由系统 crontab 实际触发
    pub cron: String,
}

/// 通知配置
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NotifyConfig {
    /// 接收任务结果通知的 HTTP 端点
    pub url: String,
    /// 跳过 TLS 证书校验，仅限内网自签名端点
    #[serde(default)]
    pub danger_accept_invalid_certs: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backup: BackupConfig {
                base_dir: ".".to_string(),
                retention_days: backup_consts::DEFAULT_RETENTION_DAYS,
                verify_archive: true,
            },
            services: ServicesConfig {
                names: String::new(),
            },
            schedule: ScheduleConfig {
                cron: cron_consts::DEFAULT_BACKUP_CRON.to_string(),
            },
            notify: NotifyConfig {
                url: String::new(),
                danger_accept_invalid_certs: false,
            },
        }
    }
}

impl AppConfig {
    /// 智能查找并加载配置文件
    /// 按优先级查找：config.toml -> saturn.toml -> .saturn.toml
    ///
    /// 返回配置与实际使用的文件路径。没有找到任何候选文件时
    /// 返回 ConfigNotFound，由调用方提示运行 init。
    pub fn find_and_load_config() -> Result<(Self, PathBuf)> {
        for config_file in &config_consts::CONFIG_FILE_CANDIDATES {
            if Path::new(config_file).exists() {
                tracing::info!("找到配置文件: {}", config_file);
                return Ok((Self::load_from_file(config_file)?, PathBuf::from(config_file)));
            }
        }

        Err(SaturnError::ConfigNotFound)
    }

    /// 从指定文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !path.as_ref().exists() {
            return Err(SaturnError::ConfigNotFound);
        }
        let content = fs::read_to_string(&path)?;
        let config: AppConfig = toml::from_str(&content)?;

        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml_with_comments();
        fs::write(&path, content)?;
        Ok(())
    }

    /// 校验配置内容，任何一项不满足都拒绝启动
    pub fn validate(&self) -> Result<()> {
        if self.backup.base_dir.trim().is_empty() {
            return Err(SaturnError::config_validation("backup.base_dir 不能为空"));
        }
        if self.backup.retention_days == 0 {
            return Err(SaturnError::config_validation(
                "backup.retention_days 必须大于 0",
            ));
        }
        if self.services.names.trim().is_empty() {
            return Err(SaturnError::config_validation(
                "services.names 不能为空，至少配置一个服务",
            ));
        }
        if !validate_cron_expression(&self.schedule.cron) {
            return Err(SaturnError::config_validation(format!(
                "schedule.cron 不是有效的 cron 表达式: '{}'",
                self.schedule.cron
            )));
        }
        if self.notify.url.trim().is_empty() {
            return Err(SaturnError::config_validation("notify.url 不能为空"));
        }
        if !self.notify.url.starts_with("http://") && !self.notify.url.starts_with("https://") {
            return Err(SaturnError::config_validation(
                "notify.url 必须以 http:// 或 https:// 开头",
            ));
        }
        Ok(())
    }

    /// 解析服务名列表
    ///
    /// 按逗号原样切分，不做去空格或去重处理，空串条目会被保留，
    /// 由备份执行器在运行时将其记为失败。
    pub fn service_names(&self) -> Vec<String> {
        self.services
            .names
            .split(',')
            .map(str::to_string)
            .collect()
    }

    /// 基础目录
    pub fn base_dir(&self) -> PathBuf {
        PathBuf::from(&self.backup.base_dir)
    }

    /// 备份输出目录: <base_dir>/backup
    pub fn backup_dir(&self) -> PathBuf {
        backup_consts::get_backup_dir(&self.base_dir())
    }

    /// 服务数据目录: <base_dir>/docker/<服务名>
    pub fn data_dir(&self, service: &str) -> PathBuf {
        docker_consts::get_data_dir(&self.base_dir(), service)
    }

    /// 备份保留期限
    pub fn age_limit(&self) -> Duration {
        Duration::from_secs(self.backup.retention_days.saturating_mul(24 * 60 * 60))
    }

    /// 生成带注释的TOML配置内容
    fn to_toml_with_comments(&self) -> String {
        const TEMPLATE: &str = include_str!("../templates/config.toml.template");

        TEMPLATE
            .replace("{base_dir}", &self.backup.base_dir)
            .replace("{retention_days}", &self.backup.retention_days.to_string())
            .replace("{verify_archive}", &self.backup.verify_archive.to_string())
            .replace("{services}", &self.services.names)
            .replace("{cron}", &self.schedule.cron)
            .replace("{notify_url}", &self.notify.url)
            .replace(
                "{danger_accept_invalid_certs}",
                &self.notify.danger_accept_invalid_certs.to_string(),
            )
    }
}

/// 校验 cron 表达式格式
///
/// 简单的结构校验，字段取值由实际执行调度的系统 cron 解释。
pub fn validate_cron_expression(cron_expr: &str) -> bool {
    let parts: Vec<&str> = cron_expr.split_whitespace().collect();

    // 标准cron表达式应该有5个字段: 分 时 日 月 周
    if parts.len() != cron_consts::CRON_FIELDS_COUNT {
        return false;
    }

    // 基础格式检查
    for part in parts {
        if part.is_empty() {
            return false;
        }
    }

    true
}
