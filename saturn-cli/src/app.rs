use agent_core::config::AppConfig;
use agent_core::error::Result;
use std::path::{Path, PathBuf};

use crate::cli::Commands;
use crate::commands;

/// CLI 应用状态
pub struct CliApp {
    pub config: AppConfig,
    /// 实际加载的配置文件路径，schedule 命令回写时使用
    pub config_path: PathBuf,
}

impl CliApp {
    /// 加载并校验配置，初始化 CLI 应用
    ///
    /// 显式指定了配置路径时直接加载，否则按约定顺序查找。
    /// 配置内容不合法会直接拒绝启动。
    pub async fn new_with_auto_config(config_arg: Option<&Path>) -> Result<Self> {
        let (config, config_path) = match config_arg {
            Some(path) => (AppConfig::load_from_file(path)?, path.to_path_buf()),
            None => AppConfig::find_and_load_config()?,
        };
        config.validate()?;
        Ok(Self {
            config,
            config_path,
        })
    }

    /// 运行应用命令
    pub async fn run_command(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Init { .. } => unreachable!(), // 已经在 main.rs 中处理
            Commands::Run => commands::run_backup_run(self).await,
            Commands::Backup { service } => commands::run_backup(self, service).await,
            Commands::Sweep => commands::run_sweep(self).await,
            Commands::ListBackups => commands::run_list_backups(self).await,
            Commands::Verify { file } => commands::run_verify(&file).await,
            Commands::Schedule { expression } => commands::run_schedule(self, expression).await,
            Commands::Status => commands::run_status(self).await,
        }
    }
}
