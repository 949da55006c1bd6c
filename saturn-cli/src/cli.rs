use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::project_info::{metadata, version_info};

/// Saturn CLI - Docker 服务定时冷备份工具
#[derive(Parser)]
#[command(name = "saturn-cli")]
#[command(author = metadata::PROJECT_AUTHORS)]
#[command(version = version_info::CLI_VERSION)]
#[command(about = metadata::PROJECT_DESCRIPTION)]
#[command(long_about = metadata::display::DESCRIPTION_LONG)]
pub struct Cli {
    /// 配置文件路径（默认依次查找 config.toml / saturn.toml / .saturn.toml）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 详细输出
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 首次使用时初始化：创建配置文件与目录结构
    Init {
        /// 配置文件已存在时强制覆盖
        #[arg(long)]
        force: bool,
    },
    /// 执行一次完整备份任务：清理过期归档、逐服务备份、发送通知
    Run,
    /// 仅备份服务，不清理过期归档也不发送通知
    Backup {
        /// 服务名；省略时按配置顺序备份全部服务
        service: Option<String>,
    },
    /// 仅清理过期归档
    Sweep,
    /// 列出备份目录下的归档文件
    ListBackups,
    /// 校验归档文件完整性
    Verify {
        /// 归档文件路径
        file: PathBuf,
    },
    /// 查看或设置备份计划的 cron 表达式
    Schedule {
        /// 新的 cron 表达式，例如 "0 2 * * *"；省略时显示当前配置
        expression: Option<String>,
    },
    /// 显示配置与服务状态
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_command() {
        let cli = Cli::try_parse_from(["saturn-cli", "run"]).unwrap();
        assert!(matches!(cli.command, Commands::Run));
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_backup_with_service() {
        let cli = Cli::try_parse_from(["saturn-cli", "backup", "mysql"]).unwrap();
        match cli.command {
            Commands::Backup { service } => assert_eq!(service.as_deref(), Some("mysql")),
            _ => panic!("期望 Backup 子命令"),
        }
    }

    #[test]
    fn test_parse_schedule_expression() {
        let cli = Cli::try_parse_from(["saturn-cli", "schedule", "0 3 * * *"]).unwrap();
        match cli.command {
            Commands::Schedule { expression } => {
                assert_eq!(expression.as_deref(), Some("0 3 * * *"));
            }
            _ => panic!("期望 Schedule 子命令"),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let cli =
            Cli::try_parse_from(["saturn-cli", "--verbose", "--config", "saturn.toml", "status"])
                .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("saturn.toml")));
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Cli::try_parse_from(["saturn-cli", "teleport"]).is_err());
    }
}
