use agent_core::archive;
use agent_core::docker::{self, ContainerInfo, ContainerState};
use agent_core::error::{Result, SaturnError};
use agent_core::process::{CommandRunner, SystemCommandRunner};
use chrono::{DateTime, Local};
use tracing::{info, instrument, warn};

use crate::app::CliApp;
use crate::project_info::version_info;

/// 显示客户端版本信息
pub fn show_client_version() {
    info!("🛰️  Saturn 备份代理");
    info!("==================");
    info!("📋 基本信息:");
    info!("   CLI 版本: v{}", version_info::CLI_VERSION);
    info!("   核心库版本: v{}", version_info::CORE_VERSION);
}

/// 显示配置与服务状态
#[instrument(skip(app))]
pub async fn run_status(app: &CliApp) -> Result<()> {
    show_client_version();
    info!("   配置文件: {}", app.config_path.display());

    info!("🗂️  备份配置:");
    info!("   基础目录: {}", app.config.backup.base_dir);
    info!("   备份目录: {}", app.config.backup_dir().display());
    info!("   保留天数: {} 天", app.config.backup.retention_days);
    info!(
        "   归档校验: {}",
        if app.config.backup.verify_archive {
            "开启"
        } else {
            "关闭"
        }
    );
    info!(
        "   备份计划: {} (由系统 crontab 触发 saturn-cli run)",
        app.config.schedule.cron
    );
    info!("   通知端点: {}", app.config.notify.url);

    info!("🔧 外部工具:");
    match docker::check_required_tools() {
        Ok(()) => info!("   ✅ docker 与 tar 均可用"),
        Err(e) => warn!("   ⚠️  {}", e),
    }

    info!("🐳 服务状态:");
    let services = app.config.service_names();
    match fetch_container_states().await {
        Ok(containers) => {
            for service in &services {
                if service.is_empty() {
                    warn!("   ⚠️  配置中存在空服务名，备份时会被记为失败");
                    continue;
                }
                match docker::find_container(&containers, service) {
                    Some(container) => {
                        let icon = state_icon(container.state);
                        info!(
                            "   {} {} - {} ({})",
                            icon,
                            service,
                            container.state.display_name(),
                            container.image
                        );
                    }
                    None => info!("   ⚪ {} - 未找到容器", service),
                }
            }
        }
        Err(e) => {
            warn!("   ⚠️  无法获取容器状态: {}", e);
            info!("   💡 请确认 Docker 是否已安装并正在运行");
        }
    }

    let archives = archive::list_archives(&app.config.backup_dir()).await?;
    info!("📦 备份归档: {} 个", archives.len());
    if let Some(latest) = archives.first() {
        let modified: DateTime<Local> = latest.modified.into();
        info!(
            "   最近归档: {} ({})",
            latest.path.display(),
            modified.format("%Y-%m-%d %H:%M:%S")
        );
    }

    Ok(())
}

/// 通过 docker ps 获取全部容器信息
async fn fetch_container_states() -> Result<Vec<ContainerInfo>> {
    docker::check_docker_available()?;
    let runner = SystemCommandRunner;
    let status = runner.run(&docker::ps_invocation()).await;
    if !status.success() {
        return Err(SaturnError::command(format!(
            "docker ps 执行失败 (退出码 {})",
            status.exit_code
        )));
    }
    Ok(docker::parse_container_info(&status.stdout))
}

fn state_icon(state: ContainerState) -> &'static str {
    match state {
        ContainerState::Running => "🟢",
        ContainerState::Stopped => "🔴",
        ContainerState::Unknown => "🟡",
    }
}
