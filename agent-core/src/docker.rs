//! Docker 服务交互
//!
//! 通过 docker 命令行与容器交互：构造 stop/start/ps 调用，
//! 解析 `docker ps --format json` 的逐行输出。

use crate::constants::{backup as backup_consts, docker as docker_consts};
use crate::error::{Result, SaturnError};
use crate::process::ProcessInvocation;
use tracing::warn;

/// 容器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Running,
    Stopped,
    Unknown,
}

impl ContainerState {
    /// 状态的中文显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            ContainerState::Running => "运行中",
            ContainerState::Stopped => "已停止",
            ContainerState::Unknown => "未知",
        }
    }
}

/// 一个容器的概要信息
#[derive(Debug, Clone)]
pub struct ContainerInfo {
    pub name: String,
    pub state: ContainerState,
    pub image: String,
}

/// 构造停止服务容器的命令
pub fn stop_invocation(service: &str) -> ProcessInvocation {
    ProcessInvocation::new(
        docker_consts::DOCKER_PROGRAM,
        [docker_consts::STOP_SUBCOMMAND, service],
    )
}

/// 构造启动服务容器的命令
pub fn start_invocation(service: &str) -> ProcessInvocation {
    ProcessInvocation::new(
        docker_consts::DOCKER_PROGRAM,
        [docker_consts::START_SUBCOMMAND, service],
    )
}

/// 构造列出全部容器的命令
pub fn ps_invocation() -> ProcessInvocation {
    ProcessInvocation::new(
        docker_consts::DOCKER_PROGRAM,
        ["ps", "-a", "--format", "json"],
    )
}

/// 检查 docker 命令是否可用
pub fn check_docker_available() -> Result<()> {
    if which::which(docker_consts::DOCKER_PROGRAM).is_err() {
        return Err(SaturnError::command("Docker 未安装或不在 PATH 中"));
    }
    Ok(())
}

/// 检查备份所需的外部工具是否齐备
pub fn check_required_tools() -> Result<()> {
    check_docker_available()?;
    if which::which(backup_consts::TAR_PROGRAM).is_err() {
        return Err(SaturnError::command("tar 未安装或不在 PATH 中"));
    }
    Ok(())
}

/// 解析 `docker ps --format json` 的逐行输出
///
/// 每行是一个独立的 JSON 对象，无法解析的行记录警告后跳过。
pub fn parse_container_info(lines: &[String]) -> Vec<ContainerInfo> {
    let mut containers = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<serde_json::Value>(line) {
            Ok(value) => {
                let name = value["Names"].as_str().unwrap_or("unknown").to_string();
                let state = match value["State"].as_str().unwrap_or("unknown") {
                    "running" => ContainerState::Running,
                    "exited" | "created" | "paused" | "dead" => ContainerState::Stopped,
                    _ => ContainerState::Unknown,
                };
                let image = value["Image"].as_str().unwrap_or("unknown").to_string();
                containers.push(ContainerInfo { name, state, image });
            }
            Err(e) => {
                warn!("解析容器信息失败: {}, 行内容: {}", e, line);
            }
        }
    }
    containers
}

/// 在容器列表中查找服务对应的容器
///
/// 服务名即容器名；带编号后缀的容器（如 compose 的 mysql-1）
/// 按前缀匹配。
pub fn find_container<'a>(
    containers: &'a [ContainerInfo],
    service: &str,
) -> Option<&'a ContainerInfo> {
    containers
        .iter()
        .find(|c| c.name == service)
        .or_else(|| {
            let prefix = format!("{service}-");
            containers.iter().find(|c| c.name.starts_with(&prefix))
        })
}
