use agent_core::config::AppConfig;
use agent_core::constants::{
    backup as backup_consts, config as config_consts, docker as docker_consts,
};
use agent_core::error::Result;
use tracing::{info, warn};

/// 运行初始化流程
///
/// 在当前目录创建默认配置文件与目录结构。已存在配置文件时
/// 需要 --force 才会覆盖。
pub async fn run_init(force: bool) -> Result<()> {
    info!("🛰️  Saturn 备份代理初始化");
    info!("==========================");

    // 检查是否已经初始化过
    if !force && std::path::Path::new(config_consts::DEFAULT_CONFIG_FILE).exists() {
        warn!("⚠️  检测到已存在的配置文件");
        info!("如果您要重新初始化，请使用 --force 参数");
        info!("示例: saturn-cli init --force");
        return Ok(());
    }

    info!("📋 步骤 1: 创建配置文件和目录结构");

    // 创建默认配置
    let config = AppConfig::default();
    config.save_to_file(config_consts::DEFAULT_CONFIG_FILE)?;
    info!("   ✅ 创建配置文件: {}", config_consts::DEFAULT_CONFIG_FILE);

    // 创建必要的目录结构
    std::fs::create_dir_all(docker_consts::DOCKER_DIR_NAME)?;
    std::fs::create_dir_all(backup_consts::BACKUP_DIR_NAME)?;
    info!("   ✅ 创建目录结构:");
    info!(
        "      - {}/                (服务数据目录，按服务名分子目录)",
        docker_consts::DOCKER_DIR_NAME
    );
    info!(
        "      - {}/                (备份归档输出目录)",
        backup_consts::BACKUP_DIR_NAME
    );

    info!("🎉 初始化完成！");
    info!("");
    info!("📝 接下来的步骤:");
    info!("   1️⃣  编辑 config.toml，填写服务列表与通知端点");
    info!("   2️⃣  运行 'saturn-cli status' 检查配置与容器状态");
    info!("   3️⃣  运行 'saturn-cli run' 手动执行一次完整备份");
    info!("   4️⃣  将 'saturn-cli run' 写入系统 crontab 实现定时备份");
    info!("");
    info!("💡 提示:");
    info!(
        "   - 配置文件: {} (可手动编辑修改配置)",
        config_consts::DEFAULT_CONFIG_FILE
    );
    info!("   - 使用 'saturn-cli --help' 查看所有可用命令");

    Ok(())
}
