use clap::Parser;
use saturn_cli::{Cli, CliApp, Commands, run_init, setup_logging};
use tracing::error;

use agent_core::SaturnError;

#[tokio::main]
async fn main() {
    // 解析命令行参数
    let cli = Cli::parse();

    // 设置日志记录
    setup_logging(cli.verbose);

    // init 命令是特例，它不需要预先加载配置
    if let Commands::Init { force } = cli.command {
        if let Err(e) = run_init(force).await {
            error!("❌ 初始化失败: {}", e);
            std::process::exit(1);
        }
        return;
    }

    // 其余命令需要先加载并校验配置
    let mut app = match CliApp::new_with_auto_config(cli.config.as_deref()).await {
        Ok(app) => app,
        Err(SaturnError::ConfigNotFound) => {
            error!("❌ 未找到配置文件。");
            error!("👉 请先运行 'saturn-cli init' 命令来创建配置文件。");
            std::process::exit(1);
        }
        Err(e) => {
            error!("❌ 应用初始化失败: {}", e);
            std::process::exit(1);
        }
    };

    // 运行命令
    if let Err(e) = app.run_command(cli.command).await {
        error!("❌ 操作失败: {}", e);
        std::process::exit(1);
    }
}
