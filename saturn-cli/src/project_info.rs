//! Saturn CLI 项目信息模块
//!
//! saturn-cli 是面向用户的主程序，项目元数据统一在这里定义；
//! agent-core 作为内部库只提供技术性常量。

/// 项目元数据（自动从 Cargo.toml 同步）
pub mod metadata {
    /// 项目名称
    pub const PROJECT_NAME: &str = env!("CARGO_PKG_NAME");

    /// 项目描述
    pub const PROJECT_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

    /// 项目作者
    pub const PROJECT_AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

    /// 用户友好的显示名称
    pub mod display {
        /// 友好名称
        pub const FRIENDLY_NAME: &str = "Saturn Backup Agent";

        /// 项目详细描述
        pub const DESCRIPTION_LONG: &str = "Docker 服务的定时冷备份代理：\
按计划停止服务、归档数据目录、重启服务、清理过期归档并发送结果通知";
    }
}

/// 版本信息
pub mod version_info {
    /// CLI 版本（自动从 Cargo.toml 同步）
    pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

    /// 核心库版本
    pub const CORE_VERSION: &str = agent_core::constants::version::version_info::CORE_VERSION;
}
