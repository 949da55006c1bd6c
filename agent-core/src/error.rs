use thiserror::Error;

/// 统一的错误类型
#[derive(Error, Debug)]
pub enum SaturnError {
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP请求错误: {0}")]
    Http(#[from] reqwest::Error),

    #[error("配置文件解析错误: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON解析错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("目录遍历错误: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("异步任务错误: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("配置文件未找到")]
    ConfigNotFound,

    #[error("配置校验失败: {0}")]
    ConfigValidation(String),

    #[error("外部命令错误: {0}")]
    Command(String),

    #[error("备份操作失败: {0}")]
    Backup(String),

    #[error("{0}")]
    Custom(String),
}

/// 便利的Result类型别名
pub type Result<T> = std::result::Result<T, SaturnError>;

impl SaturnError {
    /// 创建自定义错误
    pub fn custom<S: Into<String>>(msg: S) -> Self {
        SaturnError::Custom(msg.into())
    }

    /// 创建配置校验错误
    pub fn config_validation<S: Into<String>>(msg: S) -> Self {
        SaturnError::ConfigValidation(msg.into())
    }

    /// 创建外部命令错误
    pub fn command<S: Into<String>>(msg: S) -> Self {
        SaturnError::Command(msg.into())
    }

    /// 创建备份操作错误
    pub fn backup<S: Into<String>>(msg: S) -> Self {
        SaturnError::Backup(msg.into())
    }
}
