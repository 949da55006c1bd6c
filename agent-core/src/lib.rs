//! Saturn 备份代理核心库
//!
//! 面向容器化服务的定时冷备份：停止服务、归档数据目录、重启
//! 服务、清理过期归档并发送结果通知。调度由系统 cron 负责，
//! 本库只提供单次任务的完整执行。

pub mod archive;
pub mod backup;
pub mod config;
pub mod constants;
pub mod docker;
pub mod error;
pub mod notify;
pub mod process;
pub mod run;
pub mod sweep;

pub use error::{Result, SaturnError};
