mod backup;
mod run;
mod schedule;
mod status;
mod sweep;

// 完整备份任务
pub use run::run_backup_run;

// 备份与归档管理
pub use backup::{run_backup, run_list_backups, run_verify};

// 过期归档清理
pub use sweep::run_sweep;

// 定时计划管理
pub use schedule::run_schedule;

// 状态查询
pub use status::{run_status, show_client_version};
