//! Saturn CLI 库
//!
//! 将 CLI 的各个部分组织为库，方便 main.rs 保持简洁。

mod app;
mod cli;
mod commands;
mod init;
pub mod project_info;
mod utils;

pub use app::CliApp;
pub use cli::{Cli, Commands};
pub use commands::show_client_version;
pub use init::run_init;
pub use utils::setup_logging;
