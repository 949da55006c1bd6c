//! 外部命令执行
//!
//! 备份流程依赖 docker 与 tar 两个外部命令。这里提供统一的
//! 调用描述、结果类型和执行器抽象，执行器永不返回错误：
//! 无法启动的命令按约定记为退出码 127。

use crate::constants::process as process_consts;
use std::future::Future;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, error, warn};

/// 一次外部命令调用：程序名与有序参数列表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInvocation {
    pub program: String,
    pub args: Vec<String>,
}

impl ProcessInvocation {
    pub fn new(
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// 用于日志展示的完整命令行
    pub fn command_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// 外部命令的执行结果
#[derive(Debug, Clone)]
pub struct CommandStatus {
    /// 进程退出码，无法启动记为 127，被信号终止记为 -1
    pub exit_code: i32,
    /// 捕获到的标准输出，按行存储
    pub stdout: Vec<String>,
}

impl CommandStatus {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub(crate) fn spawn_failure() -> Self {
        Self {
            exit_code: process_consts::SPAWN_FAILURE_EXIT_CODE,
            stdout: Vec::new(),
        }
    }
}

/// 外部命令执行器抽象
///
/// 备份执行器通过它发起 docker/tar 调用，测试中可以替换为
/// 不触碰真实进程的假实现。
pub trait CommandRunner {
    /// 执行一条命令，等待进程退出并返回结果
    fn run(&self, invocation: &ProcessInvocation) -> impl Future<Output = CommandStatus> + Send;
}

/// 基于 tokio::process 的默认执行器
///
/// 子进程的 stdout/stderr 在产生时逐行转入日志，stdout 同时
/// 被捕获到结果中供调用方解析。
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    async fn run(&self, invocation: &ProcessInvocation) -> CommandStatus {
        debug!("执行命令: {}", invocation.command_line());

        let mut child = match Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                error!("无法启动命令 {}: {}", invocation.command_line(), e);
                return CommandStatus::spawn_failure();
            }
        };

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // 子进程输出不保证是合法 UTF-8（如 tar 列出的文件名），
        // 按字节切行后宽松解码，整条流必须读到进程退出为止
        let stdout_task = async {
            let mut captured = Vec::new();
            if let Some(out) = stdout {
                let mut segments = BufReader::new(out).split(b'\n');
                while let Ok(Some(segment)) = segments.next_segment().await {
                    let line = String::from_utf8_lossy(&segment).into_owned();
                    debug!("{}", line);
                    captured.push(line);
                }
            }
            captured
        };

        let stderr_task = async {
            if let Some(err) = stderr {
                let mut segments = BufReader::new(err).split(b'\n');
                while let Ok(Some(segment)) = segments.next_segment().await {
                    warn!("{}: {}", invocation.program, String::from_utf8_lossy(&segment));
                }
            }
        };

        let (captured, (), wait_result) = tokio::join!(stdout_task, stderr_task, child.wait());

        let exit_code = match wait_result {
            // 被信号终止的进程没有退出码
            Ok(status) => status.code().unwrap_or(process_consts::SIGNAL_EXIT_CODE),
            Err(e) => {
                error!("等待命令 {} 退出失败: {}", invocation.command_line(), e);
                process_consts::SPAWN_FAILURE_EXIT_CODE
            }
        };

        debug!("命令退出: {} (退出码 {})", invocation.program, exit_code);
        CommandStatus {
            exit_code,
            stdout: captured,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{CommandRunner, CommandStatus, ProcessInvocation};
    use crate::constants::{backup as backup_consts, docker as docker_consts};
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    /// 测试用的假执行器
    ///
    /// 记录收到的每次调用，按预设退出码响应，归档调用成功时
    /// 在目标路径产出一个真实可校验的 tar.gz 文件。
    #[derive(Clone)]
    pub(crate) struct FakeRunner {
        calls: Arc<Mutex<Vec<ProcessInvocation>>>,
        stop_exit: i32,
        archive_exit: i32,
        start_exit: i32,
        archive_fail_service: Option<String>,
        corrupt_archive: bool,
    }

    impl FakeRunner {
        pub(crate) fn succeeding() -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
                stop_exit: 0,
                archive_exit: 0,
                start_exit: 0,
                archive_fail_service: None,
                corrupt_archive: false,
            }
        }

        pub(crate) fn with_stop_failure() -> Self {
            Self {
                stop_exit: 1,
                ..Self::succeeding()
            }
        }

        pub(crate) fn with_archive_failure() -> Self {
            Self {
                archive_exit: 2,
                ..Self::succeeding()
            }
        }

        /// 归档命令成功退出，但产物是无法解压的坏文件
        pub(crate) fn with_corrupt_archive() -> Self {
            Self {
                corrupt_archive: true,
                ..Self::succeeding()
            }
        }

        pub(crate) fn with_start_failure() -> Self {
            Self {
                start_exit: 1,
                ..Self::succeeding()
            }
        }

        /// 只让指定服务的归档命令失败
        pub(crate) fn failing_archive_for(service: &str) -> Self {
            Self {
                archive_fail_service: Some(service.to_string()),
                ..Self::succeeding()
            }
        }

        pub(crate) fn invocations(&self) -> Vec<ProcessInvocation> {
            self.calls.lock().unwrap().clone()
        }

        fn archive_exit_for(&self, data_dir: &str) -> i32 {
            if let Some(service) = &self.archive_fail_service {
                let matches = Path::new(data_dir)
                    .file_name()
                    .is_some_and(|name| name.to_string_lossy() == service.as_str());
                if matches {
                    return 2;
                }
                return 0;
            }
            self.archive_exit
        }

        /// 产出一个包含单个条目的合法 tar.gz 文件
        fn write_stub_archive(dest: &str) {
            use flate2::Compression;
            use flate2::write::GzEncoder;

            let file = std::fs::File::create(dest).unwrap();
            let encoder = GzEncoder::new(file, Compression::default());
            let mut builder = tar::Builder::new(encoder);
            let data = b"stub";
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, "data/stub.txt", &data[..])
                .unwrap();
            builder.into_inner().unwrap().finish().unwrap();
        }
    }

    impl CommandRunner for FakeRunner {
        async fn run(&self, invocation: &ProcessInvocation) -> CommandStatus {
            self.calls.lock().unwrap().push(invocation.clone());

            if invocation.program == backup_consts::TAR_PROGRAM {
                let exit_code = self.archive_exit_for(&invocation.args[2]);
                if exit_code == 0 {
                    if self.corrupt_archive {
                        std::fs::write(&invocation.args[1], b"not a gzip stream").unwrap();
                    } else {
                        Self::write_stub_archive(&invocation.args[1]);
                    }
                }
                return CommandStatus {
                    exit_code,
                    stdout: Vec::new(),
                };
            }

            if invocation.program == docker_consts::DOCKER_PROGRAM {
                let exit_code = match invocation.args.first().map(String::as_str) {
                    Some(docker_consts::STOP_SUBCOMMAND) => self.stop_exit,
                    Some(docker_consts::START_SUBCOMMAND) => self.start_exit,
                    _ => 0,
                };
                return CommandStatus {
                    exit_code,
                    stdout: Vec::new(),
                };
            }

            CommandStatus {
                exit_code: 0,
                stdout: Vec::new(),
            }
        }
    }
}
