//! 任务结果通知
//!
//! 备份任务结束后向配置的端点发送一次 HTTP 通知。通知是
//! 尽力而为的：发送失败只记录日志，不影响任务结果。

use crate::constants::notify as notify_consts;
use crate::error::Result;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// 任务结果通知抽象
pub trait Notifier {
    /// 发送一条通知消息，失败由实现方自行记录
    fn notify(&self, message: &str) -> impl Future<Output = ()> + Send;
}

/// HTTP 通知器
///
/// 将消息文本作为请求体 POST 到配置的端点，Content-Type 为
/// application/x-www-form-urlencoded。只要请求发出并收到响应
/// 就视为送达，不检查状态码。
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    client: Client,
    url: String,
}

impl HttpNotifier {
    /// 创建通知器，使用标准 TLS 证书校验
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_options(url, false)
    }

    /// 创建通知器
    ///
    /// accept_invalid_certs 对应配置中的 danger_accept_invalid_certs，
    /// 只应为内网自签名端点开启。
    pub fn with_options(url: impl Into<String>, accept_invalid_certs: bool) -> Result<Self> {
        let mut builder =
            Client::builder().timeout(Duration::from_secs(notify_consts::HTTP_TIMEOUT_SECS));
        if accept_invalid_certs {
            warn!("通知端点已禁用 TLS 证书校验");
            builder = builder.danger_accept_invalid_certs(true);
        }
        Ok(Self {
            client: builder.build()?,
            url: url.into(),
        })
    }
}

impl Notifier for HttpNotifier {
    async fn notify(&self, message: &str) {
        debug!("发送通知到 {}: {}", self.url, message);
        let result = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, notify_consts::FORM_CONTENT_TYPE)
            .body(message.to_string())
            .send()
            .await;

        match result {
            Ok(response) => {
                debug!("通知已送达 (状态码 {})", response.status());
            }
            Err(e) => {
                warn!("发送通知失败: {}", e);
            }
        }
    }
}
