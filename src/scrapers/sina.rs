use crate::config::Config;
use crate::errors::{Result, TickerError};
use crate::scrapers::base::QuoteTransport;
use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::Client;

const ACCEPT_VALUE: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// 新浪财经实时行情抓取器
///
/// 接口根据 Referer 和 User-Agent 判断是否返回数据，缺少时会返回 403。
pub struct SinaScraper {
    client: Client,
    base_url: String,
}

impl SinaScraper {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value(&config.user_agent)?);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
        headers.insert(ACCEPT_LANGUAGE, header_value(&config.accept_language)?);
        headers.insert(REFERER, header_value(&config.referer)?);

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(TickerError::RequestError)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// 代码直接拼在路径里，逗号不做转义
    pub fn list_url(&self, codes: &str) -> String {
        format!("{}/list={}", self.base_url, codes)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| TickerError::ConfigError(format!("非法的请求头 {:?}: {}", value, e)))
}

#[async_trait]
impl QuoteTransport for SinaScraper {
    fn source_name(&self) -> &'static str {
        "SINA"
    }

    async fn fetch_raw(&self, codes: &str) -> Result<Vec<u8>> {
        let url = self.list_url(codes);
        debug!("请求行情: {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TickerError::StatusError(status.as_u16()));
        }

        // 按字节读取，编码交给解码器处理
        let bytes = response.bytes().await?;
        debug!("收到 {} 字节", bytes.len());
        Ok(bytes.to_vec())
    }
}
