use crate::config::Config;
use crate::errors::{Result, TickerError};
use crate::models::news::NewsItem;
use crate::scrapers::base::NewsSource;
use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN, REFERER, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;

const NEWS_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const NEWS_LIMIT: &str = "20";
const NEWS_SUBJECTS: &str = "9,10,723,35,469";

// 响应格式：{"data": {"messages": [...]}}
#[derive(Debug, Default, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    data: Option<NewsData>,
}

#[derive(Debug, Default, Deserialize)]
struct NewsData {
    #[serde(default)]
    messages: Vec<NewsItem>,
}

/// 选股宝快讯抓取器
pub struct NewsScraper {
    client: Client,
    url: String,
}

impl NewsScraper {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
        headers.insert(USER_AGENT, HeaderValue::from_static(NEWS_USER_AGENT));
        headers.insert(REFERER, HeaderValue::from_static("https://xuangubao.cn/"));
        headers.insert(ORIGIN, HeaderValue::from_static("https://xuangubao.cn"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(TickerError::RequestError)?;

        Ok(Self {
            client,
            url: config.news_url.clone(),
        })
    }
}

/// 解析快讯响应，`data` 缺失时返回空列表
pub fn parse_news(body: &[u8]) -> Result<Vec<NewsItem>> {
    let response: NewsResponse = serde_json::from_slice(body)?;
    Ok(response.data.map(|data| data.messages).unwrap_or_default())
}

#[async_trait]
impl NewsSource for NewsScraper {
    fn source_name(&self) -> &'static str {
        "XUANGUBAO"
    }

    async fn fetch_news(&self) -> Result<Vec<NewsItem>> {
        let response = self.client
            .get(&self.url)
            .query(&[
                ("limit", NEWS_LIMIT),
                ("subj_ids", NEWS_SUBJECTS),
                ("platform", "pcweb"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TickerError::StatusError(status.as_u16()));
        }

        let body = response.bytes().await?;
        let news = parse_news(&body)?;
        debug!("获取到 {} 条快讯", news.len());
        Ok(news)
    }
}
