use crate::config::Config;
use crate::errors::Result;
use crate::models::news::NewsItem;
use crate::scrapers::base::NewsSource;
use crate::scrapers::news::NewsScraper;
use log::{info, warn};

/// 快讯服务，失败时返回空列表，与行情保持一致
pub struct NewsService<S = NewsScraper> {
    source: S,
}

impl NewsService {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(NewsScraper::new(config)?))
    }
}

impl<S> NewsService<S>
where
    S: NewsSource + Send + Sync,
{
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub async fn fetch_news(&self) -> Vec<NewsItem> {
        match self.source.fetch_news().await {
            Ok(news) => news,
            Err(e) => {
                warn!("[{}] 获取快讯失败: {}", self.source.source_name(), e);
                Vec::new()
            }
        }
    }
}

/// 已展示快讯的最大 id，由调用方持有
#[derive(Debug, Clone, Copy, Default)]
pub struct NewsWatermark {
    max_seen: Option<i64>,
}

impl NewsWatermark {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_seen(&self) -> Option<i64> {
        self.max_seen
    }

    /// 返回比水位更新的快讯（按 id 升序），并推进水位
    pub fn take_new(&mut self, news: Vec<NewsItem>) -> Vec<NewsItem> {
        let mut fresh: Vec<NewsItem> = news
            .into_iter()
            .filter(|item| self.max_seen.map_or(true, |max| item.id > max))
            .collect();
        fresh.sort_by_key(|item| item.id);
        fresh.dedup_by_key(|item| item.id);

        if let Some(last) = fresh.last() {
            self.max_seen = Some(last.id);
            info!("新增 {} 条快讯", fresh.len());
        }
        fresh
    }
}
