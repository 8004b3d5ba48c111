use crate::errors::Result;
use crate::models::news::NewsItem;
use async_trait::async_trait;

/// 行情接口传输层
#[async_trait]
pub trait QuoteTransport {
    /// 数据源名称，用于日志
    fn source_name(&self) -> &'static str;

    /// 请求一批逗号分隔的股票代码，返回未解码的原始字节
    async fn fetch_raw(&self, codes: &str) -> Result<Vec<u8>>;
}

/// 快讯接口
#[async_trait]
pub trait NewsSource {
    fn source_name(&self) -> &'static str;

    /// 拉取最新一页快讯
    async fn fetch_news(&self) -> Result<Vec<NewsItem>>;
}
