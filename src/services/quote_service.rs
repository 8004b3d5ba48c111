use crate::config::Config;
use crate::decoder::{Gb18030Decoder, TextDecoder};
use crate::errors::Result;
use crate::models::quote::Quote;
use crate::models::watchlist::{Watchlist, WatchlistSnapshot};
use crate::parser::parse_quotes;
use crate::scrapers::base::QuoteTransport;
use crate::scrapers::sina::SinaScraper;
use crate::util;
use log::{debug, info, warn};

/// 行情服务：请求 -> 解码 -> 解析
///
/// 不保存任何状态，每次调用都是独立的，可以并发调用。
pub struct QuoteService<T = SinaScraper, D = Gb18030Decoder> {
    transport: T,
    decoder: D,
}

impl QuoteService {
    /// 使用新浪接口和 GB18030 解码器
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(SinaScraper::new(config)?, Gb18030Decoder))
    }
}

impl<T, D> QuoteService<T, D>
where
    T: QuoteTransport + Send + Sync,
    D: TextDecoder,
{
    pub fn new(transport: T, decoder: D) -> Self {
        Self { transport, decoder }
    }

    /// 获取一批股票的行情。
    ///
    /// `codes` 为逗号分隔的代码，`600000.SH` 这类写法会先转换为 `sh600000`。
    /// 网络错误或非 2xx 状态只记录日志并返回空列表，下一次轮询即为重试。
    pub async fn fetch_quotes(&self, codes: &str) -> Vec<Quote> {
        let codes = util::join_codes(codes.split(','));
        if codes.is_empty() {
            debug!("代码列表为空，跳过请求");
            return Vec::new();
        }
        // 非沪深六位代码照常请求，接口会返回空串
        for code in codes.split(',').filter(|c| !util::is_valid_code(c)) {
            warn!("代码格式不符合 sh/sz + 6 位数字: {}", code);
        }

        let source = self.transport.source_name();
        let bytes = match self.transport.fetch_raw(&codes).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("[{}] 获取行情失败: {}", source, e);
                return Vec::new();
            }
        };

        let text = self.decoder.decode(&bytes);
        let quotes = parse_quotes(&text);
        info!("[{}] 获取到 {} 条行情", source, quotes.len());
        quotes
    }

    /// 一次请求同时获取自选股和状态栏股票，再按列表拆分
    pub async fn fetch_watchlist(&self, watchlist: &Watchlist) -> WatchlistSnapshot {
        let quotes = self.fetch_quotes(&watchlist.request_codes()).await;
        WatchlistSnapshot::split(quotes, watchlist)
    }
}
