use serde::{Deserialize, Serialize};
use std::fs;

use crate::errors::Result;
use crate::models::quote::Quote;
use crate::util;

/// 自选股列表与状态栏股票列表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Watchlist {
    #[serde(default)]
    pub stocks: Vec<String>,
    #[serde(default)]
    pub status_bar: Vec<String>,
}

impl Watchlist {
    pub fn new(stocks: Vec<String>, status_bar: Vec<String>) -> Self {
        Self { stocks, status_bar }
    }

    /// 从 JSON 文件读取，格式为 `{"stocks": [...], "statusBar": [...]}`
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let watchlist: Watchlist = serde_json::from_str(&content)?;
        Ok(watchlist)
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty() && self.status_bar.is_empty()
    }

    /// 两个列表合并去重后的请求代码，自选股在前
    pub fn request_codes(&self) -> String {
        util::join_codes(self.stocks.iter().chain(self.status_bar.iter()))
    }
}

/// 一次抓取按列表拆分后的结果
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistSnapshot {
    pub stocks: Vec<Quote>,
    pub status_bar: Vec<Quote>,
}

impl WatchlistSnapshot {
    /// 按代码归属拆分，保持抓取结果的顺序
    pub fn split(quotes: Vec<Quote>, watchlist: &Watchlist) -> Self {
        let stock_codes: Vec<String> = watchlist.stocks.iter().map(|c| util::normalize_code(c)).collect();
        let status_codes: Vec<String> = watchlist.status_bar.iter().map(|c| util::normalize_code(c)).collect();

        let stocks = quotes
            .iter()
            .filter(|q| stock_codes.contains(&q.code))
            .cloned()
            .collect();
        let status_bar = quotes
            .into_iter()
            .filter(|q| status_codes.contains(&q.code))
            .collect();

        Self { stocks, status_bar }
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty() && self.status_bar.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_quotes;

    const TEXT: &str = concat!(
        "var hq_str_sh600000=\"浦发银行,10.50,10.40,10.60,10.70,10.30\";\n",
        "var hq_str_sz000001=\"平安银行,11.00,11.10,11.05,11.20,10.90\";\n",
        "var hq_str_sh601318=\"中国平安,40.00,40.00,41.00,41.50,39.80\";\n",
    );

    #[test]
    fn test_deserialize_with_missing_list() {
        let watchlist: Watchlist = serde_json::from_str(r#"{"stocks": ["sh600000"]}"#).unwrap();
        assert_eq!(watchlist.stocks, vec!["sh600000"]);
        assert!(watchlist.status_bar.is_empty());
        assert!(!watchlist.is_empty());
    }

    #[test]
    fn test_request_codes_dedupes_and_normalizes() {
        let watchlist = Watchlist::new(
            vec!["600000.SH".to_string(), "sz000001".to_string()],
            vec!["sh600000".to_string(), "601318.SH".to_string()],
        );
        assert_eq!(watchlist.request_codes(), "sh600000,sz000001,sh601318");
    }

    #[test]
    fn test_split_keeps_fetch_order() {
        let watchlist = Watchlist::new(
            vec!["sh601318".to_string(), "sh600000".to_string()],
            vec!["000001.SZ".to_string(), "sh600000".to_string()],
        );
        let snapshot = WatchlistSnapshot::split(parse_quotes(TEXT), &watchlist);

        let stocks: Vec<&str> = snapshot.stocks.iter().map(|q| q.code.as_str()).collect();
        let status_bar: Vec<&str> = snapshot.status_bar.iter().map(|q| q.code.as_str()).collect();
        assert_eq!(stocks, vec!["sh600000", "sh601318"]);
        assert_eq!(status_bar, vec!["sh600000", "sz000001"]);
    }

    #[test]
    fn test_snapshot_is_empty_when_nothing_matched() {
        let watchlist = Watchlist::new(vec!["sz000002".to_string()], Vec::new());
        assert!(WatchlistSnapshot::split(parse_quotes(TEXT), &watchlist).is_empty());
        assert!(WatchlistSnapshot::split(Vec::new(), &watchlist).is_empty());

        let watchlist = Watchlist::new(Vec::new(), vec!["sz000001".to_string()]);
        assert!(!WatchlistSnapshot::split(parse_quotes(TEXT), &watchlist).is_empty());
    }
}
