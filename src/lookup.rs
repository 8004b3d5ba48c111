use crate::errors::{Result, TickerError};
use serde::Deserialize;
use std::fs;

/// 股票基础信息表中的一条记录，原始 JSON 使用中文键名
#[derive(Debug, Clone, Deserialize)]
pub struct StockBase {
    #[serde(rename = "代码")]
    pub code: String,
    #[serde(rename = "名称")]
    pub name: String,
}

#[derive(Debug, Clone)]
struct IndexEntry {
    base: StockBase,
    code_lower: String,
    name_lower: String,
}

/// 按代码或名称查找股票
#[derive(Debug, Clone, Default)]
pub struct StockIndex {
    entries: Vec<IndexEntry>,
}

impl StockIndex {
    pub fn new(stocks: Vec<StockBase>) -> Self {
        let entries = stocks
            .into_iter()
            .map(|base| IndexEntry {
                code_lower: base.code.to_lowercase(),
                name_lower: base.name.to_lowercase(),
                base,
            })
            .collect();
        Self { entries }
    }

    /// 空表视为数据错误，查询没有意义
    pub fn from_json(json: &str) -> Result<Self> {
        let stocks: Vec<StockBase> = serde_json::from_str(json)?;
        if stocks.is_empty() {
            return Err(TickerError::DataError("股票基础信息表为空".to_string()));
        }
        Ok(Self::new(stocks))
    }

    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 纯数字按代码前缀匹配，含汉字按名称包含匹配，其余代码或名称包含即可。
    /// 少于两个字符不查询。
    pub fn search(&self, keyword: &str, limit: usize) -> Vec<&StockBase> {
        let keyword = keyword.trim().to_lowercase();
        if keyword.chars().count() < 2 {
            return Vec::new();
        }

        let by_code_prefix = keyword.chars().all(|c| c.is_ascii_digit());
        let by_name = keyword.chars().any(is_cjk);

        self.entries
            .iter()
            .filter(|entry| {
                if by_code_prefix {
                    entry.code_lower.starts_with(&keyword)
                } else if by_name {
                    entry.name_lower.contains(&keyword)
                } else {
                    entry.code_lower.contains(&keyword) || entry.name_lower.contains(&keyword)
                }
            })
            .take(limit)
            .map(|entry| &entry.base)
            .collect()
    }
}

fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&c)
}
