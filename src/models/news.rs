use serde::{Deserialize, Serialize};

/// 一条快讯，只取展示需要的字段，其余字段忽略
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    /// Unix 时间戳（秒）
    #[serde(default)]
    pub created_at: i64,
}

impl NewsItem {
    /// 标题为空时退回到摘要
    pub fn headline(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.summary
        } else {
            &self.title
        }
    }
}
