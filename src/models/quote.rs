use serde::Serialize;

/// 单只股票的实时行情快照
///
/// 每次抓取都会重新生成，核心流程不会修改已构造的行情。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// 带市场前缀的代码，如 `sh600000`
    pub code: String,
    pub name: String,
    pub open: f64,
    pub yesterday_close: f64,
    pub current: f64,
    pub high: f64,
    pub low: f64,
    /// 涨跌额，保留两位小数
    pub change: f64,
    /// 涨跌幅（%），由已取整的涨跌额计算，保留两位小数
    pub change_percent: f64,
    /// 成交额
    pub turnover: f64,
    /// `日期 时间`
    pub timestamp: String,
    /// 上游返回的全部字段，按位置原样保留
    pub fields: Vec<String>,
}

impl Quote {
    /// 按位置读取原始字段
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn is_rising(&self) -> bool {
        self.change_percent >= 0.0
    }

    /// 停牌或占位数据会让价格变成 NaN，这里只做判断，不改值
    pub fn has_price(&self) -> bool {
        !self.current.is_nan() && !self.yesterday_close.is_nan()
    }

    /// 状态栏文本：`「名称」 现价  (+涨跌幅%)`
    pub fn status_text(&self) -> String {
        let percent = if self.is_rising() {
            format!("+{}", self.change_percent)
        } else {
            self.change_percent.to_string()
        };
        format!("「{}」 {}  ({}%)", self.name, self.current, percent)
    }

    pub fn tooltip(&self) -> String {
        format!(
            "「今日行情」 {}（{}）\n涨跌：{}   百分：{}%\n最高：{}   最低：{}\n今开：{}   昨收：{}\n成交额：{}\n更新时间：{}",
            self.name,
            self.code,
            self.change,
            self.change_percent,
            self.high,
            self.low,
            self.open,
            self.yesterday_close,
            self.turnover,
            self.timestamp
        )
    }
}
