use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://hq.sinajs.cn";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "zh-CN,zh;q=0.8,en-US;q=0.5,en;q=0.3";
pub const DEFAULT_REFERER: &str = "https://finance.sina.com.cn/";
pub const DEFAULT_NEWS_URL: &str = "https://baoer-api.xuangubao.cn/api/v6/message/newsflash";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub user_agent: String,
    pub accept_language: String,
    pub referer: String,
    /// 为空时沿用 reqwest 的默认行为（不设超时）
    pub request_timeout: Option<Duration>,
    pub refresh_interval: Duration,
    pub market_check_interval: Duration,
    pub ignore_market_hours: bool,
    /// 快讯接口地址
    pub news_url: String,
    pub news_interval: Duration,
}

impl Config {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            request_timeout: None,
            refresh_interval: Duration::from_secs(5),
            market_check_interval: Duration::from_secs(60),
            ignore_market_hours: false,
            news_url: DEFAULT_NEWS_URL.to_string(),
            news_interval: Duration::from_secs(60),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    pub fn with_referer(mut self, referer: &str) -> Self {
        self.referer = referer.to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn with_market_check_interval(mut self, interval: Duration) -> Self {
        self.market_check_interval = interval;
        self
    }

    pub fn with_news_url(mut self, url: &str) -> Self {
        self.news_url = url.to_string();
        self
    }

    pub fn with_news_interval(mut self, interval: Duration) -> Self {
        self.news_interval = interval;
        self
    }

    // 非交易时段也继续刷新，调试时使用
    pub fn with_ignore_market_hours(mut self, ignore: bool) -> Self {
        self.ignore_market_hours = ignore;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
