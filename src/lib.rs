// 公开导出的模块，供外部使用
pub mod models;
pub mod errors;
pub mod config;
pub mod decoder;
pub mod parser;
pub mod scrapers;
pub mod services;
pub mod lookup;
pub mod util;

// 重新导出常用类型，方便使用
pub use config::Config;
pub use decoder::{Gb18030Decoder, TextDecoder};
pub use errors::{Result, TickerError};
pub use models::news::NewsItem;
pub use models::quote::Quote;
pub use models::watchlist::{Watchlist, WatchlistSnapshot};
pub use parser::parse_quotes;
pub use scrapers::base::{NewsSource, QuoteTransport};
pub use scrapers::news::NewsScraper;
pub use scrapers::sina::SinaScraper;
pub use services::news_service::{NewsService, NewsWatermark};
pub use services::poller::Poller;
pub use services::quote_service::QuoteService;
pub use util::normalize_code;
