pub mod news_service;
pub mod poller;
pub mod quote_service;
