use crate::config::Config;
use crate::decoder::TextDecoder;
use crate::models::watchlist::{Watchlist, WatchlistSnapshot};
use crate::scrapers::base::QuoteTransport;
use crate::services::quote_service::QuoteService;
use crate::util;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

type MarketGate = Box<dyn Fn() -> bool + Send + Sync>;

/// 交易时段内定时刷新自选股，并通过 watch 通道推送最新结果
///
/// 每次刷新在独立任务中执行，慢请求不会阻塞下一次刷新；
/// 通道里始终是最后完成的那次结果。
pub struct Poller<T, D> {
    service: Arc<QuoteService<T, D>>,
    watchlist: Arc<Watchlist>,
    refresh_interval: Duration,
    market_check_interval: Duration,
    ignore_market_hours: bool,
    market_gate: MarketGate,
    sender: Arc<watch::Sender<Arc<WatchlistSnapshot>>>,
}

impl<T, D> Poller<T, D>
where
    T: QuoteTransport + Send + Sync + 'static,
    D: TextDecoder + 'static,
{
    pub fn new(service: QuoteService<T, D>, watchlist: Watchlist, config: &Config) -> Self {
        let (sender, _) = watch::channel(Arc::new(WatchlistSnapshot::default()));
        Self {
            service: Arc::new(service),
            watchlist: Arc::new(watchlist),
            refresh_interval: config.refresh_interval,
            market_check_interval: config.market_check_interval,
            ignore_market_hours: config.ignore_market_hours,
            market_gate: Box::new(|| util::is_market_open(&util::shanghai_now())),
            sender: Arc::new(sender),
        }
    }

    /// 替换交易时段判断，测试时使用
    pub fn with_market_gate<F>(mut self, gate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.market_gate = Box::new(gate);
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<WatchlistSnapshot>> {
        self.sender.subscribe()
    }

    /// 立即刷新一次，不受交易时段限制
    pub async fn refresh_now(&self) {
        let snapshot = self.service.fetch_watchlist(&self.watchlist).await;
        self.sender.send_replace(Arc::new(snapshot));
    }

    /// 开始轮询，所有订阅者都退出后返回
    pub async fn run(self) {
        let mut refresh = time::interval(self.refresh_interval);
        refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut market_check = time::interval(self.market_check_interval);
        let mut open = false;

        loop {
            tokio::select! {
                _ = self.sender.closed() => {
                    info!("没有订阅者，停止轮询");
                    break;
                }
                _ = market_check.tick() => {
                    let now_open = self.ignore_market_hours || (self.market_gate)();
                    if now_open && !open {
                        info!("定时器已启用，每 {:?} 刷新一次行情", self.refresh_interval);
                    } else if !now_open && open {
                        info!("定时器已停用，当前不在交易时间内");
                    }
                    open = now_open;
                }
                _ = refresh.tick(), if open => {
                    self.spawn_refresh();
                }
            }
        }
    }

    fn spawn_refresh(&self) {
        let service = Arc::clone(&self.service);
        let watchlist = Arc::clone(&self.watchlist);
        let sender = Arc::clone(&self.sender);

        tokio::spawn(async move {
            let snapshot = service.fetch_watchlist(&watchlist).await;
            if snapshot.is_empty() {
                warn!("本次刷新没有获取到任何行情");
            }
            debug!(
                "刷新完成: 自选 {} 条，状态栏 {} 条",
                snapshot.stocks.len(),
                snapshot.status_bar.len()
            );
            sender.send_replace(Arc::new(snapshot));
        });
    }
}
