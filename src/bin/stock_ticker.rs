use stock_ticker::config::Config;
use stock_ticker::lookup::StockIndex;
use stock_ticker::models::news::NewsItem;
use stock_ticker::models::quote::Quote;
use stock_ticker::models::watchlist::{Watchlist, WatchlistSnapshot};
use stock_ticker::services::news_service::{NewsService, NewsWatermark};
use stock_ticker::services::poller::Poller;
use stock_ticker::services::quote_service::QuoteService;

use anyhow::{bail, Context};
use chrono::DateTime;
use clap::{App, Arg, ArgMatches, SubCommand};
use log::info;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init();

    let app = App::new("stock_ticker")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A股实时行情：新浪接口抓取、解码与交易时段轮询")
        .arg(
            Arg::with_name("base-url")
                .long("base-url")
                .value_name("URL")
                .help("Quote endpoint base URL")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::with_name("timeout")
                .long("timeout")
                .value_name("SECONDS")
                .help("Request timeout in seconds (no timeout by default)")
                .takes_value(true)
                .global(true),
        )
        .subcommand(
            SubCommand::with_name("quote")
                .about("Fetch quotes once")
                .arg(
                    Arg::with_name("codes")
                        .value_name("CODES")
                        .help("Ticker codes, e.g. sh600000 or 000001.SZ")
                        .required(true)
                        .multiple_values(true),
                )
                .arg(
                    Arg::with_name("json")
                        .long("json")
                        .help("Print quotes as JSON")
                        .takes_value(false),
                ),
        )
        .subcommand(
            SubCommand::with_name("watch")
                .about("Refresh a watchlist during market hours")
                .arg(
                    Arg::with_name("watchlist")
                        .short('w')
                        .long("watchlist")
                        .value_name("FILE")
                        .help("Watchlist JSON file: {\"stocks\": [...], \"statusBar\": [...]}")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("codes")
                        .short('c')
                        .long("codes")
                        .value_name("CODES")
                        .help("Comma separated codes, used when no watchlist file is given")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("interval")
                        .short('i')
                        .long("interval")
                        .value_name("SECONDS")
                        .help("Refresh interval in seconds")
                        .takes_value(true)
                        .default_value("5"),
                )
                .arg(
                    Arg::with_name("always")
                        .long("always")
                        .help("Keep refreshing outside market hours")
                        .takes_value(false),
                )
                .arg(
                    Arg::with_name("news")
                        .long("news")
                        .help("Also poll the newsflash feed")
                        .takes_value(false),
                )
                .arg(
                    Arg::with_name("news-interval")
                        .long("news-interval")
                        .value_name("SECONDS")
                        .help("Newsflash refresh interval in seconds")
                        .takes_value(true)
                        .default_value("60"),
                )
                .arg(
                    Arg::with_name("verbose")
                        .short('v')
                        .long("verbose")
                        .help("Print the full quote summary for status bar stocks")
                        .takes_value(false),
                ),
        )
        .subcommand(
            SubCommand::with_name("search")
                .about("Search the stock lookup table by code or name")
                .arg(
                    Arg::with_name("keyword")
                        .value_name("KEYWORD")
                        .required(true),
                )
                .arg(
                    Arg::with_name("index")
                        .long("index")
                        .value_name("FILE")
                        .help("JSON array of {\"代码\", \"名称\"} records")
                        .takes_value(true)
                        .default_value("allbase.json"),
                )
                .arg(
                    Arg::with_name("limit")
                        .short('l')
                        .long("limit")
                        .value_name("LIMIT")
                        .takes_value(true)
                        .default_value("10"),
                ),
        );

    let matches = app.get_matches();
    let config = build_config(&matches)?;

    if let Some(matches) = matches.subcommand_matches("quote") {
        let codes: Vec<&str> = matches.values_of("codes").map(|v| v.collect()).unwrap_or_default();
        let service = QuoteService::from_config(&config)?;
        let quotes = service.fetch_quotes(&codes.join(",")).await;

        if matches.is_present("json") {
            println!("{}", serde_json::to_string_pretty(&quotes)?);
        } else {
            print_table(&quotes);
        }
    } else if let Some(matches) = matches.subcommand_matches("watch") {
        let watchlist = match (matches.value_of("watchlist"), matches.value_of("codes")) {
            (Some(path), _) => Watchlist::load_from_file(path)
                .with_context(|| format!("读取自选股文件失败: {}", path))?,
            (None, Some(codes)) => Watchlist::new(
                codes.split(',').map(|c| c.trim().to_string()).collect(),
                Vec::new(),
            ),
            (None, None) => bail!("需要 --watchlist 或 --codes"),
        };
        if watchlist.is_empty() {
            bail!("自选股列表为空");
        }

        let interval = matches.value_of("interval").unwrap_or("5").parse::<u64>()?;
        let news_interval = matches.value_of("news-interval").unwrap_or("60").parse::<u64>()?;
        let config = config
            .with_refresh_interval(Duration::from_secs(interval.max(1)))
            .with_news_interval(Duration::from_secs(news_interval.max(1)))
            .with_ignore_market_hours(matches.is_present("always"));

        let options = WatchOptions {
            news: matches.is_present("news"),
            verbose: matches.is_present("verbose"),
        };
        watch(config, watchlist, options).await?;
    } else if let Some(matches) = matches.subcommand_matches("search") {
        let keyword = matches.value_of("keyword").unwrap_or_default();
        let path = matches.value_of("index").unwrap_or("allbase.json");
        let limit = matches.value_of("limit")
            .unwrap_or("10")
            .parse::<usize>()
            .unwrap_or(10);

        let index = StockIndex::load_from_file(path)
            .with_context(|| format!("加载股票数据失败，请检查 {}", path))?;
        info!("Loaded {} stocks from {}", index.len(), path);

        for stock in index.search(keyword, limit) {
            println!("{:<12} | {}", stock.code, stock.name);
        }
    } else {
        info!("No command specified. Use --help for usage information.");
    }

    Ok(())
}

fn build_config(matches: &ArgMatches) -> anyhow::Result<Config> {
    let mut config = Config::new();
    if let Some(url) = matches.value_of("base-url") {
        config = config.with_base_url(url);
    }
    if let Some(timeout) = matches.value_of("timeout") {
        let seconds = timeout.parse::<u64>().context("--timeout 需要整数秒")?;
        config = config.with_request_timeout(Some(Duration::from_secs(seconds)));
    }
    Ok(config)
}

struct WatchOptions {
    news: bool,
    verbose: bool,
}

async fn watch(config: Config, watchlist: Watchlist, options: WatchOptions) -> anyhow::Result<()> {
    let service = QuoteService::from_config(&config)?;
    let news_service = NewsService::from_config(&config)?;
    let poller = Poller::new(service, watchlist, &config);
    let mut rx = poller.subscribe();

    // 启动时先刷新一次，之后只在交易时段刷新
    poller.refresh_now().await;
    print_snapshot(&rx.borrow_and_update(), options.verbose);

    let handle = tokio::spawn(poller.run());

    // 快讯水位只在这里维护
    let mut watermark = NewsWatermark::new();
    let mut news_tick = tokio::time::interval(config.news_interval);

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = rx.borrow_and_update().clone();
                print_snapshot(&snapshot, options.verbose);
            }
            _ = news_tick.tick(), if options.news => {
                for item in watermark.take_new(news_service.fetch_news().await) {
                    print_news(&item);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("收到退出信号");
                break;
            }
        }
    }

    drop(rx);
    handle.await?;
    Ok(())
}

fn print_snapshot(snapshot: &WatchlistSnapshot, verbose: bool) {
    println!("{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    if snapshot.is_empty() {
        println!("本次没有获取到行情");
        return;
    }
    for quote in &snapshot.status_bar {
        if verbose {
            println!("{}\n", quote.tooltip());
        } else {
            println!("{}", quote.status_text());
        }
    }
    print_table(&snapshot.stocks);
}

fn print_news(item: &NewsItem) {
    let time = DateTime::from_timestamp(item.created_at, 0)
        .map(|t| t.with_timezone(&chrono::Local).format("%H:%M:%S").to_string())
        .unwrap_or_default();
    println!("[快讯 {}] {}", time, item.headline());
}

fn print_table(quotes: &[Quote]) {
    if quotes.is_empty() {
        println!("本次没有获取到行情");
        return;
    }

    println!("{:<10} {:<10} {:>10} {:>8} {:>9} {:>10} {:>10} {:>16} {:<16}",
             "Code", "Name", "Current", "Change", "Percent", "High", "Low", "Turnover", "Time");
    println!("{:-<108}", "");
    for q in quotes {
        let sign = if q.is_rising() { "+" } else { "" };
        println!("{:<10} {:<10} {:>10.2} {:>8.2} {:>8}% {:>10.2} {:>10.2} {:>16.0} {:<16}",
                 q.code, q.name, q.current, q.change, format!("{}{:.2}", sign, q.change_percent),
                 q.high, q.low, q.turnover, q.timestamp);
    }
}
