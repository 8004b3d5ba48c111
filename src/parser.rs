use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::models::quote::Quote;
use crate::util::round2;

lazy_static! {
    // var hq_str_sh600000="浦发银行,10.50,...";
    static ref LINE_PATTERN: Regex = Regex::new(r#"var hq_str_([A-Za-z0-9_]+)="(.+)";"#).unwrap();
    // 数值前缀：10.50abc 取 10.50，inf/nan 不算数值
    static ref NUMBER_PREFIX: Regex =
        Regex::new(r"^[+-]?(Infinity|([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?)").unwrap();
}

// 字段位置，其余位置不解析，只保留在 Quote::fields 中
const NAME: usize = 0;
const OPEN: usize = 1;
const YESTERDAY_CLOSE: usize = 2;
const CURRENT: usize = 3;
const HIGH: usize = 4;
const LOW: usize = 5;
const TURNOVER: usize = 9;
const DATE: usize = 30;
const TIME: usize = 31;

/// 解析新浪行情文本，每行对应一只股票。
///
/// 不符合格式的行（停牌、退市、代码不存在时接口会返回空串）直接跳过，
/// 输出顺序与输入行顺序一致。该函数不会失败，空输入返回空列表。
pub fn parse_quotes(text: &str) -> Vec<Quote> {
    let quotes: Vec<Quote> = text.trim().split('\n').filter_map(parse_line).collect();
    debug!("解析得到 {} 条行情", quotes.len());
    quotes
}

/// 解析单行，不匹配时返回 `None`
pub fn parse_line(line: &str) -> Option<Quote> {
    let captures = match LINE_PATTERN.captures(line) {
        Some(captures) => captures,
        None => {
            if !line.trim().is_empty() {
                debug!("跳过无法识别的行: {}", line);
            }
            return None;
        }
    };

    let code = captures[1].to_string();
    let fields: Vec<String> = captures[2].split(',').map(str::to_string).collect();

    let yesterday_close = number_at(&fields, YESTERDAY_CLOSE);
    let current = number_at(&fields, CURRENT);

    // 涨跌幅必须用取整后的涨跌额计算
    let change = round2(current - yesterday_close);
    let change_percent = round2(change / yesterday_close * 100.0);

    let timestamp = format!("{} {}", text_at(&fields, DATE), text_at(&fields, TIME));

    Some(Quote {
        code,
        name: text_at(&fields, NAME).to_string(),
        open: number_at(&fields, OPEN),
        yesterday_close,
        current,
        high: number_at(&fields, HIGH),
        low: number_at(&fields, LOW),
        change,
        change_percent,
        turnover: number_at(&fields, TURNOVER),
        timestamp,
        fields,
    })
}

fn text_at(fields: &[String], index: usize) -> &str {
    fields.get(index).map(String::as_str).unwrap_or_default()
}

// 缺失或无法解析的数值记为 NaN，不做修正
fn number_at(fields: &[String], index: usize) -> f64 {
    fields
        .get(index)
        .map(|value| parse_number(value))
        .unwrap_or(f64::NAN)
}

/// 取字段开头最长的数值部分，后面多余的字符忽略。
///
/// 开头不是数值（包括 `--`、`inf`、`nan`）时返回 NaN，只有 `Infinity` 会得到无穷大。
fn parse_number(value: &str) -> f64 {
    NUMBER_PREFIX
        .find(value.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUFA: &str = "var hq_str_sh600000=\"浦发银行,10.50,10.40,10.60,10.70,10.30,0,0,0,123456789,,,,,,,,,,,,,,,,,,,,,20240101,093000\";";

    fn line(code: &str, name: &str, yesterday_close: &str, current: &str) -> String {
        format!(
            "var hq_str_{}=\"{},10.00,{},{},10.10,9.90,0,0,0,1000,,,,,,,,,,,,,,,,,,,,,20240102,150000,00\";",
            code, name, yesterday_close, current
        )
    }

    #[test]
    fn test_parse_full_line() {
        let quotes = parse_quotes(PUFA);
        assert_eq!(quotes.len(), 1);

        let quote = &quotes[0];
        assert_eq!(quote.code, "sh600000");
        assert_eq!(quote.name, "浦发银行");
        assert_eq!(quote.open, 10.50);
        assert_eq!(quote.yesterday_close, 10.40);
        assert_eq!(quote.current, 10.60);
        assert_eq!(quote.high, 10.70);
        assert_eq!(quote.low, 10.30);
        assert_eq!(quote.change, 0.20);
        assert_eq!(quote.change_percent, 1.92);
        assert_eq!(quote.turnover, 123456789.0);
        assert_eq!(quote.timestamp, "20240101 093000");
        assert_eq!(quote.fields.len(), 32);
    }

    #[test]
    fn test_percent_uses_rounded_change() {
        let quotes = parse_quotes(&line("sz000001", "平安银行", "10.00", "10.004"));
        assert_eq!(quotes[0].change, 0.0);
        assert_eq!(quotes[0].change_percent, 0.0);
    }

    #[test]
    fn test_falling_quote() {
        let quotes = parse_quotes(&line("sz000002", "万科A", "8.00", "7.77"));
        assert_eq!(quotes[0].change, -0.23);
        // -0.23 / 8 * 100 = -2.875
        assert_eq!(quotes[0].change_percent, -2.88);
    }

    #[test]
    fn test_order_is_preserved() {
        let text = [
            line("sh600036", "招商银行", "30.00", "30.30"),
            line("sz000001", "平安银行", "10.00", "9.90"),
            line("sh601318", "中国平安", "40.00", "40.00"),
        ]
        .join("\n");

        let codes: Vec<String> = parse_quotes(&text).into_iter().map(|q| q.code).collect();
        assert_eq!(codes, vec!["sh600036", "sz000001", "sh601318"]);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = [
            line("sh600036", "招商银行", "30.00", "30.30"),
            "var hq_str_sh688999=\"\";".to_string(),
            "<html><body>502 Bad Gateway</body></html>".to_string(),
            line("sz000001", "平安银行", "10.00", "9.90"),
            "garbage".to_string(),
        ]
        .join("\n");

        let codes: Vec<String> = parse_quotes(&text).into_iter().map(|q| q.code).collect();
        assert_eq!(codes, vec!["sh600036", "sz000001"]);
    }

    #[test]
    fn test_all_lines_malformed() {
        let text = "<html>\n<head><title>Forbidden</title></head>\n</html>";
        assert!(parse_quotes(text).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_quotes("").is_empty());
        assert!(parse_quotes("  \n\t\n  ").is_empty());
    }

    #[test]
    fn test_crlf_lines() {
        let text = format!("{}\r\n{}\r\n", PUFA, line("sz000001", "平安银行", "10.00", "9.90"));
        assert_eq!(parse_quotes(&text).len(), 2);
    }

    #[test]
    fn test_non_numeric_fields_become_nan() {
        let text = "var hq_str_sh600001=\"停牌股,--,10.00,--,--,--,0,0,0,--\";";
        let quotes = parse_quotes(text);
        assert_eq!(quotes.len(), 1);

        let quote = &quotes[0];
        assert!(quote.open.is_nan());
        assert_eq!(quote.yesterday_close, 10.0);
        assert!(quote.current.is_nan());
        assert!(quote.change.is_nan());
        assert!(quote.change_percent.is_nan());
        assert!(quote.turnover.is_nan());
        assert!(!quote.has_price());
    }

    #[test]
    fn test_numeric_prefix() {
        assert_eq!(parse_number("10.50abc"), 10.5);
        assert_eq!(parse_number(" +1e2x"), 100.0);
        assert_eq!(parse_number("1e"), 1.0);
        assert_eq!(parse_number(".5"), 0.5);
        assert_eq!(parse_number("-3."), -3.0);
        assert_eq!(parse_number("Infinity"), f64::INFINITY);
        assert_eq!(parse_number("-Infinity"), f64::NEG_INFINITY);
        assert!(parse_number("inf").is_nan());
        assert!(parse_number("NaN").is_nan());
        assert!(parse_number("--").is_nan());
        assert!(parse_number("").is_nan());
    }

    #[test]
    fn test_trailing_garbage_in_price() {
        let quotes = parse_quotes(&line("sh600003", "测试", "10.00abc", "10.50元"));
        assert_eq!(quotes[0].yesterday_close, 10.0);
        assert_eq!(quotes[0].current, 10.5);
        assert_eq!(quotes[0].change, 0.5);
        assert_eq!(quotes[0].change_percent, 5.0);
    }

    #[test]
    fn test_unpadded_payload_shifts_timestamp() {
        // 日期后少一个字段时，日期落在 29，时间落在 30，位置 31 为空
        let text = "var hq_str_sh600000=\"浦发银行,10.50,10.40,10.60,10.70,10.30,0,0,0,123456789,,,,,,,,,,,,,,,,,,,,20240101,093000\";";
        let quote = parse_line(text).unwrap();
        assert_eq!(quote.fields.len(), 31);
        assert_eq!(quote.field(29), Some("20240101"));
        assert_eq!(quote.timestamp, "093000 ");
        assert_eq!(quote.change, 0.2);
        assert_eq!(quote.change_percent, 1.92);
        assert_eq!(quote.turnover, 123456789.0);
    }

    #[test]
    fn test_short_payload_keeps_what_exists() {
        let quotes = parse_quotes("var hq_str_sh600000=\"浦发银行,10.50,10.40,10.60\";");
        let quote = &quotes[0];
        assert_eq!(quote.current, 10.60);
        assert!(quote.high.is_nan());
        assert_eq!(quote.timestamp, " ");
        assert_eq!(quote.fields.len(), 4);
    }

    #[test]
    fn test_zero_yesterday_close() {
        let quotes = parse_quotes(&line("sh600002", "新股", "0", "10.00"));
        assert_eq!(quotes[0].change, 10.0);
        assert!(quotes[0].change_percent.is_infinite());
    }

    #[test]
    fn test_opaque_fields_are_kept() {
        let text = "var hq_str_sh600000=\"浦发银行,10.50,10.40,10.60,10.70,10.30,10.59,10.60,5000,123456789,b1,b1p,,,,,,,,,,,,,,,,,,,20240101,093000,00\";";
        let quote = parse_line(text).unwrap();
        assert_eq!(quote.field(6), Some("10.59"));
        assert_eq!(quote.field(8), Some("5000"));
        assert_eq!(quote.field(10), Some("b1"));
        assert_eq!(quote.field(32), Some("00"));
    }
}
