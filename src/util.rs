use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Asia::Shanghai;
use chrono_tz::Tz;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CODE_PATTERN: Regex = Regex::new(r"^(sh|sz)\d{6}$").unwrap();
}

// 股票代码工具

/// `000001.SZ` -> `sz000001`，`600000.SH` -> `sh600000`，其余原样返回
pub fn normalize_code(code: &str) -> String {
    if let Some(digits) = code.strip_suffix(".SZ") {
        return format!("sz{}", digits);
    }
    if let Some(digits) = code.strip_suffix(".SH") {
        return format!("sh{}", digits);
    }
    code.to_string()
}

/// 规范化、去重后用逗号拼接，保持首次出现的顺序
pub fn join_codes<I, S>(codes: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: Vec<String> = Vec::new();
    for code in codes {
        let code = code.as_ref().trim();
        if code.is_empty() {
            continue;
        }
        let normalized = normalize_code(code);
        if !seen.contains(&normalized) {
            seen.push(normalized);
        }
    }
    seen.join(",")
}

pub fn is_valid_code(code: &str) -> bool {
    CODE_PATTERN.is_match(code)
}

// 数值工具

/// 保留两位小数，规则与 JavaScript 的 `Number.prototype.toFixed(2)` 一致：
/// 按浮点数的精确十进制展开取舍，恰好为 5 时远离零。
/// 非有限值原样返回。
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= 1e13 {
        return value;
    }

    // f64 的精确展开在 30 位以内足以区分是否恰好落在 .xx5 上
    let digits = format!("{:.30}", value.abs());
    let Some((int_part, frac_part)) = digits.split_once('.') else {
        return value;
    };
    let Ok(int_value) = int_part.parse::<u64>() else {
        return value;
    };
    let frac = frac_part.as_bytes();

    let mut cents = int_value * 100 + u64::from(frac[0] - b'0') * 10 + u64::from(frac[1] - b'0');
    if frac[2] >= b'5' {
        cents += 1;
    }
    if cents == 0 {
        return 0.0;
    }

    let rounded = cents as f64 / 100.0;
    if value < 0.0 {
        -rounded
    } else {
        rounded
    }
}

// 交易时段工具

pub fn shanghai_now() -> DateTime<Tz> {
    Utc::now().with_timezone(&Shanghai)
}

/// A股连续竞价时段：工作日 9:30-11:30、13:00-15:00（北京时间）。
/// 11:30 这一分钟计入上午时段，15:00 不计入。节假日不做判断。
pub fn is_market_open<T: TimeZone>(now: &DateTime<T>) -> bool {
    let local = now.with_timezone(&Shanghai);
    if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
        return false;
    }

    let minutes = local.hour() * 60 + local.minute();
    (9 * 60 + 30..=11 * 60 + 30).contains(&minutes) || (13 * 60..15 * 60).contains(&minutes)
}
