use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

/// 值归一化: 去首尾空白、转小写、内部空白折叠为单个空格。
/// 全函数, 无失败分支, None/空串 由调用方以空串传入。
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================
// 日期解析
// ============================

/// 日期解析策略表 - 按优先级依次尝试, 每个策略都是全函数。
/// 新格式只需追加条目, 不用改调用点。
static DATE_STRATEGIES: &[fn(&str) -> Option<NaiveDate>] = &[
    parse_iso_date,
    parse_numeric_date,
    parse_month_day_year,
    parse_day_month_year,
    parse_month_year,
];

/// 宽松日期解析: 归一化后依次套用策略表, 全部失败返回 None (不是错误)。
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = normalize(raw);
    if cleaned.is_empty() {
        return None;
    }
    DATE_STRATEGIES.iter().find_map(|parse| parse(&cleaned))
}

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})[/\-](\d{1,2})[/\-](\d{1,2})$").unwrap());

/// YYYY-MM-DD / YYYY/MM/DD
fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let caps = ISO_DATE.captures(s)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

static NUMERIC_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})[/\-](\d{1,2})[/\-](\d{4})$").unwrap());

/// NN/NN/YYYY - 先按月在前解释, 无效日期 (如 13/05) 再按日在前
fn parse_numeric_date(s: &str) -> Option<NaiveDate> {
    let caps = NUMERIC_DATE.captures(s)?;
    let a: u32 = caps[1].parse().ok()?;
    let b: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, a, b).or_else(|| NaiveDate::from_ymd_opt(year, b, a))
}

static MONTH_DAY_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z]{3,9})[\s\-](\d{1,2}),?[\s\-](\d{4})$").unwrap());

/// "january 15, 2025" / "jan 15 2025" / "jan-15-2025"
fn parse_month_day_year(s: &str) -> Option<NaiveDate> {
    let caps = MONTH_DAY_YEAR.captures(s)?;
    let month = month_number(&caps[1])?;
    let day: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

static DAY_MONTH_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})[\s\-]([a-z]{3,9}),?[\s\-](\d{4})$").unwrap());

/// "15 january 2025" / "15 jan 2025" / "1-jan-2025"
fn parse_day_month_year(s: &str) -> Option<NaiveDate> {
    let caps = DAY_MONTH_YEAR.captures(s)?;
    let day: u32 = caps[1].parse().ok()?;
    let month = month_number(&caps[2])?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

static MONTH_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([a-z]{3,9})\s(\d{4})$").unwrap());

/// "january 2025" - 视为当月 1 日
fn parse_month_year(s: &str) -> Option<NaiveDate> {
    let caps = MONTH_YEAR.captures(s)?;
    let month = month_number(&caps[1])?;
    let year: i32 = caps[2].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

const MONTH_NAMES: &[(&str, u32)] = &[
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
];

/// 月份名查找: 全名或 3 字母以上前缀 (jan/sept/...), 入参已是小写
fn month_number(name: &str) -> Option<u32> {
    MONTH_NAMES.iter().find_map(|(full, num)| {
        if *full == name || (name.len() >= 3 && full.starts_with(name)) {
            Some(*num)
        } else {
            None
        }
    })
}

// ============================
// 金额解析
// ============================

static CURRENCY_PLAIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$?(\d{1,3}(?:,\d{3})+|\d+)(?:\.(\d{1,2}))?$").unwrap());
static CURRENCY_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$?(\d+(?:\.\d+)?)\s?([kmb])$").unwrap());
static CURRENCY_SPELLED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(one|two|five|ten)\s(thousand|million)$").unwrap());

/// 金额解析: 可选 $ 前缀、千分位、小数、K/M/B 倍率、少量英文数词。
/// 解析失败返回 None (不是金额, 交给下一比较策略)。
pub fn parse_currency(raw: &str) -> Option<BigDecimal> {
    let cleaned = normalize(raw);
    if cleaned.is_empty() {
        return None;
    }

    if let Some(caps) = CURRENCY_PLAIN.captures(&cleaned) {
        let mut digits = caps[1].replace(',', "");
        if let Some(cents) = caps.get(2) {
            digits.push('.');
            digits.push_str(cents.as_str());
        }
        return BigDecimal::from_str(&digits).ok();
    }

    if let Some(caps) = CURRENCY_SUFFIX.captures(&cleaned) {
        let base = BigDecimal::from_str(&caps[1]).ok()?;
        let multiplier = match &caps[2] {
            "k" => 1_000i64,
            "m" => 1_000_000,
            _ => 1_000_000_000,
        };
        return Some(base * BigDecimal::from(multiplier));
    }

    if let Some(caps) = CURRENCY_SPELLED.captures(&cleaned) {
        let base: i64 = match &caps[1] {
            "one" => 1,
            "two" => 2,
            "five" => 5,
            _ => 10,
        };
        let magnitude: i64 = match &caps[2] {
            "thousand" => 1_000,
            _ => 1_000_000,
        };
        return Some(BigDecimal::from(base * magnitude));
    }

    None
}

/// 金额等值: 差额 < 0.01 (容忍分位精度)
pub fn currency_amounts_equal(a: &BigDecimal, b: &BigDecimal) -> bool {
    let tolerance = BigDecimal::from_str("0.01").expect("static literal");
    (a - b).abs() < tolerance
}

// ============================
// 百分比解析
// ============================

static PERCENT_SIGN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?)\s?%$").unwrap());
static PERCENT_DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0\.\d+$").unwrap());
static PERCENT_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?)\spercent$").unwrap());
static PERCENT_SPELLED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(zero|one|two|three|four|five|six|seven|eight|nine|ten|twenty|thirty|forty|fifty|sixty|seventy|eighty|ninety|hundred)\spercent$",
    )
    .unwrap()
});

const SPELLED_PERCENTAGES: &[(&str, f64)] = &[
    ("zero", 0.0),
    ("one", 1.0),
    ("two", 2.0),
    ("three", 3.0),
    ("four", 4.0),
    ("five", 5.0),
    ("six", 6.0),
    ("seven", 7.0),
    ("eight", 8.0),
    ("nine", 9.0),
    ("ten", 10.0),
    ("twenty", 20.0),
    ("thirty", 30.0),
    ("forty", 40.0),
    ("fifty", 50.0),
    ("sixty", 60.0),
    ("seventy", 70.0),
    ("eighty", 80.0),
    ("ninety", 90.0),
    ("hundred", 100.0),
];

/// 百分比解析: "N%"、"N percent"、裸小数 0.NNN (×100)、整十英文数词。
pub fn parse_percentage(raw: &str) -> Option<f64> {
    let cleaned = normalize(raw);
    if cleaned.is_empty() {
        return None;
    }

    if let Some(caps) = PERCENT_SIGN.captures(&cleaned) {
        return caps[1].parse().ok();
    }
    if PERCENT_DECIMAL.is_match(&cleaned) {
        let n: f64 = cleaned.parse().ok()?;
        return Some(n * 100.0);
    }
    if let Some(caps) = PERCENT_WORD.captures(&cleaned) {
        return caps[1].parse().ok();
    }
    if let Some(caps) = PERCENT_SPELLED.captures(&cleaned) {
        let word = &caps[1];
        return SPELLED_PERCENTAGES
            .iter()
            .find(|(w, _)| w == &word)
            .map(|(_, n)| *n);
    }

    None
}

/// 百分比等值: 差值 < 0.001
pub fn percentages_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < 0.001
}
