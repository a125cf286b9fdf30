use super::core::{format_datetime, parse_timezone, to_datetime};
use super::Extension;
use chrono_tz::Tz;
use minijinja::value::Value;
use minijinja::{Environment, ErrorKind};

/// Style-based date and number formatting.
pub struct IntlExtension {
    timezone: Tz,
}

impl IntlExtension {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }
}

impl Extension for IntlExtension {
    fn name(&self) -> &'static str {
        "intl"
    }

    fn register(&self, env: &mut Environment<'static>) {
        let default_tz = self.timezone;
        env.add_filter(
            "localizeddate",
            move |value: Value,
                  date_style: Option<String>,
                  time_style: Option<String>,
                  timezone: Option<String>|
                  -> Result<String, minijinja::Error> {
                let tz = match timezone {
                    Some(name) => parse_timezone(&name)?,
                    None => default_tz,
                };
                let date_fmt = date_pattern(date_style.as_deref().unwrap_or("medium"))?;
                let time_fmt = time_pattern(time_style.as_deref().unwrap_or("medium"))?;
                let pattern = match (date_fmt.is_empty(), time_fmt.is_empty()) {
                    (false, false) => format!("{date_fmt}, {time_fmt}"),
                    (false, true) => date_fmt.to_string(),
                    (true, _) => time_fmt.to_string(),
                };
                format_datetime(&to_datetime(&value, tz)?, &pattern)
            },
        );
        env.add_filter("localizednumber", localizednumber);
        env.add_filter("localizedcurrency", localizedcurrency);
    }
}

fn unknown_style(style: &str) -> minijinja::Error {
    minijinja::Error::new(
        ErrorKind::InvalidOperation,
        format!("unknown format style '{style}'"),
    )
}

fn date_pattern(style: &str) -> Result<&'static str, minijinja::Error> {
    match style {
        "none" => Ok(""),
        "short" => Ok("%m/%d/%y"),
        "medium" => Ok("%b %-d, %Y"),
        "long" => Ok("%B %-d, %Y"),
        "full" => Ok("%A, %B %-d, %Y"),
        other => Err(unknown_style(other)),
    }
}

fn time_pattern(style: &str) -> Result<&'static str, minijinja::Error> {
    match style {
        "none" => Ok(""),
        "short" => Ok("%-I:%M %p"),
        "medium" => Ok("%-I:%M:%S %p"),
        "long" | "full" => Ok("%-I:%M:%S %p %Z"),
        other => Err(unknown_style(other)),
    }
}

fn to_number(value: &Value) -> Result<f64, minijinja::Error> {
    f64::try_from(value.clone()).map_err(|_| {
        minijinja::Error::new(ErrorKind::InvalidOperation, format!("{value} is not a number"))
    })
}

/// Inserts `,` between groups of three digits of a non-negative integer string.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn format_grouped(number: f64, max_decimals: usize, min_decimals: usize) -> String {
    let fixed = format!("{:.*}", max_decimals, number.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let mut frac = frac_part.trim_end_matches('0').to_string();
    while frac.len() < min_decimals {
        frac.push('0');
    }
    let sign = if number < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    if frac.is_empty() {
        format!("{sign}{}", group_thousands(int_part))
    } else {
        format!("{sign}{}.{frac}", group_thousands(int_part))
    }
}

fn localizednumber(value: Value, style: Option<String>) -> Result<String, minijinja::Error> {
    let number = to_number(&value)?;
    match style.as_deref().unwrap_or("decimal") {
        "decimal" => Ok(format_grouped(number, 3, 0)),
        "percent" => Ok(format!("{}%", format_grouped(number * 100.0, 0, 0))),
        other => Err(unknown_style(other)),
    }
}

fn localizedcurrency(value: Value, currency: String) -> Result<String, minijinja::Error> {
    let number = to_number(&value)?;
    let (decimals, symbol) = match currency.to_ascii_uppercase().as_str() {
        "USD" => (2, "$".to_string()),
        "EUR" => (2, "€".to_string()),
        "GBP" => (2, "£".to_string()),
        "JPY" => (0, "¥".to_string()),
        code => (2, format!("{code}\u{a0}")),
    };
    let amount = format_grouped(number, decimals, decimals);
    match amount.strip_prefix('-') {
        Some(positive) => Ok(format!("-{symbol}{positive}")),
        None => Ok(format!("{symbol}{amount}")),
    }
}
