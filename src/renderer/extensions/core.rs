use super::Extension;
use crate::config::BuilderConfig;
use crate::error::{Error, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use minijinja::value::{Value, ValueKind};
use minijinja::{Environment, ErrorKind};
use std::fmt::Write;

/// Default date format and timezone applied by the `date` filter.
#[derive(Debug, Clone)]
pub struct DateSettings {
    pub format: String,
    pub timezone: Tz,
}

impl DateSettings {
    /// Validates `format` as a strftime pattern and `timezone` as an IANA name.
    pub fn new(format: &str, timezone: &str) -> Result<Self> {
        if !is_valid_format(format) {
            return Err(Error::ConfigurationError(format!(
                "'{format}' is not a valid date format"
            )));
        }
        let timezone = parse_timezone(timezone).map_err(|_| {
            Error::ConfigurationError(format!("'{timezone}' is not a valid timezone"))
        })?;
        Ok(Self { format: format.to_string(), timezone })
    }

    pub fn from_config(config: &BuilderConfig) -> Result<Self> {
        Self::new(config.date_format()?, config.date_timezone()?)
    }
}

/// The `date` filter and function.
pub struct CoreExtension {
    settings: DateSettings,
}

impl CoreExtension {
    pub fn new(settings: DateSettings) -> Self {
        Self { settings }
    }
}

impl Extension for CoreExtension {
    fn name(&self) -> &'static str {
        "core"
    }

    fn register(&self, env: &mut Environment<'static>) {
        let settings = self.settings.clone();
        env.add_filter(
            "date",
            move |value: Value,
                  format: Option<String>,
                  timezone: Option<String>|
                  -> Result<String, minijinja::Error> {
                let tz = match timezone {
                    Some(name) => parse_timezone(&name)?,
                    None => settings.timezone,
                };
                let date = to_datetime(&value, tz)?;
                format_datetime(&date, format.as_deref().unwrap_or(&settings.format))
            },
        );

        let default_tz = self.settings.timezone;
        env.add_function(
            "date",
            move |value: Option<Value>,
                  timezone: Option<String>|
                  -> Result<String, minijinja::Error> {
                let tz = match timezone {
                    Some(name) => parse_timezone(&name)?,
                    None => default_tz,
                };
                let value = value.unwrap_or_else(|| Value::from("now"));
                Ok(to_datetime(&value, tz)?.to_rfc3339())
            },
        );
    }
}

fn is_valid_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

pub(crate) fn parse_timezone(name: &str) -> Result<Tz, minijinja::Error> {
    name.parse::<Tz>().map_err(|_| {
        minijinja::Error::new(ErrorKind::InvalidOperation, format!("unknown timezone '{name}'"))
    })
}

/// Formats `date` with a strftime pattern; invalid patterns are an error, not a panic.
pub(crate) fn format_datetime(
    date: &DateTime<Tz>,
    format: &str,
) -> Result<String, minijinja::Error> {
    let mut out = String::new();
    write!(out, "{}", date.format(format)).map_err(|_| {
        minijinja::Error::new(
            ErrorKind::InvalidOperation,
            format!("'{format}' is not a valid date format"),
        )
    })?;
    Ok(out)
}

/// Interprets a template value as a point in time.
///
/// Integers are Unix timestamps. Strings may be `now`, RFC 3339, or a naive
/// `YYYY-MM-DD[ HH:MM:SS]` which is read as local time in `tz`.
pub(crate) fn to_datetime(value: &Value, tz: Tz) -> Result<DateTime<Tz>, minijinja::Error> {
    let invalid = || {
        minijinja::Error::new(
            ErrorKind::InvalidOperation,
            format!("cannot interpret {value} as a date"),
        )
    };

    match value.kind() {
        ValueKind::Number => {
            let seconds = i64::try_from(value.clone()).map_err(|_| invalid())?;
            tz.timestamp_opt(seconds, 0).single().ok_or_else(invalid)
        }
        ValueKind::String => {
            let text = value.as_str().unwrap_or_default().trim();
            if text == "now" {
                return Ok(Utc::now().with_timezone(&tz));
            }
            if let Ok(date) = DateTime::parse_from_rfc3339(text) {
                return Ok(date.with_timezone(&tz));
            }
            let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
                .ok()
                .or_else(|| {
                    NaiveDate::parse_from_str(text, "%Y-%m-%d")
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                })
                .ok_or_else(invalid)?;
            tz.from_local_datetime(&naive).earliest().ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::extensions::testing::{env_with, render, render_with};
    use serde_json::json;

    fn extension(format: &str, timezone: &str) -> CoreExtension {
        CoreExtension::new(DateSettings::new(format, timezone).unwrap())
    }

    #[test]
    fn test_date_filter_uses_defaults() {
        let ext = extension("%Y-%m-%d %H:%M", "UTC");
        assert_eq!(render(&ext, "{{ 0 | date }}"), "1970-01-01 00:00");

        let ext = extension("%Y-%m-%d %H:%M", "Asia/Tokyo");
        assert_eq!(render(&ext, "{{ 0 | date }}"), "1970-01-01 09:00");
    }

    #[test]
    fn test_date_filter_overrides() {
        let ext = extension("%Y", "UTC");
        assert_eq!(render(&ext, "{{ 86400 | date('%d/%m/%Y') }}"), "02/01/1970");
        assert_eq!(
            render(&ext, "{{ '2024-03-01T23:30:00Z' | date('%Y-%m-%d', 'Europe/Paris') }}"),
            "2024-03-02"
        );
    }

    #[test]
    fn test_naive_strings_read_in_configured_timezone() {
        let ext = extension("%Y-%m-%dT%H:%M%:z", "Europe/Paris");
        assert_eq!(
            render_with(&ext, "{{ d | date }}", json!({ "d": "2024-07-14" })),
            "2024-07-14T00:00+02:00"
        );
        assert_eq!(
            render_with(&ext, "{{ d | date }}", json!({ "d": "2024-01-14 08:15:00" })),
            "2024-01-14T08:15+01:00"
        );
    }

    #[test]
    fn test_date_function_normalizes() {
        let ext = extension("%Y", "UTC");
        assert_eq!(render(&ext, "{{ date(0) }}"), "1970-01-01T00:00:00+00:00");
        assert!(!render(&ext, "{{ date() }}").is_empty());
    }

    #[test]
    fn test_invalid_values_fail() {
        let ext = extension("%Y", "UTC");
        let env = env_with(&ext);
        let err = env.render_str("{{ 'yesterday-ish' | date }}", json!({})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);

        let err = env.render_str("{{ 0 | date('%Y', 'Mars/Olympus') }}", json!({})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);

        let err = env.render_str("{{ 0 | date('%Q') }}", json!({})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }

    #[test]
    fn test_settings_validation() {
        assert!(DateSettings::new("%-d %B %Y", "Europe/Paris").is_ok());
        assert!(matches!(
            DateSettings::new("%-d %B %Y", "Nowhere/City"),
            Err(Error::ConfigurationError(_))
        ));
        assert!(matches!(
            DateSettings::new("%Q", "UTC"),
            Err(Error::ConfigurationError(_))
        ));
    }
}
