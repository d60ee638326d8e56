// Current date and time tools

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_object, json_schema_string, Tool};
use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, SecondsFormat, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Zone used when the caller names none or an unknown one.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Seoul;

/// Both date/time tools, in listing order.
pub fn datetime_tools() -> Vec<Arc<dyn Tool>> {
    vec![Arc::new(CurrentDateTimeTool), Arc::new(TimestampTool)]
}

/// Broken-down local time in one zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateTimeReport {
    pub datetime: String,
    pub date: String,
    pub time: String,
    pub timezone: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// 0 is Monday.
    pub weekday: u32,
    pub weekday_name: String,
}

impl DateTimeReport {
    pub fn new(now: DateTime<Tz>) -> Self {
        Self {
            datetime: now.to_rfc3339_opts(SecondsFormat::Secs, false),
            date: now.format("%Y-%m-%d").to_string(),
            time: now.format("%H:%M:%S").to_string(),
            timezone: now.timezone().name().to_string(),
            year: now.year(),
            month: now.month(),
            day: now.day(),
            hour: now.hour(),
            minute: now.minute(),
            second: now.second(),
            weekday: now.weekday().num_days_from_monday(),
            weekday_name: now.format("%A").to_string(),
        }
    }
}

/// Unix time in seconds and milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimestampReport {
    pub timestamp: i64,
    pub timestamp_ms: i64,
    pub iso_utc: String,
}

impl TimestampReport {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            timestamp: now.timestamp(),
            timestamp_ms: now.timestamp_millis(),
            iso_utc: now.to_rfc3339_opts(SecondsFormat::Millis, false),
        }
    }
}

/// Parse an IANA zone name, falling back to [`DEFAULT_TIMEZONE`].
pub fn parse_timezone(name: Option<&str>) -> Tz {
    let Some(name) = name else {
        return DEFAULT_TIMEZONE;
    };
    name.parse::<Tz>().unwrap_or_else(|_| {
        tracing::debug!(timezone = name, "Unknown timezone, using default");
        DEFAULT_TIMEZONE
    })
}

/// Local date and time in a named zone
pub struct CurrentDateTimeTool;

#[derive(Debug, Default, Deserialize)]
struct DateTimeArgs {
    timezone: Option<String>,
}

#[async_trait::async_trait]
impl Tool for CurrentDateTimeTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_current_datetime".to_string(),
            description: "Current date and time in a timezone (default Asia/Seoul)".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "timezone": json_schema_string("IANA zone, e.g. UTC or America/New_York")
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: DateTimeArgs = if arguments.is_null() {
            DateTimeArgs::default()
        } else {
            serde_json::from_value(arguments)
                .context("Invalid arguments for get_current_datetime")?
        };

        let tz = parse_timezone(args.timezone.as_deref());
        let report = DateTimeReport::new(Utc::now().with_timezone(&tz));
        Ok(CallToolResult::text(serde_json::to_string_pretty(&report)?))
    }
}

/// Current Unix timestamp
pub struct TimestampTool;

#[async_trait::async_trait]
impl Tool for TimestampTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_timestamp".to_string(),
            description: "Current Unix timestamp in seconds and milliseconds".to_string(),
            input_schema: json_schema_object(serde_json::json!({}), vec![]),
        }
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<CallToolResult> {
        let report = TimestampReport::new(Utc::now());
        Ok(CallToolResult::text(serde_json::to_string_pretty(&report)?))
    }
}
