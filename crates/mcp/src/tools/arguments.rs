// Argument validation: raw JSON arguments in, one typed shape per tool out

use crate::error::ValidationError;
use crate::tools::ToolName;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde_json::{Map, Value};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const MAX_PAGE_SIZE: u32 = 1000;
/// Queries longer than this are accepted but logged.
pub const ADVISORY_QUERY_WORDS: usize = 400;

/// Validated arguments, one variant per tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolArguments {
    RetrieveSemanticallySimilar(RetrieveSimilarArgs),
    SmartSearch(SmartSearchArgs),
    ListKnowledgeSystems,
    AccountInformation,
    ListDocuments(ListDocumentsArgs),
    RememberThis(RememberThisArgs),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetrieveSimilarArgs {
    pub match_this: String,
    pub n_results: Option<u32>,
    pub window: DateWindow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmartSearchArgs {
    pub query: String,
    pub user_context: Option<String>,
    pub n_results: Option<u32>,
    pub window: DateWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListDocumentsArgs {
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RememberThisArgs {
    pub name: String,
    pub content: String,
}

/// Optional search window. `from <= to` whenever both are set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateWindow {
    pub from: Option<DateTime<FixedOffset>>,
    pub to: Option<DateTime<FixedOffset>>,
}

impl DateWindow {
    pub const FROM_FIELD: &'static str = "from_datetime_ISO8601";
    pub const TO_FIELD: &'static str = "to_datetime_ISO8601";

    fn parse(args: &Map<String, Value>) -> Result<Self, ValidationError> {
        let from = optional_datetime(args, Self::FROM_FIELD)?;
        let to = optional_datetime(args, Self::TO_FIELD)?;
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(ValidationError::new(
                    Self::FROM_FIELD,
                    format!("must not be later than {} ({})", Self::TO_FIELD, format_datetime(&to)),
                ));
            }
        }
        Ok(Self { from, to })
    }

    pub fn from_param(&self) -> Option<String> {
        self.from.as_ref().map(format_datetime)
    }

    pub fn to_param(&self) -> Option<String> {
        self.to.as_ref().map(format_datetime)
    }
}

fn format_datetime(value: &DateTime<FixedOffset>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl ToolArguments {
    /// Validate raw arguments for `tool`. Purely local and deterministic.
    pub fn validate(tool: ToolName, arguments: &Value) -> Result<Self, ValidationError> {
        let empty = Map::new();
        let args = match arguments {
            Value::Object(map) => map,
            Value::Null => &empty,
            _ => return Err(ValidationError::new("arguments", "must be a JSON object")),
        };

        let validated = match tool {
            ToolName::RetrieveSemanticallySimilar => {
                let match_this = required_string(args, "match_this")?;
                warn_if_long("match_this", &match_this);
                Self::RetrieveSemanticallySimilar(RetrieveSimilarArgs {
                    match_this,
                    n_results: optional_n_results(args)?,
                    window: DateWindow::parse(args)?,
                })
            }
            ToolName::SmartSearch => {
                let query = required_string(args, "query")?;
                warn_if_long("query", &query);
                Self::SmartSearch(SmartSearchArgs {
                    query,
                    user_context: optional_string(args, "user_context")?,
                    n_results: optional_n_results(args)?,
                    window: DateWindow::parse(args)?,
                })
            }
            ToolName::ListKnowledgeSystems => Self::ListKnowledgeSystems,
            ToolName::AccountInformation => Self::AccountInformation,
            ToolName::ListDocuments => Self::ListDocuments(ListDocumentsArgs {
                page: optional_integer(args, "page", 1, u32::MAX)?.unwrap_or(DEFAULT_PAGE),
                page_size: optional_integer(args, "page_size", 1, MAX_PAGE_SIZE)?
                    .unwrap_or(DEFAULT_PAGE_SIZE),
            }),
            ToolName::RememberThis => Self::RememberThis(RememberThisArgs {
                name: required_string(args, "name")?,
                content: required_string(args, "content")?,
            }),
        };
        Ok(validated)
    }
}

fn warn_if_long(field: &str, text: &str) {
    let words = text.split_whitespace().count();
    if words > ADVISORY_QUERY_WORDS {
        tracing::warn!(field, words, "Query exceeds the advised {} words", ADVISORY_QUERY_WORDS);
    }
}

/// `null` counts as absent.
fn present<'a>(args: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    args.get(field).filter(|value| !value.is_null())
}

fn required_string(args: &Map<String, Value>, field: &str) -> Result<String, ValidationError> {
    optional_string(args, field)?.ok_or_else(|| ValidationError::new(field, "is required"))
}

fn optional_string(
    args: &Map<String, Value>,
    field: &str,
) -> Result<Option<String>, ValidationError> {
    match present(args, field) {
        None => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(ValidationError::new(field, "must not be empty"))
        }
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::new(field, "must be a string")),
    }
}

fn optional_n_results(args: &Map<String, Value>) -> Result<Option<u32>, ValidationError> {
    optional_integer(args, "n_results", 1, u32::MAX)
}

/// Accepts JSON integers, integral floats and numeric strings.
fn optional_integer(
    args: &Map<String, Value>,
    field: &str,
    min: u32,
    max: u32,
) -> Result<Option<u32>, ValidationError> {
    let Some(value) = present(args, field) else {
        return Ok(None);
    };

    let number = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| ValidationError::new(field, "must be an integer"))?;

    if number < i64::from(min) {
        return Err(ValidationError::new(field, format!("must be at least {}", min)));
    }
    if number > i64::from(max) {
        return Err(ValidationError::new(field, format!("must be at most {}", max)));
    }
    // Bounds are checked against u32 limits above.
    Ok(Some(number as u32))
}

fn optional_datetime(
    args: &Map<String, Value>,
    field: &str,
) -> Result<Option<DateTime<FixedOffset>>, ValidationError> {
    match optional_string(args, field)? {
        None => Ok(None),
        Some(raw) => DateTime::parse_from_rfc3339(raw.trim()).map(Some).map_err(|_| {
            ValidationError::new(
                field,
                "must be an ISO 8601 date-time with a timezone, e.g. 2024-01-01T00:00:00Z",
            )
        }),
    }
}
