use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::collections::BTreeMap;

const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// A single field of a case record
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Rows(Vec<Record>),
}

/// The plain data a report is built from: named fields holding text, numbers,
/// dates (as text) or lists of sub-records. No schema is enforced; callers
/// pick out what their sections need.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, Value>);

impl Record {
    pub fn new() -> Record {
        Record::default()
    }

    pub fn from_json(json: &str) -> Result<Record, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn insert<K: Into<String>>(&mut self, key: K, value: Value) -> &mut Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// A field as display text. Missing fields, nulls and lists are [None],
    /// which cells draw as the placeholder dash.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::Text(text) => Some(text.clone()),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Rows(_) => None,
        }
    }

    /// A field holding a list of sub-records; empty when missing
    pub fn rows(&self, key: &str) -> &[Record] {
        match self.get(key) {
            Some(Value::Rows(rows)) => rows,
            _ => &[],
        }
    }

    /// A date field as `dd/mm/yyyy`
    pub fn date_short(&self, key: &str) -> String {
        format_date_short(self.text(key).as_deref())
    }

    /// A date field spelled out, e.g. `5 Januari 2024`
    pub fn date_long(&self, key: &str) -> String {
        format_date_long(self.text(key).as_deref())
    }
}

/// Outcome of reading a date field
enum ParsedDate<'a> {
    Missing,
    Date(NaiveDate),
    Unparsed(&'a str),
}

fn parse_date(raw: Option<&str>) -> ParsedDate<'_> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return ParsedDate::Missing;
    };
    if raw.starts_with("0000-00-00") {
        return ParsedDate::Missing;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return ParsedDate::Date(date);
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return ParsedDate::Date(datetime.date());
        }
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return ParsedDate::Date(datetime.date_naive());
    }
    ParsedDate::Unparsed(raw)
}

/// Format a stored date as `dd/mm/yyyy`. Missing and zero dates become `-`;
/// text that isn't a date is returned unchanged.
pub fn format_date_short(raw: Option<&str>) -> String {
    match parse_date(raw) {
        ParsedDate::Missing => "-".to_string(),
        ParsedDate::Date(date) => date.format("%d/%m/%Y").to_string(),
        ParsedDate::Unparsed(raw) => raw.to_string(),
    }
}

/// Format a stored date with the Indonesian month name, e.g. `5 Januari 2024`.
/// Missing and zero dates become `-`; text that isn't a date is returned
/// unchanged.
pub fn format_date_long(raw: Option<&str>) -> String {
    match parse_date(raw) {
        ParsedDate::Missing => "-".to_string(),
        ParsedDate::Date(date) => format!(
            "{} {} {}",
            date.day(),
            MONTHS[date.month0() as usize],
            date.year()
        ),
        ParsedDate::Unparsed(raw) => raw.to_string(),
    }
}
