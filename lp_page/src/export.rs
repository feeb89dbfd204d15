//! CSV export of extracted parameters.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dom::Dom;
use crate::{PageConfig, PageError};

/// Header row of the exported file. Spreadsheet templates key on this exact
/// text and order.
pub const CSV_HEADER: [&str; 7] = [
    "参数名称",
    "数值",
    "单位",
    "类别",
    "论文标题",
    "论文ID",
    "可信度",
];

pub const DEFAULT_EXPORT_FILENAME: &str = "laser_parameters.csv";

const DATA_URI_PREFIX: &str = "data:text/csv;charset=utf-8,";

/// A record field as the page embeds it: text or a bare JSON number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Number(number) => write!(f, "{number}"),
        }
    }
}

impl FieldValue {
    /// Empty text and numeric zero; both export as an empty cell.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::Number(number) => number.as_f64() == Some(0.0),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterRecord {
    pub parameter_name: Option<FieldValue>,
    pub value: Option<FieldValue>,
    pub unit: Option<FieldValue>,
    pub category: Option<FieldValue>,
    pub paper_title: Option<FieldValue>,
    pub paper_id: Option<FieldValue>,
    pub confidence_score: Option<FieldValue>,
}

impl ParameterRecord {
    /// Cells in [`CSV_HEADER`] order; absent, `null` and blank fields are
    /// empty. The text `"0"` is kept.
    pub fn cells(&self) -> [String; 7] {
        let cell = |field: &Option<FieldValue>| {
            field
                .as_ref()
                .filter(|value| !value.is_blank())
                .map(ToString::to_string)
                .unwrap_or_default()
        };
        [
            cell(&self.parameter_name),
            cell(&self.value),
            cell(&self.unit),
            cell(&self.category),
            cell(&self.paper_title),
            cell(&self.paper_id),
            cell(&self.confidence_score),
        ]
    }
}

/// Render the CSV text: the bare header line, then one fully quoted line per
/// record.
pub fn build_csv(records: &[ParameterRecord]) -> Result<String, PageError> {
    if records.is_empty() {
        return Err(PageError::NoParameters);
    }

    let mut out = CSV_HEADER.join(",");
    out.push('\n');

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for record in records {
        writer.write_record(record.cells())?;
    }
    let body = writer
        .into_inner()
        .map_err(|err| PageError::Csv(err.to_string()))?;
    out.push_str(&String::from_utf8(body).map_err(|_| PageError::Encoding)?);
    Ok(out)
}

/// Percent-encode `input` the way ECMAScript `encodeURI` does.
pub fn encode_uri(input: &str) -> String {
    const KEEP: &[u8] = b"-_.!~*'();/?:@&=+$,#";
    let mut out = String::with_capacity(input.len());
    for &byte in input.as_bytes() {
        if byte.is_ascii_alphanumeric() || KEEP.contains(&byte) {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

/// A ready-to-click download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvDownload {
    pub filename: String,
    pub href: String,
}

pub fn prepare_export(
    records: Option<&[ParameterRecord]>,
    filename: Option<&str>,
    config: &PageConfig,
) -> Result<CsvDownload, PageError> {
    let csv = build_csv(records.unwrap_or_default())?;
    let filename = filename
        .filter(|name| !name.is_empty())
        .unwrap_or(&config.export_filename);
    Ok(CsvDownload {
        filename: filename.to_string(),
        href: format!("{DATA_URI_PREFIX}{}", encode_uri(&csv)),
    })
}

/// Click a transient anchor for `download`; the anchor is removed again
/// before returning. Returns `false` when the document has no body.
pub fn trigger_download<D: Dom>(dom: &mut D, download: &CsvDownload) -> bool {
    let Some(body) = dom.body() else {
        return false;
    };
    let Some(link) = dom.create_element("a") else {
        return false;
    };
    dom.set_attribute(&link, "href", &download.href);
    dom.set_attribute(&link, "download", &download.filename);
    dom.append_child(&body, &link);
    dom.click(&link);
    dom.remove_child(&body, &link);
    true
}

/// Export `records` as a CSV download.
///
/// With nothing to export the user is alerted and no element is created;
/// the returned error is [`PageError::NoParameters`].
pub fn export_parameters_to_csv<D: Dom>(
    dom: &mut D,
    records: Option<&[ParameterRecord]>,
    filename: Option<&str>,
    config: &PageConfig,
) -> Result<CsvDownload, PageError> {
    let download = match prepare_export(records, filename, config) {
        Ok(download) => download,
        Err(PageError::NoParameters) => {
            dom.alert(&PageError::NoParameters.to_string());
            return Err(PageError::NoParameters);
        }
        Err(err) => return Err(err),
    };
    if trigger_download(dom, &download) {
        info!(
            filename = %download.filename,
            rows = records.map_or(0, <[_]>::len),
            "parameters exported"
        );
    } else {
        debug!("no document body; export skipped");
    }
    Ok(download)
}
