//! Offline counterparts of the page's export and sort behaviours.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use lp_page::{
    build_csv, encode_uri, sort_table, Dom, IcuCollation, MemDocument, PageConfig,
    ParameterRecord, SortDirection,
};
use tracing::{debug, info};

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

pub fn load_config(path: Option<&Path>) -> Result<PageConfig> {
    let Some(path) = path else {
        return Ok(PageConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = PageConfig::from_json(&text)
        .with_context(|| format!("invalid config {}", path.display()))?;
    debug!(path = %path.display(), "loaded page config");
    Ok(config)
}

fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    if is_stdio(path) {
        return Ok(Box::new(io::stdin()));
    }
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(Box::new(file))
}

/// Write `text` to `path`, or stdout for `-`.
pub fn write_output(path: &Path, text: &str) -> Result<()> {
    if is_stdio(path) {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(text.as_bytes())?;
        handle.flush()?;
        return Ok(());
    }
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

/// Parameter records from a JSON array, the shape the pages embed.
pub fn read_records(path: &Path) -> Result<Vec<ParameterRecord>> {
    let reader = open_input(path)?;
    let records: Vec<ParameterRecord> = serde_json::from_reader(reader)
        .with_context(|| format!("failed to parse parameter records from {}", path.display()))?;
    debug!(count = records.len(), "read parameter records");
    Ok(records)
}

/// The exported CSV, or its `data:` URI when `as_data_uri` is set.
pub fn render_export(records: &[ParameterRecord], as_data_uri: bool) -> Result<String> {
    let csv = build_csv(records)?;
    if as_data_uri {
        Ok(format!("data:text/csv;charset=utf-8,{}", encode_uri(&csv)))
    } else {
        Ok(csv)
    }
}

#[derive(Debug)]
pub struct SortOutcome {
    pub csv: String,
    pub direction: Option<SortDirection>,
}

fn resolve_column(headers: &csv::StringRecord, column: &str) -> Result<usize> {
    if let Some(index) = headers.iter().position(|h| h == column) {
        return Ok(index);
    }
    match column.parse::<usize>() {
        Ok(index) if index < headers.len() => Ok(index),
        Ok(index) => bail!("column index {index} out of range ({} columns)", headers.len()),
        Err(_) => Err(anyhow!("no column named {column:?}")),
    }
}

/// Load a CSV table into a sortable in-memory table, click the header of
/// `column` `clicks` times and return the rows in their final order. Text
/// columns are ordered by zh collation, as on the page.
pub fn sort_csv_table<R: Read>(
    reader: R,
    column: &str,
    numeric: bool,
    clicks: usize,
    config: &PageConfig,
) -> Result<SortOutcome> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let index = resolve_column(&headers, column)?;

    let mut doc = MemDocument::new();
    let body = doc.body_id();
    let table = doc.el(body, "table");
    doc.add_class(&table, &config.sortable_class);
    let thead = doc.el(table, "thead");
    let head_row = doc.el(thead, "tr");
    for (i, name) in headers.iter().enumerate() {
        let th = doc.el(head_row, "th");
        doc.set_text(th, name);
        if numeric && i == index {
            doc.add_class(&th, &config.numeric_class);
        }
    }
    let tbody = doc.el(table, "tbody");
    let mut rows = 0usize;
    for record in csv_reader.records() {
        let record = record?;
        let tr = doc.el(tbody, "tr");
        for field in record.iter() {
            let td = doc.el(tr, "td");
            doc.set_text(td, field);
        }
        rows += 1;
    }

    let collation = IcuCollation::zh()?;
    let mut direction = None;
    for _ in 0..clicks {
        direction = sort_table(&mut doc, &table, index, config, &collation);
    }
    info!(rows, column = %headers.get(index).unwrap_or_default(), clicks, ?direction, "table sorted");

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&headers)?;
    for tr in doc.children(tbody).to_vec() {
        let cells: Vec<String> = doc
            .children(tr)
            .iter()
            .map(|td| doc.text_content(td))
            .collect();
        writer.write_record(&cells)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow!("failed to flush CSV: {err}"))?;
    Ok(SortOutcome {
        csv: String::from_utf8(bytes).context("sorted CSV is not valid UTF-8")?,
        direction,
    })
}

pub fn sort_csv_file(
    path: &Path,
    column: &str,
    numeric: bool,
    clicks: usize,
    config: &PageConfig,
) -> Result<SortOutcome> {
    let reader = open_input(path)?;
    sort_csv_table(reader, column, numeric, clicks, config)
}
