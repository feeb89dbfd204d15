//! Behaviours for the laser-parameter pages implemented in Rust.
//!
//! Every behaviour is written against the [`Dom`] trait so the same code runs
//! in the browser (through `lp_page_web`) and against [`MemDocument`] in
//! tests and the CLI.

use thiserror::Error;

pub mod config;
pub mod dom;
pub mod export;
pub mod form;
pub mod memdom;
pub mod page;
pub mod progress;
pub mod sort;
pub mod toggle;
pub mod tooltip;

pub use config::{PageConfig, ToggleConfig};
pub use dom::{trim_text, Dom, Selector};
pub use export::{
    build_csv, encode_uri, export_parameters_to_csv, prepare_export, trigger_download, CsvDownload,
    FieldValue, ParameterRecord, CSV_HEADER, DEFAULT_EXPORT_FILENAME,
};
pub use form::validate_search_form;
pub use memdom::{Download, MemDocument, NodeId};
pub use page::{dispatch, init_page, Action, Binding, ClickOutcome, PageSetup};
pub use progress::init_progress_bars;
pub use sort::{
    compare_keys, numeric_key, parse_float_prefix, prepare_sortable_headers, sort_table,
    CodepointCollation, Collation, ColumnKind, SortDirection, SortableHeader,
};
#[cfg(feature = "icu")]
pub use sort::IcuCollation;
pub use toggle::{flip_panel, toggle_triggers, PanelState, ToggleFamily};
pub use tooltip::{init_tooltips, NoTooltips, TooltipToolkit};

#[derive(Error, Debug)]
pub enum PageError {
    #[error("没有可导出的参数")]
    NoParameters,
    #[error("failed to write CSV: {0}")]
    Csv(String),
    #[error("CSV output is not valid UTF-8")]
    Encoding,
    #[error("invalid page configuration: {0}")]
    Config(String),
    #[error("collator unavailable: {0}")]
    Collation(String),
}

impl From<csv::Error> for PageError {
    fn from(err: csv::Error) -> Self {
        PageError::Csv(err.to_string())
    }
}
