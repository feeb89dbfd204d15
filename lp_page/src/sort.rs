//! Click-to-sort for `table.sortable`.
//!
//! A header's direction lives in its `asc`/`desc` class. Clicking a header
//! clears every header of the table, marks the clicked one and re-appends
//! the body rows in the new order.

use std::cmp::Ordering;

#[cfg(feature = "icu")]
use icu_collator::{Collator, CollatorOptions};
#[cfg(feature = "icu")]
use icu_locid::locale;
use tracing::{debug, warn};

use crate::dom::{trim_text, trim_text_start, Dom, Selector};
use crate::PageConfig;
#[cfg(feature = "icu")]
use crate::PageError;

/// Text ordering used for non-numeric columns.
pub trait Collation {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

/// Orders by Unicode scalar value. Reproducible across hosts; the native
/// default is `IcuCollation`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CodepointCollation;

impl Collation for CodepointCollation {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.cmp(b)
    }
}

/// CLDR collation with compiled-in data. [`IcuCollation::zh`] orders Han
/// text by pinyin, as `localeCompare(_, "zh-CN")` does in the browser.
#[cfg(feature = "icu")]
pub struct IcuCollation {
    collator: Collator,
}

#[cfg(feature = "icu")]
impl IcuCollation {
    pub fn zh() -> Result<Self, PageError> {
        let collator = Collator::try_new(&locale!("zh").into(), CollatorOptions::new())
            .map_err(|err| PageError::Collation(err.to_string()))?;
        Ok(Self { collator })
    }
}

#[cfg(feature = "icu")]
impl Collation for IcuCollation {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self.collator.compare(a, b)
    }
}

impl<F> Collation for F
where
    F: Fn(&str, &str) -> Ordering,
{
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self(a, b)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn class(self, config: &PageConfig) -> &str {
        match self {
            SortDirection::Ascending => &config.asc_class,
            SortDirection::Descending => &config.desc_class,
        }
    }

    pub fn read<D: Dom>(dom: &D, header: &D::Node, config: &PageConfig) -> Option<Self> {
        if dom.has_class(header, &config.asc_class) {
            Some(SortDirection::Ascending)
        } else if dom.has_class(header, &config.desc_class) {
            Some(SortDirection::Descending)
        } else {
            None
        }
    }

    /// Direction a header takes when clicked while in `prior`.
    pub fn after_click(prior: Option<Self>) -> Self {
        match prior {
            Some(SortDirection::Ascending) => SortDirection::Descending,
            Some(SortDirection::Descending) | None => SortDirection::Ascending,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
}

impl ColumnKind {
    pub fn read<D: Dom>(dom: &D, header: &D::Node, config: &PageConfig) -> Self {
        if dom.has_class(header, &config.numeric_class) {
            ColumnKind::Numeric
        } else {
            ColumnKind::Text
        }
    }
}

/// Longest numeric prefix of `input`, following ECMAScript `parseFloat`:
/// leading whitespace (and a byte-order mark) is skipped and trailing garbage
/// ignored.
pub fn parse_float_prefix(input: &str) -> Option<f64> {
    let s = trim_text_start(input);
    let bytes = s.as_bytes();
    let digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return Some(if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = digits(end);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits(end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = digits(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }
    s[..end].parse::<f64>().ok()
}

/// Sort key of a numeric cell; unparsable text counts as zero.
pub fn numeric_key(text: &str) -> f64 {
    parse_float_prefix(text)
        .filter(|v| !v.is_nan())
        .unwrap_or(0.0)
}

/// Row comparator. `was_ascending` is the clicked header's state *before*
/// the click: when set, the order is reversed.
pub fn compare_keys<C: Collation + ?Sized>(
    kind: ColumnKind,
    was_ascending: bool,
    a: &str,
    b: &str,
    collation: &C,
) -> Ordering {
    let ord = match kind {
        ColumnKind::Numeric => numeric_key(a)
            .partial_cmp(&numeric_key(b))
            .unwrap_or(Ordering::Equal),
        ColumnKind::Text => collation.compare(a, b),
    };
    if was_ascending {
        ord.reverse()
    } else {
        ord
    }
}

/// A clickable header: its table and its index among the table's `th`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortableHeader<N> {
    pub table: N,
    pub header: N,
    pub column: usize,
}

/// Find the clickable headers of every sortable table and give them a
/// pointer cursor and a hint title.
pub fn prepare_sortable_headers<D: Dom>(
    dom: &mut D,
    scope: &D::Node,
    config: &PageConfig,
) -> Vec<SortableHeader<D::Node>> {
    let mut out = Vec::new();
    for table in dom.query_all(scope, Selector::TagClass("table", &config.sortable_class)) {
        for (column, header) in dom.query_all(&table, Selector::Tag("th")).into_iter().enumerate() {
            if dom.has_class(&header, &config.no_sort_class) {
                continue;
            }
            dom.set_style(&header, "cursor", "pointer");
            dom.set_attribute(&header, "title", &config.sort_title);
            out.push(SortableHeader {
                table: table.clone(),
                header,
                column,
            });
        }
    }
    debug!(headers = out.len(), "sortable headers prepared");
    out
}

/// Handle a click on header `column` of `table`.
///
/// Returns the direction the header now carries, or `None` when the table
/// has no such header or no `tbody`; header classes are then left alone.
pub fn sort_table<D, C>(
    dom: &mut D,
    table: &D::Node,
    column: usize,
    config: &PageConfig,
    collation: &C,
) -> Option<SortDirection>
where
    D: Dom,
    C: Collation + ?Sized,
{
    let headers = dom.query_all(table, Selector::Tag("th"));
    let header = headers.get(column)?.clone();
    let kind = ColumnKind::read(dom, &header, config);
    let prior = SortDirection::read(dom, &header, config);
    let Some(tbody) = dom.query(table, Selector::Tag("tbody")) else {
        warn!(column, "sortable table has no tbody");
        return None;
    };

    for h in &headers {
        dom.remove_class(h, &config.asc_class);
        dom.remove_class(h, &config.desc_class);
    }
    let next = SortDirection::after_click(prior);
    dom.add_class(&header, next.class(config));

    let mut rows: Vec<(String, D::Node)> = dom
        .query_all(&tbody, Selector::Tag("tr"))
        .into_iter()
        .map(|row| {
            let key = dom
                .query_all(&row, Selector::Tag("td"))
                .get(column)
                .map(|cell| trim_text(&dom.text_content(cell)).to_string())
                .unwrap_or_default();
            (key, row)
        })
        .collect();

    let was_ascending = prior == Some(SortDirection::Ascending);
    rows.sort_by(|(a, _), (b, _)| compare_keys(kind, was_ascending, a, b, collation));

    for (_, row) in &rows {
        dom.append_child(&tbody, row);
    }
    debug!(column, ?kind, direction = ?next, rows = rows.len(), "table sorted");
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemDocument, NodeId};

    struct Table {
        doc: MemDocument,
        table: NodeId,
        headers: Vec<NodeId>,
        tbody: NodeId,
    }

    /// Header specs look like `th.numeric`; each row holds one cell per header.
    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        let mut doc = MemDocument::new();
        let body = doc.body_id();
        let table = doc.el(body, "table.sortable");
        let thead = doc.el(table, "thead");
        let head_row = doc.el(thead, "tr");
        let headers = headers.iter().map(|spec| doc.el(head_row, spec)).collect();
        let tbody = doc.el(table, "tbody");
        for cells in rows {
            let row = doc.el(tbody, "tr");
            for text in *cells {
                let cell = doc.el(row, "td");
                doc.set_text(cell, &format!("  {text} "));
            }
        }
        Table {
            doc,
            table,
            headers,
            tbody,
        }
    }

    fn column(t: &Table, index: usize) -> Vec<String> {
        t.doc
            .children(t.tbody)
            .iter()
            .map(|row| t.doc.text_content(&t.doc.children(*row)[index]).trim().to_string())
            .collect()
    }

    fn click(t: &mut Table, index: usize) -> Option<SortDirection> {
        sort_table(
            &mut t.doc,
            &t.table,
            index,
            &PageConfig::default(),
            &CodepointCollation,
        )
    }

    #[test]
    fn numeric_column_alternates_on_repeated_clicks() {
        let mut t = table(&["th", "th.numeric"], &[&["a", "10"], &["b", "2"], &["c", "33"]]);

        assert_eq!(click(&mut t, 1), Some(SortDirection::Ascending));
        assert_eq!(column(&t, 1), ["2", "10", "33"]);
        assert!(t.doc.has_class(&t.headers[1], "asc"));

        assert_eq!(click(&mut t, 1), Some(SortDirection::Descending));
        assert_eq!(column(&t, 1), ["33", "10", "2"]);
        assert!(t.doc.has_class(&t.headers[1], "desc"));
        assert!(!t.doc.has_class(&t.headers[1], "asc"));

        assert_eq!(click(&mut t, 1), Some(SortDirection::Ascending));
        assert_eq!(column(&t, 1), ["2", "10", "33"]);
    }

    #[test]
    fn unparsable_numbers_sort_as_zero() {
        let mut t = table(&["th.numeric"], &[&["n/a"], &["5 W"], &["-1.5e1"]]);
        click(&mut t, 0);
        assert_eq!(column(&t, 0), ["-1.5e1", "n/a", "5 W"]);
    }

    #[test]
    fn text_column_uses_injected_collation() {
        let pinyin_rank = |s: &str| match s {
            "丙" => 0,
            "甲" => 1,
            "乙" => 2,
            _ => 3,
        };
        let zh = move |a: &str, b: &str| pinyin_rank(a).cmp(&pinyin_rank(b));

        let mut t = table(&["th"], &[&["乙"], &["甲"], &["丙"]]);
        sort_table(&mut t.doc, &t.table, 0, &PageConfig::default(), &zh);
        assert_eq!(column(&t, 0), ["丙", "甲", "乙"]);

        sort_table(&mut t.doc, &t.table, 0, &PageConfig::default(), &zh);
        assert_eq!(column(&t, 0), ["乙", "甲", "丙"]);
    }

    #[cfg(feature = "icu")]
    #[test]
    fn icu_zh_collation_orders_by_pinyin() {
        let zh = IcuCollation::zh().unwrap();
        let mut t = table(&["th"], &[&["乙"], &["甲"], &["丙"]]);
        sort_table(&mut t.doc, &t.table, 0, &PageConfig::default(), &zh);
        assert_eq!(column(&t, 0), ["丙", "甲", "乙"]);
    }

    #[test]
    fn byte_order_mark_is_trimmed_from_keys() {
        let mut t = table(&["th.numeric"], &[&["3"], &["\u{FEFF}5"], &["1"]]);
        click(&mut t, 0);
        assert_eq!(column(&t, 0), ["1", "3", "\u{FEFF}5"]);

        let mut t = table(&["th"], &[&["\u{FEFF}b"], &["a"], &["c"]]);
        click(&mut t, 0);
        assert_eq!(column(&t, 0), ["a", "\u{FEFF}b", "c"]);
    }

    #[test]
    fn table_without_tbody_keeps_header_classes() {
        let mut doc = MemDocument::new();
        let body = doc.body_id();
        let table = doc.el(body, "table.sortable");
        let thead = doc.el(table, "thead");
        let head_row = doc.el(thead, "tr");
        let first = doc.el(head_row, "th.desc");
        let second = doc.el(head_row, "th.numeric");

        let outcome = sort_table(
            &mut doc,
            &table,
            1,
            &PageConfig::default(),
            &CodepointCollation,
        );

        assert_eq!(outcome, None);
        assert!(doc.has_class(&first, "desc"));
        assert!(!doc.has_class(&second, "asc"));
        assert!(!doc.has_class(&second, "desc"));
    }

    #[test]
    fn codepoint_collation_is_reproducible() {
        let mut first = table(&["th"], &[&["乙"], &["甲"], &["丙"]]);
        let mut second = table(&["th"], &[&["丙"], &["乙"], &["甲"]]);
        click(&mut first, 0);
        click(&mut second, 0);
        assert_eq!(column(&first, 0), ["丙", "乙", "甲"]);
        assert_eq!(column(&first, 0), column(&second, 0));
    }

    #[test]
    fn only_clicked_header_keeps_direction() {
        let mut t = table(
            &["th", "th.numeric"],
            &[&["x", "1"], &["y", "2"]],
        );
        click(&mut t, 0);
        click(&mut t, 0);
        assert!(t.doc.has_class(&t.headers[0], "desc"));

        assert_eq!(click(&mut t, 1), Some(SortDirection::Ascending));
        assert!(!t.doc.has_class(&t.headers[0], "asc"));
        assert!(!t.doc.has_class(&t.headers[0], "desc"));
        assert!(t.doc.has_class(&t.headers[1], "asc"));
    }

    #[test]
    fn no_sort_headers_are_skipped_but_keep_their_index() {
        let mut t = table(&["th.no-sort", "th.numeric"], &[&["x", "1"]]);
        let config = PageConfig::default();
        let root = t.doc.root();
        let headers = prepare_sortable_headers(&mut t.doc, &root, &config);

        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].column, 1);
        assert_eq!(headers[0].header, t.headers[1]);
        assert_eq!(t.doc.style(t.headers[1], "cursor"), Some("pointer"));
        assert_eq!(
            t.doc.attribute(&t.headers[1], "title").as_deref(),
            Some("点击排序")
        );
        assert_eq!(t.doc.style(t.headers[0], "cursor"), None);
    }

    #[test]
    fn missing_header_is_ignored() {
        let mut t = table(&["th"], &[&["x"]]);
        assert_eq!(click(&mut t, 4), None);
    }

    #[test]
    fn parse_float_prefix_matches_parse_float() {
        assert_eq!(parse_float_prefix("73"), Some(73.0));
        assert_eq!(parse_float_prefix("  12.5 nm"), Some(12.5));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("5."), Some(5.0));
        assert_eq!(parse_float_prefix("-2e3x"), Some(-2000.0));
        assert_eq!(parse_float_prefix("1e"), Some(1.0));
        assert_eq!(parse_float_prefix("+Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_float_prefix("-."), None);
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("\u{FEFF} 7"), Some(7.0));
        assert_eq!(numeric_key("NaN"), 0.0);
    }
}
