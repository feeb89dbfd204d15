use tracing::debug;

use crate::dom::{trim_text, Dom, Selector};
use crate::PageConfig;

/// Submit gate for the parameter search form: block empty queries.
///
/// A page without the form, or a form without the query field, is allowed
/// through.
pub fn validate_search_form<D: Dom>(dom: &D, config: &PageConfig) -> bool {
    let Some(form) = dom.element_by_id(&config.search_form_id) else {
        return true;
    };
    let Some(field) = dom.query(
        &form,
        Selector::TagAttrEquals("input", "name", &config.query_field),
    ) else {
        debug!("search form has no query field");
        return true;
    };
    let query = dom.input_value(&field).unwrap_or_default();
    !trim_text(&query).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemDocument;

    fn with_query(value: &str) -> MemDocument {
        let mut doc = MemDocument::new();
        let body = doc.body_id();
        let form = doc.el(body, "form#parameterSearchForm");
        let input = doc.el(form, "input");
        doc.set_attribute(&input, "name", "q");
        doc.set_value(input, value);
        doc
    }

    #[test]
    fn blank_queries_are_blocked() {
        let config = PageConfig::default();
        assert!(!validate_search_form(&with_query(""), &config));
        assert!(!validate_search_form(&with_query(" \t\n"), &config));
        assert!(!validate_search_form(&with_query("\u{FEFF} \u{3000}"), &config));
    }

    #[test]
    fn non_empty_query_passes() {
        assert!(validate_search_form(
            &with_query("  激光 "),
            &PageConfig::default()
        ));
    }

    #[test]
    fn absent_form_fails_open() {
        assert!(validate_search_form(&MemDocument::new(), &PageConfig::default()));
    }
}
