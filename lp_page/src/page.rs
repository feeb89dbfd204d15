//! One-shot page setup and click dispatch.
//!
//! [`init_page`] runs the setup passes and returns the click bindings the
//! host must attach; the host calls [`dispatch`] when a bound element is
//! clicked.

use tracing::info;

use crate::dom::Dom;
use crate::progress::init_progress_bars;
use crate::sort::{prepare_sortable_headers, sort_table, Collation, SortDirection};
use crate::toggle::{flip_panel, toggle_triggers, PanelState, ToggleFamily};
use crate::tooltip::{init_tooltips, TooltipToolkit};
use crate::PageConfig;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action<N> {
    Toggle(ToggleFamily),
    Sort { table: N, column: usize },
}

/// Click on `element` performs `action`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding<N> {
    pub element: N,
    pub action: Action<N>,
}

#[derive(Clone, Debug)]
pub struct PageSetup<N> {
    pub progress_bars: usize,
    pub tooltips: usize,
    pub bindings: Vec<Binding<N>>,
}

/// Result of a dispatched click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Panel(Option<PanelState>),
    Sorted(Option<SortDirection>),
}

pub fn init_page<D, T>(dom: &mut D, config: &PageConfig, tooltips: &mut T) -> PageSetup<D::Node>
where
    D: Dom,
    T: TooltipToolkit<D::Node> + ?Sized,
{
    let root = dom.root();
    let progress_bars = init_progress_bars(dom, &root, config);
    let tooltip_count = init_tooltips(dom, &root, config, tooltips);

    let mut bindings: Vec<Binding<D::Node>> = toggle_triggers(dom, &root, config)
        .into_iter()
        .map(|(element, family)| Binding {
            element,
            action: Action::Toggle(family),
        })
        .collect();
    bindings.extend(
        prepare_sortable_headers(dom, &root, config)
            .into_iter()
            .map(|h| Binding {
                element: h.header,
                action: Action::Sort {
                    table: h.table,
                    column: h.column,
                },
            }),
    );

    info!(
        progress_bars,
        tooltips = tooltip_count,
        bindings = bindings.len(),
        "page behaviours initialised"
    );
    PageSetup {
        progress_bars,
        tooltips: tooltip_count,
        bindings,
    }
}

pub fn dispatch<D, C>(
    dom: &mut D,
    binding: &Binding<D::Node>,
    config: &PageConfig,
    collation: &C,
) -> ClickOutcome
where
    D: Dom,
    C: Collation + ?Sized,
{
    match &binding.action {
        Action::Toggle(family) => {
            ClickOutcome::Panel(flip_panel(dom, &binding.element, *family, config))
        }
        Action::Sort { table, column } => {
            ClickOutcome::Sorted(sort_table(dom, table, *column, config, collation))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CodepointCollation, MemDocument, NodeId, NoTooltips};

    struct Page {
        doc: MemDocument,
        bar: NodeId,
        toggle: NodeId,
        panel: NodeId,
        header: NodeId,
        tbody: NodeId,
    }

    fn page() -> Page {
        let mut doc = MemDocument::new();
        let body = doc.body_id();

        let bar = doc.el(body, "div.progress-bar");
        doc.set_attribute(&bar, "data-width", "40");
        let tip = doc.el(body, "span");
        doc.set_attribute(&tip, "data-bs-toggle", "tooltip");

        let toggle = doc.el(body, "div.parameter-category-toggle");
        doc.set_attribute(&toggle, "data-target", "cat-optics");
        doc.el(toggle, "i.bi.bi-chevron-down");
        let panel = doc.el(body, "div#cat-optics.collapse");

        let table = doc.el(body, "table.sortable");
        let head = doc.el(table, "thead");
        let head_row = doc.el(head, "tr");
        doc.el(head_row, "th.no-sort");
        let header = doc.el(head_row, "th.numeric");
        let tbody = doc.el(table, "tbody");
        for (name, value) in [("a", "3"), ("b", "1"), ("c", "2")] {
            let row = doc.el(tbody, "tr");
            let cell = doc.el(row, "td");
            doc.set_text(cell, name);
            let cell = doc.el(row, "td");
            doc.set_text(cell, value);
        }

        Page {
            doc,
            bar,
            toggle,
            panel,
            header,
            tbody,
        }
    }

    #[test]
    fn setup_runs_every_pass_and_binds_clicks() {
        let mut p = page();
        let config = PageConfig::default();
        let setup = init_page(&mut p.doc, &config, &mut NoTooltips);

        assert_eq!(setup.progress_bars, 1);
        assert_eq!(setup.tooltips, 0);
        assert_eq!(p.doc.style(p.bar, "width"), Some("40%"));
        assert_eq!(
            setup.bindings[0],
            Binding {
                element: p.toggle,
                action: Action::Toggle(ToggleFamily::Category),
            }
        );
        assert_eq!(setup.bindings.len(), 2);
        assert_eq!(setup.bindings[1].element, p.header);
    }

    #[test]
    fn dispatch_routes_clicks() {
        let mut p = page();
        let config = PageConfig::default();
        let setup = init_page(&mut p.doc, &config, &mut NoTooltips);

        let outcome = dispatch(&mut p.doc, &setup.bindings[0], &config, &CodepointCollation);
        assert_eq!(outcome, ClickOutcome::Panel(Some(PanelState::Expanded)));
        assert!(p.doc.has_class(&p.panel, "show"));

        let outcome = dispatch(&mut p.doc, &setup.bindings[1], &config, &CodepointCollation);
        assert_eq!(outcome, ClickOutcome::Sorted(Some(SortDirection::Ascending)));
        let names: Vec<String> = p
            .doc
            .children(p.tbody)
            .iter()
            .map(|row| p.doc.text_content(row))
            .collect();
        assert_eq!(names, ["b1", "c2", "a3"]);
    }
}
