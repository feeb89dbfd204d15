use tracing::debug;

use crate::dom::{Dom, Selector};
use crate::PageConfig;

/// A UI toolkit able to decorate an element with a tooltip.
pub trait TooltipToolkit<N> {
    /// Whether a toolkit is actually loaded. When not, nothing is attached.
    fn is_available(&self) -> bool {
        true
    }

    fn attach(&mut self, element: &N);
}

/// Used when no toolkit is loaded on the page.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTooltips;

impl<N> TooltipToolkit<N> for NoTooltips {
    fn is_available(&self) -> bool {
        false
    }

    fn attach(&mut self, _element: &N) {}
}

/// Hand every tooltip-flagged element to `toolkit`. Returns how many were
/// attached: zero when no toolkit is loaded.
pub fn init_tooltips<D, T>(dom: &D, scope: &D::Node, config: &PageConfig, toolkit: &mut T) -> usize
where
    D: Dom,
    T: TooltipToolkit<D::Node> + ?Sized,
{
    if !toolkit.is_available() {
        debug!("no tooltip toolkit loaded; tooltips skipped");
        return 0;
    }
    let selector = Selector::AttrEquals(&config.tooltip_attr, &config.tooltip_value);
    let elements = dom.query_all(scope, selector);
    for element in &elements {
        toolkit.attach(element);
    }
    debug!(count = elements.len(), "tooltips attached");
    elements.len()
}
