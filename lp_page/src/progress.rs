use tracing::debug;

use crate::dom::{Dom, Selector};
use crate::PageConfig;

/// Apply each progress bar's declared percentage as its inline width.
///
/// Bars without a (non-empty) width attribute keep whatever style they had.
/// Returns the number of bars updated.
pub fn init_progress_bars<D: Dom>(dom: &mut D, scope: &D::Node, config: &PageConfig) -> usize {
    let mut updated = 0;
    for bar in dom.query_all(scope, Selector::Class(&config.progress_class)) {
        let Some(width) = dom.attribute(&bar, &config.progress_width_attr) else {
            continue;
        };
        if width.is_empty() {
            continue;
        }
        dom.set_style(&bar, "width", &format!("{width}%"));
        updated += 1;
    }
    debug!(updated, "progress bars initialised");
    updated
}
