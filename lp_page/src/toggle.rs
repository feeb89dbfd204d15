use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ToggleConfig;
use crate::dom::{Dom, Selector};
use crate::PageConfig;

/// The two collapsible families on the parameter pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToggleFamily {
    /// Whole parameter categories (`show`, chevron icons).
    Category,
    /// Per-parameter detail panels (`d-none`, plus/dash icons).
    Detail,
}

impl ToggleFamily {
    pub const ALL: [ToggleFamily; 2] = [ToggleFamily::Category, ToggleFamily::Detail];

    pub fn config(self, config: &PageConfig) -> &ToggleConfig {
        match self {
            ToggleFamily::Category => &config.category,
            ToggleFamily::Detail => &config.detail,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelState {
    Collapsed,
    Expanded,
}

impl PanelState {
    fn from_class(present: bool, toggle: &ToggleConfig) -> Self {
        if present == toggle.class_means_expanded {
            PanelState::Expanded
        } else {
            PanelState::Collapsed
        }
    }

    pub fn read<D: Dom>(dom: &D, target: &D::Node, toggle: &ToggleConfig) -> Self {
        Self::from_class(dom.has_class(target, &toggle.target_class), toggle)
    }

    pub fn flipped(self) -> Self {
        match self {
            PanelState::Collapsed => PanelState::Expanded,
            PanelState::Expanded => PanelState::Collapsed,
        }
    }

    /// Icon class the trigger shows in this state.
    pub fn icon(self, toggle: &ToggleConfig) -> &str {
        match self {
            PanelState::Collapsed => &toggle.icon_collapsed,
            PanelState::Expanded => &toggle.icon_expanded,
        }
    }

    /// Write this state as classes on the target and, if present, the icon.
    pub fn render<D: Dom>(
        self,
        dom: &mut D,
        target: &D::Node,
        icon: Option<&D::Node>,
        toggle: &ToggleConfig,
    ) {
        let class_present = (self == PanelState::Expanded) == toggle.class_means_expanded;
        if class_present {
            dom.add_class(target, &toggle.target_class);
        } else {
            dom.remove_class(target, &toggle.target_class);
        }
        if let Some(icon) = icon {
            dom.remove_class(icon, self.flipped().icon(toggle));
            dom.add_class(icon, self.icon(toggle));
        }
    }
}

/// Every trigger element of both families under `scope`.
pub fn toggle_triggers<D: Dom>(
    dom: &D,
    scope: &D::Node,
    config: &PageConfig,
) -> Vec<(D::Node, ToggleFamily)> {
    ToggleFamily::ALL
        .into_iter()
        .flat_map(|family| {
            let class = &family.config(config).trigger_class;
            dom.query_all(scope, Selector::Class(class))
                .into_iter()
                .map(move |trigger| (trigger, family))
        })
        .collect()
}

/// Handle one click on `trigger`: flip the target's panel state and render
/// it onto the target and the trigger's icon.
///
/// Returns the target's state after the flip, or `None` when the trigger
/// names no existing element.
pub fn flip_panel<D: Dom>(
    dom: &mut D,
    trigger: &D::Node,
    family: ToggleFamily,
    config: &PageConfig,
) -> Option<PanelState> {
    let toggle = family.config(config);
    let target_id = dom.attribute(trigger, &config.target_attr)?;
    let Some(target) = dom.element_by_id(&target_id) else {
        debug!(target = %target_id, "toggle target missing");
        return None;
    };

    let state = PanelState::read(dom, &target, toggle).flipped();
    let icon = dom.query(trigger, Selector::Class(&toggle.icon_class));
    if icon.is_none() {
        debug!(target = %target_id, "toggle trigger has no icon");
    }
    state.render(dom, &target, icon.as_ref(), toggle);
    Some(state)
}
