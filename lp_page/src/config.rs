use serde::{Deserialize, Serialize};

use crate::PageError;

/// Class names and attributes a collapsible family is wired through.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToggleConfig {
    pub trigger_class: String,
    /// Class flipped on the target panel.
    pub target_class: String,
    /// Whether `target_class` present means the panel is visible (`show`)
    /// rather than hidden (`d-none`).
    pub class_means_expanded: bool,
    pub icon_class: String,
    pub icon_collapsed: String,
    pub icon_expanded: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PageConfig {
    pub progress_class: String,
    pub progress_width_attr: String,
    pub tooltip_attr: String,
    pub tooltip_value: String,
    pub target_attr: String,
    pub category: ToggleConfig,
    pub detail: ToggleConfig,
    pub sortable_class: String,
    pub no_sort_class: String,
    pub numeric_class: String,
    pub asc_class: String,
    pub desc_class: String,
    pub sort_title: String,
    pub search_form_id: String,
    pub query_field: String,
    pub export_filename: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            progress_class: "progress-bar".to_string(),
            progress_width_attr: "data-width".to_string(),
            tooltip_attr: "data-bs-toggle".to_string(),
            tooltip_value: "tooltip".to_string(),
            target_attr: "data-target".to_string(),
            category: ToggleConfig {
                trigger_class: "parameter-category-toggle".to_string(),
                target_class: "show".to_string(),
                class_means_expanded: true,
                icon_class: "bi".to_string(),
                icon_collapsed: "bi-chevron-down".to_string(),
                icon_expanded: "bi-chevron-up".to_string(),
            },
            detail: ToggleConfig {
                trigger_class: "parameter-info-toggle".to_string(),
                target_class: "d-none".to_string(),
                class_means_expanded: false,
                icon_class: "bi".to_string(),
                icon_collapsed: "bi-plus-circle".to_string(),
                icon_expanded: "bi-dash-circle".to_string(),
            },
            sortable_class: "sortable".to_string(),
            no_sort_class: "no-sort".to_string(),
            numeric_class: "numeric".to_string(),
            asc_class: "asc".to_string(),
            desc_class: "desc".to_string(),
            sort_title: "点击排序".to_string(),
            search_form_id: "parameterSearchForm".to_string(),
            query_field: "q".to_string(),
            export_filename: crate::DEFAULT_EXPORT_FILENAME.to_string(),
        }
    }
}

impl PageConfig {
    /// Parse a JSON override; missing keys keep their defaults.
    pub fn from_json(input: &str) -> Result<Self, PageError> {
        let config: PageConfig =
            serde_json::from_str(input).map_err(|err| PageError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PageError> {
        if self.asc_class == self.desc_class {
            return Err(PageError::Config(
                "ascending and descending classes must differ".into(),
            ));
        }
        for toggle in [&self.category, &self.detail] {
            if toggle.icon_collapsed == toggle.icon_expanded {
                return Err(PageError::Config(format!(
                    "icon pair for {} must differ",
                    toggle.trigger_class
                )));
            }
        }
        let blank = [
            ("progress_class", &self.progress_class),
            ("sortable_class", &self.sortable_class),
            ("target_attr", &self.target_attr),
            ("query_field", &self.query_field),
        ];
        if let Some((name, _)) = blank.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(PageError::Config(format!("{name} must not be empty")));
        }
        Ok(())
    }
}
