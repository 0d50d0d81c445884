//! Runtime Configuration
//!
//! Read from a JSON blob the server embeds in the page. Every field has a default.

use serde::Deserialize;
use std::collections::HashMap;

use crate::error::ConfigError;

/// Id of the `<script type="application/json">` element holding the config
pub const CONFIG_ELEMENT_ID: &str = "eval-template-config";
/// Id of the element holding the initial item list snapshot
pub const SNAPSHOT_ELEMENT_ID: &str = "eval-template-items";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub template_id: String,
    /// Origin prepended to relative paths (empty = same origin)
    pub origin: String,
    /// Root of the entity-broker REST paths
    pub direct_base: String,
    pub save_order_path: String,
    pub block_edit_path: String,
    pub take_evaluation_path: String,
    pub new_group_item_path: String,
    /// Cap for confirmation popup previews
    pub preview_chars: usize,
    /// Cap before long item text collapses behind "...more"
    pub long_text_chars: usize,
    /// Fewest children a block may keep
    pub min_block_children: usize,
    pub log_level: String,
    pub log_capacity: usize,
    /// Overrides for localized strings
    pub messages: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_id: String::new(),
            origin: String::new(),
            direct_base: "/direct".to_string(),
            save_order_path: "/direct/eval-templateitem/save-order".to_string(),
            block_edit_path: "/direct/eval-templateitem/modify-block".to_string(),
            take_evaluation_path: "evaluation_create".to_string(),
            new_group_item_path: "modify_item".to_string(),
            preview_chars: 20,
            long_text_chars: 150,
            min_block_children: 2,
            log_level: "info".to_string(),
            log_capacity: rolling_logger::DEFAULT_CAPACITY,
            messages: HashMap::new(),
        }
    }
}

impl Config {
    pub fn from_json(id: &str, json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|source| ConfigError::Json {
            id: id.to_string(),
            source,
        })
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }

    /// Link of the "take evaluation" action for a template
    pub fn take_evaluation_href(&self, template_id: &str) -> String {
        format!("{}?reOpening=false&templateId={}", self.take_evaluation_path, template_id)
    }

    /// Link that opens the "new item in this group" editor
    pub fn new_group_item_href(&self, block_id: &str, template_id: &str) -> String {
        format!(
            "{}?external=false&itemClassification=Scaled&groupItemId={}&templateId={}",
            self.new_group_item_path, block_id, template_id
        )
    }
}

/// Text content of a page element by id
pub fn read_page_json(id: &str) -> Result<String, ConfigError> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|el| el.text_content())
        .ok_or_else(|| ConfigError::MissingElement(id.to_string()))
}

/// Load the page configuration, falling back to defaults when absent
pub fn load_config() -> Result<Config, ConfigError> {
    match read_page_json(CONFIG_ELEMENT_ID) {
        Ok(json) => Config::from_json(CONFIG_ELEMENT_ID, &json),
        Err(ConfigError::MissingElement(_)) => {
            log::warn!("no #{} element, using default configuration", CONFIG_ELEMENT_ID);
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json("cfg", r#"{"templateId":"12","previewChars":30}"#).unwrap();
        assert_eq!(config.template_id, "12");
        assert_eq!(config.preview_chars, 30);
        assert_eq!(config.direct_base, "/direct");
        assert_eq!(config.min_block_children, 2);
    }

    #[test]
    fn test_invalid_json() {
        let err = Config::from_json("cfg", "{").unwrap_err();
        assert!(err.to_string().starts_with("invalid JSON in #cfg"));
    }

    #[test]
    fn test_hrefs() {
        let config = Config::default();
        assert_eq!(config.take_evaluation_href("5"), "evaluation_create?reOpening=false&templateId=5");
        assert_eq!(
            config.new_group_item_href("9", "5"),
            "modify_item?external=false&itemClassification=Scaled&groupItemId=9&templateId=5"
        );
    }

    #[test]
    fn test_log_level() {
        let config = Config { log_level: "debug".to_string(), ..Config::default() };
        assert_eq!(config.log_level_filter(), log::LevelFilter::Debug);
        let config = Config { log_level: "loud".to_string(), ..Config::default() };
        assert_eq!(config.log_level_filter(), log::LevelFilter::Info);
    }
}
