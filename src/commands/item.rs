//! Template Item Commands
//!
//! Request builders for item deletion, ungrouping, ordering and grouping.

use reqwest::Method;

use super::{ApiRequest, ApiResponse};
use crate::config::Config;
use crate::models::{ItemId, ItemRef, TemplateSnapshot};

/// `DELETE <base>/<ref>/<id>/delete`
pub fn delete_request(config: &Config, reference: &ItemRef, id: &ItemId) -> ApiRequest {
    ApiRequest::new(
        Method::DELETE,
        format!("{}/{}/{}/delete", config.direct_base, reference.as_str(), id),
    )
}

/// `POST <base>/eval-templateitem/unblock` with `itemid`
pub fn unblock_request(config: &Config, id: &ItemId) -> ApiRequest {
    ApiRequest::new(Method::POST, format!("{}/{}", config.direct_base, ItemRef::UNBLOCK))
        .field("itemid", id.as_str())
}

/// Persist the top-level order as `orderedIds=id1,id2,...`
pub fn save_order_request(config: &Config, order: &[ItemId]) -> ApiRequest {
    ApiRequest::new(Method::POST, config.save_order_path.clone()).field("orderedIds", join_ids(order))
}

/// Add existing items to a block as `blockid=<id>&additems=id1,id2,...`
pub fn add_to_block_request(config: &Config, block_id: &ItemId, items: &[ItemId]) -> ApiRequest {
    ApiRequest::new(Method::POST, config.block_edit_path.clone())
        .field("blockid", block_id.as_str())
        .field("additems", join_ids(items))
}

pub fn join_ids(ids: &[ItemId]) -> String {
    ids.iter().map(ItemId::as_str).collect::<Vec<_>>().join(",")
}

/// Updated item list carried in a success body, if the server sent one
pub fn decode_snapshot(response: &ApiResponse) -> Option<TemplateSnapshot> {
    let body = response.body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<TemplateSnapshot>(body) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            log::debug!("response body is not a template snapshot: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<ItemId> {
        raw.iter().map(|s| ItemId::new(*s)).collect()
    }

    #[test]
    fn test_delete_request_path() {
        let request = delete_request(&Config::default(), &ItemRef::TemplateItem, &ItemId::new("42"));
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.path, "/direct/eval-templateitem/42/delete");
        assert!(request.form.is_empty());
    }

    #[test]
    fn test_unblock_request() {
        let request = unblock_request(&Config::default(), &ItemId::new("8"));
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/direct/eval-templateitem/unblock");
        assert_eq!(request.field_value("itemid"), Some("8"));
    }

    #[test]
    fn test_save_order_joins_ids() {
        let request = save_order_request(&Config::default(), &ids(&["3", "1", "2"]));
        assert_eq!(request.field_value("orderedIds"), Some("3,1,2"));
    }

    #[test]
    fn test_add_to_block_fields() {
        let request = add_to_block_request(&Config::default(), &ItemId::new("10"), &ids(&["4", "5"]));
        assert_eq!(request.field_value("blockid"), Some("10"));
        assert_eq!(request.field_value("additems"), Some("4,5"));
    }

    #[test]
    fn test_decode_snapshot() {
        let empty = ApiResponse { status: 200, body: "  ".to_string() };
        assert_eq!(decode_snapshot(&empty), None);
        let html = ApiResponse { status: 200, body: "<html></html>".to_string() };
        assert_eq!(decode_snapshot(&html), None);
        let json = ApiResponse { status: 200, body: r#"{"templateId":"7","items":[]}"#.to_string() };
        assert_eq!(decode_snapshot(&json).map(|s| s.template_id), Some("7".to_string()));
    }
}
