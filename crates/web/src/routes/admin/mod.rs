//! Back office: menu items, categories and orders.
//!
//! Every handler here takes [`RequireAdmin`](crate::middleware::RequireAdmin).
//! Mutations redirect back to their list with a `notice` code, so the list
//! is always re-fetched after a change.

pub mod categories;
pub mod items;
pub mod menu;
pub mod orders;

/// Banner shown when the backend rejects a form submission's token.
pub const UNAUTHORIZED_SUBMIT_MESSAGE: &str = "Unauthorized. Please login as admin.";

/// A banner decoded from a list page's `notice` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    pub text: &'static str,
    pub is_error: bool,
}

/// Decode a `notice` code. Unknown codes show nothing.
#[must_use]
pub fn notice(code: Option<&str>) -> Option<Notice> {
    let (text, is_error) = match code? {
        "item_created" => ("Menu item added", false),
        "item_updated" => ("Menu item updated", false),
        "item_deleted" => ("Menu item deleted", false),
        "category_created" => ("Category added", false),
        "category_deleted" => ("Category deleted", false),
        "delete_item_failed" => ("Failed to delete item", true),
        "delete_category_failed" => ("Failed to delete category", true),
        "status_failed" => ("Status update failed", true),
        _ => return None,
    };
    Some(Notice { text, is_error })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_codes() {
        assert_eq!(
            notice(Some("delete_item_failed")),
            Some(Notice {
                text: "Failed to delete item",
                is_error: true
            })
        );
        assert_eq!(notice(Some("<script>")), None);
        assert_eq!(notice(None), None);
    }
}
