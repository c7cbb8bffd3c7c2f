use serde::Deserialize;

use super::repo::{Priority, Status};

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
}

/// Sparse patch; `completed` is derived from `status` and never accepted
/// from the caller.
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
}

/// Listing filters. `priority=All` is a sentinel meaning no priority filter.
#[derive(Debug, Default, Deserialize)]
pub struct TodoFilter {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub search: Option<String>,
}

impl TodoFilter {
    pub fn priority_filter(&self) -> Option<&str> {
        match self.priority.as_deref() {
            None | Some("All") => None,
            Some(p) => Some(p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_sentinel_disables_priority_filter() {
        let filter = TodoFilter {
            priority: Some("All".into()),
            ..Default::default()
        };
        assert_eq!(filter.priority_filter(), None);

        let filter = TodoFilter {
            priority: Some("high".into()),
            ..Default::default()
        };
        assert_eq!(filter.priority_filter(), Some("high"));

        assert_eq!(TodoFilter::default().priority_filter(), None);
    }

    #[test]
    fn create_request_defaults() {
        let req: CreateTodoRequest = serde_json::from_str(r#"{"title":"Buy milk"}"#).unwrap();
        assert_eq!(req.description, "");
        assert_eq!(req.priority, Priority::Low);
        assert_eq!(req.status, Status::Pending);
    }
}
