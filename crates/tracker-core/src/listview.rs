//! ============================================================================
//! List/Filter Engine
//! ============================================================================
//! Client-side search, status/priority filtering, and stable sorting over a
//! fetched page of requests. Deterministic for a given (data, filter) pair
//! and never mutates the source slice.
//! ============================================================================

use crate::types::{Priority, RequestStatus, ServiceRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(RequestStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Creation time descending.
    #[default]
    Newest,
    Oldest,
    /// P1 > P2 > P3 > unset; ties keep their prior relative order.
    PriorityDesc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "newest" => Some(SortOrder::Newest),
            "oldest" => Some(SortOrder::Oldest),
            "priority" => Some(SortOrder::PriorityDesc),
            _ => None,
        }
    }
}

/// UI-selected filters for a list view.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Case-insensitive substring over category, description, and id.
    /// Empty matches everything.
    pub search: String,
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    pub sort: SortOrder,
}

impl ListFilter {
    fn matches(&self, request: &ServiceRequest) -> bool {
        let q = self.search.trim().to_lowercase();
        let match_search = q.is_empty()
            || request.category.as_str().contains(&q)
            || request.description.to_lowercase().contains(&q)
            || request.id.to_lowercase().contains(&q);

        let match_status = match self.status {
            StatusFilter::All => true,
            StatusFilter::Only(s) => request.status == s,
        };

        let match_priority = match self.priority {
            PriorityFilter::All => true,
            PriorityFilter::Only(p) => request.priority == Some(p),
        };

        match_search && match_status && match_priority
    }
}

/// Produce the derived, ordered view. The source is copied, filtered, and
/// stable-sorted; items the filter drops never reorder the survivors.
pub fn apply(items: &[ServiceRequest], filter: &ListFilter) -> Vec<ServiceRequest> {
    let mut view: Vec<ServiceRequest> = items
        .iter()
        .filter(|r| filter.matches(r))
        .cloned()
        .collect();

    match filter.sort {
        SortOrder::Newest => {
            // missing creation times sort oldest, like an epoch-zero date
            view.sort_by_key(|r| std::cmp::Reverse(r.created_at().unwrap_or(chrono::NaiveDateTime::MIN)));
        }
        SortOrder::Oldest => {
            view.sort_by_key(|r| r.created_at().unwrap_or(chrono::NaiveDateTime::MIN));
        }
        SortOrder::PriorityDesc => {
            view.sort_by_key(|r| std::cmp::Reverse(Priority::rank(r.priority)));
        }
    }

    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use chrono::NaiveDate;

    fn request(id: &str, status: RequestStatus, priority: Option<Priority>, day: u32) -> ServiceRequest {
        ServiceRequest {
            id: id.to_string(),
            category: Category::Pothole,
            description: format!("issue {}", id),
            priority,
            status,
            location: None,
            citizen_id: None,
            created_at: NaiveDate::from_ymd_opt(2026, 8, day)
                .unwrap()
                .and_hms_opt(12, 0, 0),
            updated_at: None,
            timestamps: None,
            assigned_agent_id: None,
            escalation_count: None,
            citizen_feedback: None,
        }
    }

    #[test]
    fn test_status_filter_exact_match() {
        let items = vec![
            request("a", RequestStatus::New, None, 1),
            request("b", RequestStatus::Resolved, None, 2),
            request("c", RequestStatus::New, None, 3),
        ];

        let filter = ListFilter {
            status: StatusFilter::Only(RequestStatus::New),
            ..Default::default()
        };
        let view = apply(&items, &filter);
        assert_eq!(view.len(), 2);
        assert!(view.iter().all(|r| r.status == RequestStatus::New));

        // a status absent from the set yields an empty view
        let filter = ListFilter {
            status: StatusFilter::Only(RequestStatus::Closed),
            ..Default::default()
        };
        assert!(apply(&items, &filter).is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_over_all_fields() {
        let mut items = vec![
            request("REQ-77", RequestStatus::New, None, 1),
            request("x", RequestStatus::New, None, 2),
        ];
        items[1].description = "Streetlight flickering".to_string();

        let filter = ListFilter {
            search: "req-77".to_string(),
            ..Default::default()
        };
        assert_eq!(apply(&items, &filter).len(), 1);

        let filter = ListFilter {
            search: "FLICKER".to_string(),
            ..Default::default()
        };
        assert_eq!(apply(&items, &filter)[0].id, "x");

        // empty search matches everything
        let view = apply(&items, &ListFilter::default());
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_newest_first_is_the_default() {
        let items = vec![
            request("old", RequestStatus::New, None, 1),
            request("new", RequestStatus::New, None, 9),
            request("mid", RequestStatus::New, None, 5),
        ];
        let view = apply(&items, &ListFilter::default());
        let ids: Vec<&str> = view.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["new", "mid", "old"]);

        let filter = ListFilter {
            sort: SortOrder::Oldest,
            ..Default::default()
        };
        let view = apply(&items, &filter);
        assert_eq!(view[0].id, "old");
    }

    #[test]
    fn test_priority_sort_rank_and_stability() {
        let items = vec![
            request("p3", RequestStatus::New, Some(Priority::P3), 1),
            request("p1-first", RequestStatus::New, Some(Priority::P1), 2),
            request("unset", RequestStatus::New, None, 3),
            request("p1-second", RequestStatus::New, Some(Priority::P1), 4),
            request("p2", RequestStatus::New, Some(Priority::P2), 5),
        ];
        let filter = ListFilter {
            sort: SortOrder::PriorityDesc,
            ..Default::default()
        };
        let view = apply(&items, &filter);
        let ids: Vec<&str> = view.iter().map(|r| r.id.as_str()).collect();
        // equal priorities keep their prior relative order (stable sort)
        assert_eq!(ids, ["p1-first", "p1-second", "p2", "p3", "unset"]);
    }

    #[test]
    fn test_source_is_untouched_and_recompute_is_deterministic() {
        let items = vec![
            request("a", RequestStatus::New, Some(Priority::P2), 2),
            request("b", RequestStatus::Resolved, Some(Priority::P1), 1),
        ];
        let filter = ListFilter {
            sort: SortOrder::PriorityDesc,
            ..Default::default()
        };
        let first = apply(&items, &filter);
        let second = apply(&items, &filter);
        assert_eq!(
            first.iter().map(|r| &r.id).collect::<Vec<_>>(),
            second.iter().map(|r| &r.id).collect::<Vec<_>>()
        );
        // source order unchanged
        assert_eq!(items[0].id, "a");
        assert_eq!(items[1].id, "b");
    }
}
