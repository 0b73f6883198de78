//! ============================================================================
//! Requests API - Lifecycle, Feedback, Assignment, Geospatial
//! ============================================================================
//! The one consolidated contract for the `/requests` route family. Citizen
//! calls ride the identity headers the gateway stamps; staff calls are
//! role-gated by the backend.
//! ============================================================================

use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::gateway::ApiGateway;
use crate::types::{
    Ack, AddComment, AddRating, Category, CreateServiceRequest, MergeDuplicatePayload,
    MilestonePayload, Priority, RequestList, RequestPage, RequestStatus, ServiceRequest, Timeline,
    TransitionPayload, UpdatePriority,
};

/// Staff listing query. Unset filters are sent as empty strings, which the
/// backend treats as "no filter".
#[derive(Debug, Clone)]
pub struct StaffListQuery {
    pub status: Option<RequestStatus>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for StaffListQuery {
    fn default() -> Self {
        Self {
            status: None,
            category: None,
            priority: None,
            page: 1,
            page_size: 10,
        }
    }
}

impl StaffListQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
            (
                "status",
                self.status.map(|s| s.as_str().to_string()).unwrap_or_default(),
            ),
            (
                "category",
                self.category.map(|c| c.as_str().to_string()).unwrap_or_default(),
            ),
            (
                "priority",
                self.priority.map(|p| p.as_str().to_string()).unwrap_or_default(),
            ),
        ]
    }
}

pub struct RequestsApi {
    gateway: Arc<ApiGateway>,
}

impl RequestsApi {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    // ========================================================================
    // Citizen
    // ========================================================================

    /// Submit a new request. The idempotency key belongs to this logical
    /// submission: resubmitting after a transport failure reuses it, a new
    /// submission must bring a fresh one.
    pub async fn create(
        &self,
        payload: &CreateServiceRequest,
        idempotency_key: &str,
    ) -> Result<ServiceRequest> {
        let created: ServiceRequest = self
            .gateway
            .post_idempotent("/requests", payload, idempotency_key)
            .await?;
        info!("Submitted request {} ({})", created.id, created.category.as_str());
        Ok(created)
    }

    /// The caller's own requests.
    pub async fn my_requests(&self) -> Result<RequestList> {
        self.gateway.get("/requests/me").await
    }

    pub async fn get(&self, id: &str) -> Result<ServiceRequest> {
        self.gateway.get(&format!("/requests/{}", id)).await
    }

    pub async fn timeline(&self, id: &str) -> Result<Timeline> {
        self.gateway.get(&format!("/requests/{}/timeline", id)).await
    }

    pub async fn add_comment(&self, id: &str, payload: &AddComment) -> Result<Ack> {
        self.gateway
            .post(&format!("/requests/{}/comment", id), payload)
            .await
    }

    pub async fn add_rating(&self, id: &str, payload: &AddRating) -> Result<Ack> {
        self.gateway
            .post(&format!("/requests/{}/rating", id), payload)
            .await
    }

    // ========================================================================
    // Shared
    // ========================================================================

    /// Requests within `radius_m` meters of a point.
    pub async fn nearby(&self, lng: f64, lat: f64, radius_m: u32) -> Result<RequestList> {
        self.gateway
            .get_query(
                "/requests/nearby",
                &[
                    ("lng", lng.to_string()),
                    ("lat", lat.to_string()),
                    ("radius_m", radius_m.to_string()),
                ],
            )
            .await
    }

    // ========================================================================
    // Staff
    // ========================================================================

    pub async fn list(&self, query: &StaffListQuery) -> Result<RequestPage> {
        self.gateway.get_query("/requests", &query.query_pairs()).await
    }

    pub async fn transition(&self, id: &str, next_status: RequestStatus) -> Result<ServiceRequest> {
        let updated: ServiceRequest = self
            .gateway
            .patch(
                &format!("/requests/{}/transition", id),
                &TransitionPayload { next_status },
            )
            .await?;
        info!("Request {} moved to {}", id, next_status.as_str());
        Ok(updated)
    }

    pub async fn set_priority(&self, id: &str, priority: Priority) -> Result<ServiceRequest> {
        let updated: ServiceRequest = self
            .gateway
            .patch(
                &format!("/requests/{}/priority", id),
                &UpdatePriority { priority },
            )
            .await?;
        info!("Request {} priority set to {}", id, priority.as_str());
        Ok(updated)
    }

    /// Let the backend pick the best agent.
    pub async fn auto_assign(&self, id: &str) -> Result<ServiceRequest> {
        self.gateway
            .post_empty(&format!("/requests/{}/auto-assign", id))
            .await
    }

    pub async fn assign(&self, id: &str, agent_id: &str) -> Result<ServiceRequest> {
        self.gateway
            .post_empty(&format!("/requests/{}/assign/{}", id, agent_id))
            .await
    }

    /// Fold this request into `master_request_id` as a duplicate.
    pub async fn merge(&self, id: &str, master_request_id: &str) -> Result<serde_json::Value> {
        self.gateway
            .post(
                &format!("/requests/{}/merge", id),
                &MergeDuplicatePayload {
                    master_request_id: master_request_id.to_string(),
                },
            )
            .await
    }

    /// Bump the SLA escalation counter; first step notifies the dispatcher,
    /// later ones the manager. All backend-side, the client just re-renders.
    pub async fn escalate(&self, id: &str) -> Result<ServiceRequest> {
        self.gateway
            .post_empty(&format!("/requests/{}/escalate", id))
            .await
    }

    /// Record a field milestone ("arrived", "complete", ...). Any status
    /// side effects are backend-owned.
    pub async fn milestone(&self, id: &str, payload: &MilestonePayload) -> Result<ServiceRequest> {
        self.gateway
            .patch(&format!("/requests/{}/milestone", id), payload)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_sends_all_sentinels_as_empty() {
        let pairs = StaffListQuery::default().query_pairs();
        assert!(pairs.contains(&("page", "1".to_string())));
        assert!(pairs.contains(&("page_size", "10".to_string())));
        assert!(pairs.contains(&("status", String::new())));
        assert!(pairs.contains(&("priority", String::new())));
    }

    #[test]
    fn test_list_query_with_filters() {
        let query = StaffListQuery {
            status: Some(RequestStatus::InProgress),
            priority: Some(Priority::P1),
            page: 3,
            ..Default::default()
        };
        let pairs = query.query_pairs();
        assert!(pairs.contains(&("status", "in_progress".to_string())));
        assert!(pairs.contains(&("priority", "P1".to_string())));
        assert!(pairs.contains(&("page", "3".to_string())));
    }

    #[test]
    fn test_transition_payload_wire_shape() {
        let json = serde_json::to_value(TransitionPayload {
            next_status: RequestStatus::Assigned,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"next_status": "assigned"}));
    }

    #[test]
    fn test_rating_payload_wire_shape() {
        let json = serde_json::to_value(AddRating {
            stars: 5,
            comment: None,
            reason_codes: Vec::new(),
        })
        .unwrap();
        assert_eq!(json["stars"], 5);
        assert_eq!(json["reason_codes"], serde_json::json!([]));
    }
}
