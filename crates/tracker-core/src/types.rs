//! ============================================================================
//! Core Types for the CiviTrack Client
//! ============================================================================
//! Client-side projections of the backend's service-request documents plus
//! the request/response payloads for every consumed route. The backend owns
//! these records; the client only reads and posts them.
//! ============================================================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Caller role attached to every outbound request as `X-Role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Citizen,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Citizen => "citizen",
            Role::Staff => "staff",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "citizen" => Some(Role::Citizen),
            "staff" => Some(Role::Staff),
            _ => None,
        }
    }
}

/// Lifecycle stage of a service request.
/// The chain is linear: new -> triaged -> assigned -> in_progress ->
/// resolved -> closed. Only the backend enforces transitions; the client
/// suggests the adjacent next stage (see `lifecycle`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    New,
    Triaged,
    Assigned,
    InProgress,
    Resolved,
    Closed,
}

/// All statuses in workflow order.
pub const STATUS_CHAIN: [RequestStatus; 6] = [
    RequestStatus::New,
    RequestStatus::Triaged,
    RequestStatus::Assigned,
    RequestStatus::InProgress,
    RequestStatus::Resolved,
    RequestStatus::Closed,
];

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::New => "new",
            RequestStatus::Triaged => "triaged",
            RequestStatus::Assigned => "assigned",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Resolved => "resolved",
            RequestStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "new" => Some(RequestStatus::New),
            "triaged" => Some(RequestStatus::Triaged),
            "assigned" => Some(RequestStatus::Assigned),
            "in-progress" | "inprogress" | "in_progress" => Some(RequestStatus::InProgress),
            "resolved" => Some(RequestStatus::Resolved),
            "closed" => Some(RequestStatus::Closed),
            _ => None,
        }
    }

    /// Position in the workflow chain (new = 0 .. closed = 5).
    pub fn position(&self) -> usize {
        match self {
            RequestStatus::New => 0,
            RequestStatus::Triaged => 1,
            RequestStatus::Assigned => 2,
            RequestStatus::InProgress => 3,
            RequestStatus::Resolved => 4,
            RequestStatus::Closed => 5,
        }
    }

    /// The adjacent next stage. Closed is terminal and suggests itself.
    pub fn next(&self) -> Self {
        let i = (self.position() + 1).min(STATUS_CHAIN.len() - 1);
        STATUS_CHAIN[i]
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Closed)
    }
}

/// Staff-assigned urgency tier. Independent of status; any value may
/// follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    P1,
    P2,
    P3,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::P1 => "P1",
            Priority::P2 => "P2",
            Priority::P3 => "P3",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "P1" => Some(Priority::P1),
            "P2" => Some(Priority::P2),
            "P3" => Some(Priority::P3),
            _ => None,
        }
    }

    /// Sort rank: P1 outranks P2 outranks P3; a missing priority ranks 0.
    pub fn rank(p: Option<Priority>) -> u8 {
        match p {
            Some(Priority::P1) => 3,
            Some(Priority::P2) => 2,
            Some(Priority::P3) => 1,
            None => 0,
        }
    }
}

/// Issue category picked at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Pothole,
    StreetLight,
    Garbage,
    WaterLeak,
    RoadBlock,
    Trash,
    /// Catch-all; also absorbs categories this client does not know.
    Other,
}

// Lenient decode: the backend stores the category as a free string, so an
// unknown value maps to Other instead of failing the whole page.
impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Category::parse(&s).unwrap_or(Category::Other))
    }
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Pothole => "pothole",
            Category::StreetLight => "street_light",
            Category::Garbage => "garbage",
            Category::WaterLeak => "water_leak",
            Category::RoadBlock => "road_block",
            Category::Trash => "trash",
            Category::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pothole" => Some(Category::Pothole),
            "street_light" | "street-light" => Some(Category::StreetLight),
            "garbage" => Some(Category::Garbage),
            "water_leak" | "water-leak" => Some(Category::WaterLeak),
            "road_block" | "road-block" => Some(Category::RoadBlock),
            "trash" => Some(Category::Trash),
            "other" => Some(Category::Other),
            _ => None,
        }
    }
}

/// GeoJSON point as the backend stores it: coordinates are [lng, lat].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoLocation {
    pub r#type: String,
    pub coordinates: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
}

impl GeoLocation {
    pub fn point(lng: f64, lat: f64) -> Self {
        Self {
            r#type: "Point".to_string(),
            coordinates: vec![lng, lat],
            address_hint: None,
            zone_id: None,
        }
    }

    pub fn lng(&self) -> Option<f64> {
        self.coordinates.first().copied()
    }

    pub fn lat(&self) -> Option<f64> {
        self.coordinates.get(1).copied()
    }
}

/// Nested timestamp block some request documents carry instead of (or in
/// addition to) the top-level `created_at`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timestamps {
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// Rating snapshot the backend copies onto the request document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitizenFeedback {
    #[serde(default)]
    pub stars: Option<u8>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub rated_at: Option<NaiveDateTime>,
}

/// A service request as returned by the backend. Read-mostly projection:
/// the client never mutates one of these directly, it posts lifecycle
/// calls and re-reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    #[serde(rename = "_id", alias = "request_id", alias = "id", default)]
    pub id: String,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Option<Priority>,
    pub status: RequestStatus,
    #[serde(default)]
    pub location: Option<GeoLocation>,
    #[serde(default)]
    pub citizen_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub timestamps: Option<Timestamps>,
    #[serde(default)]
    pub assigned_agent_id: Option<String>,
    #[serde(default)]
    pub escalation_count: Option<i64>,
    #[serde(default)]
    pub citizen_feedback: Option<CitizenFeedback>,
}

impl ServiceRequest {
    /// Creation time, resolving the nested `timestamps` fallback.
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.created_at
            .or_else(|| self.timestamps.as_ref().and_then(|t| t.created_at))
    }
}

/// Paged staff listing envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestPage {
    #[serde(default)]
    pub items: Vec<ServiceRequest>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total: u64,
}

impl RequestPage {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) * u64::from(self.page_size) < self.total
    }
}

/// Unpaged listing envelope (`/requests/me`, `/requests/nearby`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestList {
    #[serde(default)]
    pub items: Vec<ServiceRequest>,
}

// ============================================================================
// Timeline
// ============================================================================

/// Reference to whoever produced a timeline event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActorRef {
    #[serde(default)]
    pub actor_type: Option<String>,
    #[serde(default)]
    pub actor_id: Option<String>,
}

/// Event-specific payload. All fields optional; which ones are present
/// depends on the event type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventMeta {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub stars: Option<u8>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub reason_codes: Option<Vec<String>>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub evidence_urls: Option<Vec<String>>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

/// One append-only timeline entry. The event type is an open set
/// ("milestone:arrived" etc.), so it stays a string here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub at: Option<NaiveDateTime>,
    #[serde(default)]
    pub by: Option<ActorRef>,
    #[serde(default)]
    pub meta: EventMeta,
}

impl TimelineEvent {
    /// Short human label for the feed, mirroring what the detail view shows.
    pub fn label(&self) -> String {
        let who = self
            .meta
            .display_name
            .clone()
            .or_else(|| self.by.as_ref().and_then(|b| b.actor_id.clone()))
            .or_else(|| self.by.as_ref().and_then(|b| b.actor_type.clone()))
            .unwrap_or_default();

        match self.kind.as_str() {
            "created" => "Request created".to_string(),
            "comment" => format!("{} commented", who).trim().to_string(),
            "rating" => {
                let stars = self.meta.stars.unwrap_or(0);
                format!("{} rated ({}*)", who, stars).trim().to_string()
            }
            "transition" => "Status changed".to_string(),
            other if other.starts_with("milestone:") => {
                format!("Milestone: {}", other.trim_start_matches("milestone:"))
            }
            other => other.to_string(),
        }
    }
}

/// Timeline envelope returned by `/requests/{id}/timeline`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timeline {
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub event_stream: Vec<TimelineEvent>,
}

impl Timeline {
    /// Events newest-first for feed display. Backend order is authoritative;
    /// this only re-sorts the local copy.
    pub fn newest_first(&self) -> Vec<&TimelineEvent> {
        let mut events: Vec<&TimelineEvent> = self.event_stream.iter().collect();
        events.reverse();
        events
    }
}

// ============================================================================
// Citizen profile
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerificationState {
    #[default]
    Unverified,
    Pending,
    Verified,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Verification {
    #[serde(default)]
    pub state: VerificationState,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub verified_at: Option<NaiveDateTime>,
}

/// Citizen profile document. Anonymous profiles carry no identity fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CitizenProfile {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub anonymous: bool,
    #[serde(default)]
    pub verification: Option<Verification>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

// ============================================================================
// Outbound payloads
// ============================================================================

/// Body for `POST /citizens`. With `anonymous: true` the backend strips
/// the identity fields regardless of what is sent.
#[derive(Debug, Clone, Serialize)]
pub struct CitizenCreate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub anonymous: bool,
}

impl CitizenCreate {
    pub fn anonymous() -> Self {
        Self {
            full_name: None,
            email: None,
            phone: None,
            anonymous: true,
        }
    }
}

/// Response of `POST /citizens`.
#[derive(Debug, Clone, Deserialize)]
pub struct CitizenCreated {
    pub citizen_id: String,
    #[serde(default)]
    pub citizen: Option<CitizenProfile>,
}

/// Body for `POST /requests`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateServiceRequest {
    pub category: Category,
    pub description: String,
    pub priority: Option<Priority>,
    pub location: GeoLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransitionPayload {
    pub next_status: RequestStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdatePriority {
    pub priority: Priority,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddComment {
    pub text: String,
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddRating {
    pub stars: u8,
    pub comment: Option<String>,
    pub reason_codes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeDuplicatePayload {
    pub master_request_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MilestonePayload {
    pub milestone: String,
    pub note: Option<String>,
    pub evidence_urls: Vec<String>,
}

/// Minimal acknowledgement body (`{"ok": true}`) from the feedback routes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub ok: bool,
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RegisterPayload {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

// ============================================================================
// Analytics
// ============================================================================

/// One bucket of the KPI status breakdown. The backend labels the bucket
/// key `_id` (aggregation output).
#[derive(Debug, Clone, Deserialize)]
pub struct StatusCount {
    #[serde(rename = "_id", alias = "status")]
    pub status: String,
    #[serde(default)]
    pub count: u64,
}

/// Dashboard counters from `/analytics/kpis`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Kpis {
    #[serde(default)]
    pub total_requests: u64,
    #[serde(default)]
    pub by_status: Vec<StatusCount>,
}

impl Kpis {
    pub fn count_for(&self, status: RequestStatus) -> u64 {
        self.by_status
            .iter()
            .find(|b| b.status == status.as_str())
            .map(|b| b.count)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_chain_order() {
        assert_eq!(RequestStatus::New.next(), RequestStatus::Triaged);
        assert_eq!(RequestStatus::Triaged.next(), RequestStatus::Assigned);
        assert_eq!(RequestStatus::Assigned.next(), RequestStatus::InProgress);
        assert_eq!(RequestStatus::InProgress.next(), RequestStatus::Resolved);
        assert_eq!(RequestStatus::Resolved.next(), RequestStatus::Closed);
        // terminal state suggests itself, no wrap-around
        assert_eq!(RequestStatus::Closed.next(), RequestStatus::Closed);
        assert!(RequestStatus::Closed.is_terminal());
    }

    #[test]
    fn test_status_wire_names() {
        let s: RequestStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(s, RequestStatus::InProgress);
        assert_eq!(
            serde_json::to_string(&RequestStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(RequestStatus::parse("In-Progress"), Some(RequestStatus::InProgress));
        assert_eq!(RequestStatus::parse("bogus"), None);
    }

    #[test]
    fn test_priority_rank() {
        assert_eq!(Priority::rank(Some(Priority::P1)), 3);
        assert_eq!(Priority::rank(Some(Priority::P2)), 2);
        assert_eq!(Priority::rank(Some(Priority::P3)), 1);
        assert_eq!(Priority::rank(None), 0);
    }

    #[test]
    fn test_category_unknown_falls_back_to_other() {
        let c: Category = serde_json::from_str("\"sinkhole\"").unwrap();
        assert_eq!(c, Category::Other);
        let c: Category = serde_json::from_str("\"street_light\"").unwrap();
        assert_eq!(c, Category::StreetLight);
    }

    #[test]
    fn test_request_deserializes_backend_doc() {
        let doc = serde_json::json!({
            "_id": "66f0a1",
            "category": "pothole",
            "description": "Large pothole near the school",
            "priority": "P3",
            "status": "new",
            "location": {"type": "Point", "coordinates": [35.2, 31.9]},
            "created_at": "2026-08-01T09:30:00",
        });
        let r: ServiceRequest = serde_json::from_value(doc).unwrap();
        assert_eq!(r.id, "66f0a1");
        assert_eq!(r.status, RequestStatus::New);
        assert_eq!(r.priority, Some(Priority::P3));
        let loc = r.location.unwrap();
        assert_eq!(loc.lng(), Some(35.2));
        assert_eq!(loc.lat(), Some(31.9));
        assert!(r.created_at.is_some());
    }

    #[test]
    fn test_timestamps_fallback() {
        let doc = serde_json::json!({
            "_id": "a",
            "category": "garbage",
            "status": "new",
            "timestamps": {"created_at": "2026-08-01T10:00:00"},
        });
        let r: ServiceRequest = serde_json::from_value(doc).unwrap();
        assert!(r.created_at.is_none());
        assert!(r.created_at().is_some());
    }

    #[test]
    fn test_event_labels() {
        let ev: TimelineEvent = serde_json::from_value(serde_json::json!({
            "type": "milestone:arrived",
            "meta": {"note": "crew on site"},
        }))
        .unwrap();
        assert_eq!(ev.label(), "Milestone: arrived");

        let ev: TimelineEvent = serde_json::from_value(serde_json::json!({
            "type": "rating",
            "meta": {"stars": 4, "display_name": "Verified Citizen"},
        }))
        .unwrap();
        assert_eq!(ev.label(), "Verified Citizen rated (4*)");
    }

    #[test]
    fn test_page_bounds() {
        let page = RequestPage {
            items: Vec::new(),
            page: 2,
            page_size: 10,
            total: 25,
        };
        assert!(page.has_prev());
        assert!(page.has_next());
        let last = RequestPage { page: 3, ..page };
        assert!(!last.has_next());
    }

    #[test]
    fn test_kpi_lookup() {
        let kpis: Kpis = serde_json::from_value(serde_json::json!({
            "total_requests": 12,
            "by_status": [
                {"_id": "new", "count": 5},
                {"_id": "in_progress", "count": 3},
            ],
        }))
        .unwrap();
        assert_eq!(kpis.count_for(RequestStatus::New), 5);
        assert_eq!(kpis.count_for(RequestStatus::InProgress), 3);
        assert_eq!(kpis.count_for(RequestStatus::Closed), 0);
    }
}
