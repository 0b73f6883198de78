//! ============================================================================
//! Request Lifecycle View-Model
//! ============================================================================
//! Pure derivation of permitted actions from (status, role), plus the
//! client-side validation of comment/rating/submission payloads. Nothing in
//! here touches the network; the backend remains the authority on whether
//! a transition is accepted.
//! ============================================================================

use crate::error::{ClientError, Result};
use crate::types::{
    AddComment, AddRating, Category, CreateServiceRequest, GeoLocation, Priority, RequestStatus,
    Role,
};

/// Shown in place of the rating control while the request is still open.
pub const RATING_LOCKED_MESSAGE: &str = "You can rate only after the request is resolved/closed.";

/// What the current caller may do with a request in the given status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSet {
    /// Staff only. The client defaults to the adjacent next status but
    /// offers the whole enumeration; non-adjacent picks are the backend's
    /// call to accept or reject.
    pub can_transition: bool,
    /// Staff only; independent of status.
    pub can_set_priority: bool,
    /// Staff only: assign/auto-assign, merge, escalate, milestones.
    pub can_administer: bool,
    /// Citizens comment in any status.
    pub can_comment: bool,
    /// Citizens rate only once the request is resolved or closed.
    pub can_rate: bool,
    /// Explanatory message when rating is suppressed; None when allowed
    /// or when the caller cannot rate at all.
    pub rating_locked_reason: Option<&'static str>,
    /// Default suggestion for the transition control.
    pub suggested_next: Option<RequestStatus>,
}

/// Rating is open only in the two settled statuses.
pub fn rating_open(status: RequestStatus) -> bool {
    matches!(status, RequestStatus::Resolved | RequestStatus::Closed)
}

/// Derive the permitted actions for a request in `status` as seen by `role`.
pub fn actions_for(status: RequestStatus, role: Role) -> ActionSet {
    match role {
        Role::Staff => ActionSet {
            can_transition: true,
            can_set_priority: true,
            can_administer: true,
            can_comment: false,
            can_rate: false,
            rating_locked_reason: None,
            suggested_next: Some(status.next()),
        },
        Role::Citizen => {
            let can_rate = rating_open(status);
            ActionSet {
                can_transition: false,
                can_set_priority: false,
                can_administer: false,
                can_comment: true,
                can_rate,
                rating_locked_reason: if can_rate {
                    None
                } else {
                    Some(RATING_LOCKED_MESSAGE)
                },
                suggested_next: None,
            }
        }
    }
}

// ============================================================================
// Comment validation
// ============================================================================

/// Unvalidated comment input from a view.
#[derive(Debug, Clone, Default)]
pub struct CommentDraft {
    pub text: String,
    pub parent_id: Option<String>,
}

impl CommentDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parent_id: None,
        }
    }

    /// Trim and reject empty input before any network call.
    pub fn validate(&self) -> Result<AddComment> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(ClientError::validation("Write a comment first."));
        }
        Ok(AddComment {
            text: text.to_string(),
            parent_id: self.parent_id.clone(),
        })
    }
}

// ============================================================================
// Rating validation
// ============================================================================

/// Unvalidated rating input from a view.
#[derive(Debug, Clone)]
pub struct RatingDraft {
    pub stars: i64,
    pub comment: Option<String>,
    pub reason_codes: Vec<String>,
}

impl RatingDraft {
    pub fn new(stars: i64) -> Self {
        Self {
            stars,
            comment: None,
            reason_codes: Vec::new(),
        }
    }

    /// Check eligibility and bounds; reason codes default to empty.
    pub fn validate(&self, status: RequestStatus) -> Result<AddRating> {
        if !rating_open(status) {
            return Err(ClientError::validation(RATING_LOCKED_MESSAGE));
        }
        if !(1..=5).contains(&self.stars) {
            return Err(ClientError::validation("Stars must be between 1 and 5."));
        }
        let comment = self
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Ok(AddRating {
            stars: self.stars as u8,
            comment,
            reason_codes: self.reason_codes.clone(),
        })
    }
}

// ============================================================================
// Submission validation
// ============================================================================

/// Unvalidated new-request form. Location is whatever the picker produced,
/// so both halves stay optional until validation.
#[derive(Debug, Clone)]
pub struct SubmissionDraft {
    pub category: Category,
    pub description: String,
    pub priority: Option<Priority>,
    pub lng: Option<f64>,
    pub lat: Option<f64>,
    pub address_hint: Option<String>,
    pub anonymous: bool,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl SubmissionDraft {
    /// Required fields and contact rules; nothing here reaches the network.
    pub fn validate(&self) -> Result<CreateServiceRequest> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ClientError::validation("Please enter a description."));
        }

        let (lng, lat) = match (self.lng, self.lat) {
            (Some(lng), Some(lat)) => (lng, lat),
            _ => return Err(ClientError::validation("Please pick a location.")),
        };

        if !self.anonymous {
            let has_contact = self
                .email
                .as_deref()
                .map(str::trim)
                .is_some_and(|e| !e.is_empty())
                || self
                    .phone
                    .as_deref()
                    .map(str::trim)
                    .is_some_and(|p| !p.is_empty());
            if !has_contact {
                return Err(ClientError::validation(
                    "For verification, please provide at least Email or Phone.",
                ));
            }
        }

        let mut location = GeoLocation::point(lng, lat);
        location.address_hint = self
            .address_hint
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_string);

        Ok(CreateServiceRequest {
            category: self.category,
            description: description.to_string(),
            priority: self.priority,
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citizen_actions_follow_status() {
        for status in crate::types::STATUS_CHAIN {
            let actions = actions_for(status, Role::Citizen);
            assert!(actions.can_comment, "comments open in {:?}", status);
            assert!(!actions.can_transition);
            assert!(!actions.can_set_priority);
            assert_eq!(actions.can_rate, rating_open(status));
            if actions.can_rate {
                assert!(actions.rating_locked_reason.is_none());
            } else {
                assert_eq!(actions.rating_locked_reason, Some(RATING_LOCKED_MESSAGE));
            }
        }
    }

    #[test]
    fn test_rating_open_only_when_settled() {
        assert!(!rating_open(RequestStatus::New));
        assert!(!rating_open(RequestStatus::Triaged));
        assert!(!rating_open(RequestStatus::Assigned));
        assert!(!rating_open(RequestStatus::InProgress));
        assert!(rating_open(RequestStatus::Resolved));
        assert!(rating_open(RequestStatus::Closed));
    }

    #[test]
    fn test_staff_actions_and_suggestion() {
        let actions = actions_for(RequestStatus::New, Role::Staff);
        assert!(actions.can_transition);
        assert!(actions.can_set_priority);
        assert!(actions.can_administer);
        assert!(!actions.can_comment);
        assert!(!actions.can_rate);
        assert_eq!(actions.suggested_next, Some(RequestStatus::Triaged));

        // terminal: suggestion stays at closed rather than wrapping
        let actions = actions_for(RequestStatus::Closed, Role::Staff);
        assert_eq!(actions.suggested_next, Some(RequestStatus::Closed));
    }

    #[test]
    fn test_whitespace_comment_is_rejected_locally() {
        let draft = CommentDraft::new("   \n\t ");
        assert!(draft.validate().is_err());

        let draft = CommentDraft::new("  the light is still out  ");
        let payload = draft.validate().unwrap();
        assert_eq!(payload.text, "the light is still out");
    }

    #[test]
    fn test_rating_payload_shape() {
        let draft = RatingDraft::new(5);
        let payload = draft.validate(RequestStatus::Resolved).unwrap();
        assert_eq!(payload.stars, 5);
        assert!(payload.reason_codes.is_empty());
        assert!(payload.comment.is_none());
    }

    #[test]
    fn test_rating_rejected_while_open() {
        let draft = RatingDraft::new(4);
        let err = draft.validate(RequestStatus::InProgress).unwrap_err();
        assert_eq!(err.to_string(), RATING_LOCKED_MESSAGE);
    }

    #[test]
    fn test_rating_bounds() {
        assert!(RatingDraft::new(0).validate(RequestStatus::Closed).is_err());
        assert!(RatingDraft::new(6).validate(RequestStatus::Closed).is_err());
        assert!(RatingDraft::new(1).validate(RequestStatus::Closed).is_ok());
    }

    fn draft() -> SubmissionDraft {
        SubmissionDraft {
            category: Category::Pothole,
            description: "Large pothole near the school".to_string(),
            priority: Some(Priority::P3),
            lng: Some(35.2),
            lat: Some(31.9),
            address_hint: None,
            anonymous: true,
            email: None,
            phone: None,
        }
    }

    #[test]
    fn test_submission_requires_description_and_location() {
        let mut d = draft();
        d.description = "  ".to_string();
        assert!(d.validate().is_err());

        let mut d = draft();
        d.lat = None;
        assert!(d.validate().is_err());

        let payload = draft().validate().unwrap();
        assert_eq!(payload.location.coordinates, vec![35.2, 31.9]);
    }

    #[test]
    fn test_named_submission_needs_contact() {
        let mut d = draft();
        d.anonymous = false;
        assert!(d.validate().is_err());

        d.phone = Some("+970590000000".to_string());
        assert!(d.validate().is_ok());
    }
}
