//! ============================================================================
//! API Modules - Typed Wrappers per Backend Domain
//! ============================================================================
//! One wrapper per route family, all going through the shared gateway:
//! - AuthApi: citizen/staff login, registration, identity echo
//! - CitizensApi: anonymous/named profiles and the OTP verification stub
//! - RequestsApi: request lifecycle, feedback, assignment, geospatial
//! - AnalyticsApi: staff dashboard feeds
//! ============================================================================

mod analytics;
mod auth;
mod citizens;
mod requests;

pub use analytics::AnalyticsApi;
pub use auth::AuthApi;
pub use citizens::{CitizensApi, OtpChannel};
pub use requests::{RequestsApi, StaffListQuery};
