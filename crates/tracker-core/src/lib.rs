//! ============================================================================
//! TRACKER-CORE: CiviTrack Client Library
//! ============================================================================
//! Everything the client surfaces share:
//! - SessionStore: persisted role / citizen id / token (redb)
//! - ApiGateway: identity-stamping HTTP wrapper with normalized errors
//! - CitizenBootstrap: best-effort anonymous identity provisioning
//! - lifecycle: permitted actions per (status, role) + payload validation
//! - listview: client-side filter/sort over fetched pages
//! - api::*: one typed wrapper per backend route family
//! ============================================================================

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod gateway;
pub mod heatmap;
pub mod lifecycle;
pub mod listview;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use bootstrap::CitizenBootstrap;
pub use config::AppConfig;
pub use error::{ClientError, Result};
pub use gateway::ApiGateway;
pub use session::SessionStore;
pub use types::*;
