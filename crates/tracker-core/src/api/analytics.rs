//! ============================================================================
//! Analytics API - Staff Dashboard Feeds
//! ============================================================================
//! KPI counters, the geographic heatmap feed (normalized through the shape
//! parser), and the cohort/agent aggregates. All staff-gated server-side.
//! ============================================================================

use std::sync::Arc;

use crate::error::Result;
use crate::gateway::ApiGateway;
use crate::heatmap::{parse_heatmap, HeatPoint};
use crate::types::{Kpis, RequestStatus, STATUS_CHAIN};

pub struct AnalyticsApi {
    gateway: Arc<ApiGateway>,
}

impl AnalyticsApi {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// Dashboard counters.
    pub async fn kpis(&self) -> Result<Kpis> {
        self.gateway.get("/analytics/kpis").await
    }

    /// Heatmap points for the given statuses; an empty slice means all of
    /// them. The body is normalized through the shape parser, so an
    /// unexpected feed format surfaces as an error instead of an empty map.
    pub async fn heatmap(&self, status_in: &[RequestStatus]) -> Result<Vec<HeatPoint>> {
        let statuses = join_statuses(status_in);
        let body: serde_json::Value = self
            .gateway
            .get_query("/analytics/geofeeds/heatmap", &[("status_in", statuses)])
            .await?;
        parse_heatmap(&body)
    }

    pub async fn cohorts(&self) -> Result<serde_json::Value> {
        self.gateway.get("/analytics/cohorts").await
    }

    pub async fn agents(&self) -> Result<serde_json::Value> {
        self.gateway.get("/analytics/agents").await
    }
}

/// Comma-joined `status_in` parameter; defaults to the whole chain.
fn join_statuses(status_in: &[RequestStatus]) -> String {
    let statuses: &[RequestStatus] = if status_in.is_empty() {
        &STATUS_CHAIN
    } else {
        status_in
    };
    statuses
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_in_defaults_to_full_chain() {
        assert_eq!(
            join_statuses(&[]),
            "new,triaged,assigned,in_progress,resolved,closed"
        );
    }

    #[test]
    fn test_status_in_single_filter() {
        assert_eq!(join_statuses(&[RequestStatus::Resolved]), "resolved");
        assert_eq!(
            join_statuses(&[RequestStatus::New, RequestStatus::Triaged]),
            "new,triaged"
        );
    }
}
