//! ============================================================================
//! Heatmap Response Parser
//! ============================================================================
//! The heatmap feed has shipped in several shapes. Rather than sniffing
//! fields at render time, the accepted shapes are enumerated here and each
//! is normalized to one internal point representation. A body that matches
//! none of them is an error, never a silently empty dataset.
//! ============================================================================

use serde::Deserialize;

use crate::error::{ClientError, Result};

/// Intensity used when a feed entry carries no weight of its own.
pub const DEFAULT_WEIGHT: f64 = 0.6;

/// One normalized heat point. Note the order: this is lat/lng (display
/// convention), while GeoJSON coordinates arrive as [lng, lat].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPoint {
    pub lat: f64,
    pub lng: f64,
    pub weight: f64,
}

/// The accepted wire shapes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HeatmapResponse {
    /// `{"points": [[lat, lng, weight?], ...]}`
    Points { points: Vec<Vec<f64>> },
    /// `{"items": [...]}` where each item is either flat lat/lng fields or
    /// a GeoJSON location.
    Items { items: Vec<HeatItem> },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HeatItem {
    Flat {
        lat: f64,
        lng: f64,
        #[serde(default)]
        weight: Option<f64>,
    },
    Geo {
        location: GeoShape,
        #[serde(default)]
        weight: Option<f64>,
    },
}

#[derive(Debug, Deserialize)]
struct GeoShape {
    coordinates: Vec<f64>,
}

/// Parse a heatmap body into normalized points.
pub fn parse_heatmap(body: &serde_json::Value) -> Result<Vec<HeatPoint>> {
    let response: HeatmapResponse = serde_json::from_value(body.clone()).map_err(|_| {
        ClientError::Shape(
            "heatmap body is neither {points: [[lat,lng,weight]]} nor {items: [...]}".to_string(),
        )
    })?;

    match response {
        HeatmapResponse::Points { points } => points
            .into_iter()
            .map(|triple| match triple.as_slice() {
                [lat, lng] => Ok(HeatPoint {
                    lat: *lat,
                    lng: *lng,
                    weight: DEFAULT_WEIGHT,
                }),
                [lat, lng, weight] => Ok(HeatPoint {
                    lat: *lat,
                    lng: *lng,
                    weight: *weight,
                }),
                other => Err(ClientError::Shape(format!(
                    "heatmap point has {} coordinates, expected 2 or 3",
                    other.len()
                ))),
            })
            .collect(),
        HeatmapResponse::Items { items } => items
            .into_iter()
            .map(|item| match item {
                HeatItem::Flat { lat, lng, weight } => Ok(HeatPoint {
                    lat,
                    lng,
                    weight: weight.unwrap_or(DEFAULT_WEIGHT),
                }),
                HeatItem::Geo { location, weight } => match location.coordinates.as_slice() {
                    // GeoJSON order is [lng, lat]
                    [lng, lat] => Ok(HeatPoint {
                        lat: *lat,
                        lng: *lng,
                        weight: weight.unwrap_or(DEFAULT_WEIGHT),
                    }),
                    other => Err(ClientError::Shape(format!(
                        "heatmap item location has {} coordinates, expected 2",
                        other.len()
                    ))),
                },
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_points_shape() {
        let body = json!({"points": [[31.9, 35.2, 0.9], [31.95, 35.21]]});
        let points = parse_heatmap(&body).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], HeatPoint { lat: 31.9, lng: 35.2, weight: 0.9 });
        assert_eq!(points[1].weight, DEFAULT_WEIGHT);
    }

    #[test]
    fn test_flat_items_shape() {
        let body = json!({"items": [{"lat": 31.9, "lng": 35.2, "weight": 0.4}]});
        let points = parse_heatmap(&body).unwrap();
        assert_eq!(points[0], HeatPoint { lat: 31.9, lng: 35.2, weight: 0.4 });
    }

    #[test]
    fn test_geojson_items_swap_coordinate_order() {
        let body = json!({"items": [
            {"location": {"type": "Point", "coordinates": [35.2, 31.9]}}
        ]});
        let points = parse_heatmap(&body).unwrap();
        assert_eq!(points[0].lat, 31.9);
        assert_eq!(points[0].lng, 35.2);
        assert_eq!(points[0].weight, DEFAULT_WEIGHT);
    }

    #[test]
    fn test_unknown_shape_is_an_error_not_empty() {
        let body = json!({"features": []});
        assert!(parse_heatmap(&body).is_err());

        let body = json!({"items": [{"name": "not a point"}]});
        assert!(parse_heatmap(&body).is_err());
    }

    #[test]
    fn test_malformed_point_is_an_error() {
        let body = json!({"points": [[31.9]]});
        assert!(parse_heatmap(&body).is_err());
    }
}
