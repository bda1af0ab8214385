use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde::{Deserialize, Serialize};

use crate::analysis;
use crate::contour::Contour;
use crate::error::Result;
use crate::types::GridPoint;

/// The boundary output of one tracking pass, detached from the tracker so it
/// can be stored or serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackOutline {
    /// Closed polylines in trace order.
    pub polylines: Vec<Vec<GridPoint>>,
    /// Grid dimensions the corner coordinates refer to.
    pub grid_width: u32,
    pub grid_height: u32,
}

impl TrackOutline {
    pub fn from_contour(contour: &Contour, grid_width: u32, grid_height: u32) -> Self {
        Self {
            polylines: contour.polylines().map(<[GridPoint]>::to_vec).collect(),
            grid_width,
            grid_height,
        }
    }

    /// Like `from_contour`, but keeps only polylines with at least
    /// `min_points` points, ranked longest first, at most `n_longest`
    /// of them (0 = no limit).
    pub fn from_contour_selected(
        contour: &Contour,
        grid_width: u32,
        grid_height: u32,
        min_points: usize,
        n_longest: usize,
    ) -> Self {
        let polylines = analysis::longest_polylines(contour, n_longest)
            .into_iter()
            .filter(|polyline| polyline.len() >= min_points)
            .map(<[GridPoint]>::to_vec)
            .collect();
        Self {
            polylines,
            grid_width,
            grid_height,
        }
    }

    pub fn to_geojson(&self) -> FeatureCollection {
        let mut features = Vec::new();

        for (i, polyline) in self.polylines.iter().enumerate() {
            let coordinates: Vec<Vec<f64>> = polyline
                .iter()
                .map(|p| vec![p.x as f64, p.y as f64])
                .collect();
            let geometry = Geometry::new(Value::LineString(coordinates));

            let mut properties = serde_json::Map::new();
            properties.insert(
                "id".to_string(),
                serde_json::Value::Number(serde_json::Number::from(i)),
            );
            properties.insert(
                "point_count".to_string(),
                serde_json::Value::Number(serde_json::Number::from(polyline.len())),
            );

            features.push(Feature {
                bbox: None,
                geometry: Some(geometry),
                id: Some(geojson::feature::Id::Number(serde_json::Number::from(i))),
                properties: Some(properties),
                foreign_members: None,
            });
        }

        let mut foreign_members = serde_json::Map::new();
        foreign_members.insert(
            "grid_width".to_string(),
            serde_json::Value::Number(serde_json::Number::from(self.grid_width)),
        );
        foreign_members.insert(
            "grid_height".to_string(),
            serde_json::Value::Number(serde_json::Number::from(self.grid_height)),
        );
        foreign_members.insert(
            "polyline_count".to_string(),
            serde_json::Value::Number(serde_json::Number::from(self.polylines.len())),
        );

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(foreign_members),
        }
    }

    pub fn to_geojson_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_geojson())?)
    }

    pub fn save_geojson(&self, path: &str) -> Result<()> {
        std::fs::write(path, self.to_geojson_string()?)?;
        Ok(())
    }
}
