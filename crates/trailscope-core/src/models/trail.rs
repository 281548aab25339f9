use serde::{Deserialize, Serialize};

use super::Geometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrailId(pub u64);

/// A walking/hiking trail with an optional path geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    pub id: TrailId,
    pub name: String,

    /// County label as recorded by the importer, not derived spatially
    pub region: Option<String>,

    pub difficulty: Option<String>,
    pub length_km: Option<f64>,

    /// `[longitude, latitude]` of the trailhead
    pub start_point: Option<[f64; 2]>,

    /// LineString or MultiLineString; `None` excludes the trail from path predicates
    pub path: Option<Geometry>,
}

impl Trail {
    pub fn new(id: TrailId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            region: None,
            difficulty: None,
            length_km: None,
            start_point: None,
            path: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_start_point(mut self, lon: f64, lat: f64) -> Self {
        self.start_point = Some([lon, lat]);
        self
    }

    pub fn with_path(mut self, path: Geometry) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self
    }

    pub fn with_length_km(mut self, length_km: f64) -> Self {
        self.length_km = Some(length_km);
        self
    }

    /// Check if this trail takes part in path predicates
    pub fn has_path(&self) -> bool {
        self.path.is_some()
    }
}

/// Catalogue-wide trail figures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrailStatistics {
    pub total_trails: usize,

    /// Mean over trails that record a length, 0 when none do
    pub average_length_km: f64,

    pub easy_count: usize,
    pub moderate_count: usize,

    /// `hard` and `challenging` both count here
    pub hard_count: usize,
}

impl TrailStatistics {
    pub fn from_trails<'a>(trails: impl IntoIterator<Item = &'a Trail>) -> Self {
        let mut stats = Self::default();
        let mut lengths = Vec::new();

        for trail in trails {
            stats.total_trails += 1;
            if let Some(length) = trail.length_km {
                lengths.push(length);
            }

            let difficulty = trail.difficulty.as_deref().map(|d| d.trim().to_lowercase());
            match difficulty.as_deref() {
                Some("easy") => stats.easy_count += 1,
                Some("moderate") => stats.moderate_count += 1,
                Some("hard") | Some("challenging") => stats.hard_count += 1,
                _ => {}
            }
        }

        if !lengths.is_empty() {
            stats.average_length_km = lengths.iter().sum::<f64>() / lengths.len() as f64;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_statistics() {
        let trails = vec![
            Trail::new(TrailId(1), "Torc").with_difficulty("Easy").with_length_km(3.0),
            Trail::new(TrailId(2), "Carrauntoohil")
                .with_difficulty("challenging")
                .with_length_km(12.0),
            Trail::new(TrailId(3), "Kerry Way").with_difficulty("Hard"),
            Trail::new(TrailId(4), "Gap of Dunloe").with_difficulty("moderate"),
            Trail::new(TrailId(5), "Unrated"),
        ];

        let stats = TrailStatistics::from_trails(&trails);

        assert_eq!(stats.total_trails, 5);
        assert_eq!(stats.average_length_km, 7.5);
        assert_eq!(stats.easy_count, 1);
        assert_eq!(stats.moderate_count, 1);
        assert_eq!(stats.hard_count, 2);
    }

    #[test]
    fn test_trail_statistics_without_lengths() {
        let stats = TrailStatistics::from_trails(&[Trail::new(TrailId(1), "Loop")]);
        assert_eq!(stats.total_trails, 1);
        assert_eq!(stats.average_length_km, 0.0);
    }
}
