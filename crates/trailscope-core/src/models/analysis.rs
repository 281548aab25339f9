use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Geometry, LocatedEntity};

/// Scalar filters applied to the selected polygon-search candidate set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchFilters {
    /// Keep entities whose population is at least this value
    #[serde(default)]
    pub min_population: Option<u64>,

    /// Keep entities whose country is one of these
    #[serde(default)]
    pub countries: Option<Vec<String>>,
}

impl MatchFilters {
    pub fn is_empty(&self) -> bool {
        self.min_population.unwrap_or(0) == 0
            && self.countries.as_ref().map(|c| c.is_empty()).unwrap_or(true)
    }

    /// Check whether an entity passes every configured filter.
    ///
    /// A zero population floor or an empty country list counts as "no filter".
    /// Entities without a population never pass a non-zero floor.
    pub fn accepts(&self, entity: &LocatedEntity) -> bool {
        if let Some(min) = self.min_population.filter(|m| *m > 0) {
            match entity.population {
                Some(population) if population >= min => {}
                _ => return false,
            }
        }

        if let Some(countries) = self.countries.as_ref().filter(|c| !c.is_empty()) {
            match &entity.country {
                Some(country) if countries.iter().any(|c| c == country) => {}
                _ => return false,
            }
        }

        true
    }
}

/// Audit record of one polygon search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolygonAnalysisRecord {
    pub id: Uuid,

    /// Raw payload as sent by the client, serialized JSON
    pub polygon_payload: String,

    /// Normalized polygon the predicates ran against
    pub polygon: Geometry,

    pub entity_count: usize,
    pub total_population: u64,
    pub average_population: f64,
    pub area_km2: f64,
    pub duration_ms: u64,
    pub session_key: Option<String>,
    pub client_ip: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Aggregates over the polygon search audit trail
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_analyses: usize,

    /// Records at or after the `since` cutoff the summary was built with
    pub analyses_since: usize,

    /// Mean entity count per search, 0 when the log is empty
    pub average_entity_count: f64,

    /// Mean search duration, 0 when the log is empty
    pub average_duration_ms: f64,
}

impl AnalysisSummary {
    pub fn from_records<'a>(
        records: impl IntoIterator<Item = &'a PolygonAnalysisRecord>,
        since: DateTime<Utc>,
    ) -> Self {
        let mut summary = Self::default();
        let mut entity_total = 0usize;
        let mut duration_total = 0u64;

        for record in records {
            summary.total_analyses += 1;
            if record.recorded_at >= since {
                summary.analyses_since += 1;
            }
            entity_total += record.entity_count;
            duration_total += record.duration_ms;
        }

        if summary.total_analyses > 0 {
            let n = summary.total_analyses as f64;
            summary.average_entity_count = entity_total as f64 / n;
            summary.average_duration_ms = duration_total as f64 / n;
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntityId, EntityKind};

    fn town(population: Option<u64>, country: Option<&str>) -> LocatedEntity {
        LocatedEntity {
            population,
            country: country.map(str::to_string),
            ..LocatedEntity::new(EntityId(1), EntityKind::Town, "Swords", -6.22, 53.46)
        }
    }

    #[test]
    fn test_empty_filters_accept_everything() {
        let filters = MatchFilters::default();
        assert!(filters.is_empty());
        assert!(filters.accepts(&town(None, None)));
    }

    #[test]
    fn test_population_floor() {
        let filters = MatchFilters { min_population: Some(1000), countries: None };
        assert!(filters.accepts(&town(Some(1000), None)));
        assert!(!filters.accepts(&town(Some(999), None)));
        assert!(!filters.accepts(&town(None, None)));
    }

    #[test]
    fn test_country_allow_list() {
        let filters = MatchFilters {
            min_population: None,
            countries: Some(vec!["Ireland".to_string()]),
        };
        assert!(filters.accepts(&town(Some(5), Some("Ireland"))));
        assert!(!filters.accepts(&town(Some(5), Some("France"))));
        assert!(!filters.accepts(&town(Some(5), None)));
    }

    fn record(entity_count: usize, duration_ms: u64, days_ago: i64) -> PolygonAnalysisRecord {
        PolygonAnalysisRecord {
            id: Uuid::new_v4(),
            polygon_payload: "[]".to_string(),
            polygon: Geometry::point(0.0, 0.0),
            entity_count,
            total_population: 0,
            average_population: 0.0,
            area_km2: 0.0,
            duration_ms,
            session_key: None,
            client_ip: None,
            recorded_at: Utc::now() - chrono::Duration::days(days_ago),
        }
    }

    #[test]
    fn test_analysis_summary() {
        let records = vec![record(4, 10, 0), record(2, 30, 3), record(0, 20, 30)];
        let since = Utc::now() - chrono::Duration::days(7);

        let summary = AnalysisSummary::from_records(&records, since);

        assert_eq!(summary.total_analyses, 3);
        assert_eq!(summary.analyses_since, 2);
        assert_eq!(summary.average_entity_count, 2.0);
        assert_eq!(summary.average_duration_ms, 20.0);
    }

    #[test]
    fn test_empty_analysis_summary() {
        let records: Vec<PolygonAnalysisRecord> = Vec::new();
        let summary = AnalysisSummary::from_records(&records, Utc::now());
        assert_eq!(summary, AnalysisSummary::default());
    }

    #[test]
    fn test_filters_deserialize_partial() {
        let filters: MatchFilters = serde_json::from_str(r#"{"min_population": 500}"#).unwrap();
        assert_eq!(filters.min_population, Some(500));
        assert!(filters.countries.is_none());
    }
}
