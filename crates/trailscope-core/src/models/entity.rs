use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TrailscopeError;

/// Unique identifier for a point-bearing entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which layer of point data an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    #[default]
    Town,
    City,
    PointOfInterest,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Town => "town",
            EntityKind::City => "city",
            EntityKind::PointOfInterest => "point_of_interest",
        }
    }
}

impl FromStr for EntityKind {
    type Err = TrailscopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "town" => Ok(EntityKind::Town),
            "city" => Ok(EntityKind::City),
            "point_of_interest" | "poi" => Ok(EntityKind::PointOfInterest),
            other => Err(TrailscopeError::ConfigInvalid {
                key: "entity_kind".to_string(),
                reason: format!("unknown entity kind '{}'", other),
            }),
        }
    }
}

/// A point-bearing record (town, city, point of interest).
///
/// Read-only from the query layer's point of view; the import jobs that
/// populate the store own its lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatedEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub name: String,

    /// `[longitude, latitude]`
    pub location: [f64; 2],

    pub population: Option<u64>,
    pub country: Option<String>,

    /// County or region label
    pub region: Option<String>,

    /// Town type for settlements, POI type for points of interest
    pub category: Option<String>,

    pub area_km2: Option<f64>,
}

impl LocatedEntity {
    pub fn new(
        id: EntityId,
        kind: EntityKind,
        name: impl Into<String>,
        lon: f64,
        lat: f64,
    ) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            location: [lon, lat],
            population: None,
            country: None,
            region: None,
            category: None,
            area_km2: None,
        }
    }

    pub fn with_population(mut self, population: u64) -> Self {
        self.population = Some(population);
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn longitude(&self) -> f64 {
        self.location[0]
    }

    pub fn latitude(&self) -> f64 {
        self.location[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("City".parse::<EntityKind>().unwrap(), EntityKind::City);
        assert_eq!("poi".parse::<EntityKind>().unwrap(), EntityKind::PointOfInterest);
        assert_eq!("point-of-interest".parse::<EntityKind>().unwrap(), EntityKind::PointOfInterest);
        assert!("village".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_builder_sets_attributes() {
        let town = LocatedEntity::new(EntityId(3), EntityKind::Town, "Kilkenny", -7.25, 52.65)
            .with_population(26_512)
            .with_country("Ireland");

        assert_eq!(town.longitude(), -7.25);
        assert_eq!(town.latitude(), 52.65);
        assert_eq!(town.population, Some(26_512));
        assert_eq!(town.country.as_deref(), Some("Ireland"));
    }
}
