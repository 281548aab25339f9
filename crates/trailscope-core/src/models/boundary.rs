use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Geometry;
use crate::error::TrailscopeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoundaryId(pub u64);

impl fmt::Display for BoundaryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of reference geometry a boundary represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryCategory {
    County,
    Region,
    River,
    ProtectedArea,
    NationalPark,
    NatureReserve,
    Forest,
    MarineProtected,
}

impl BoundaryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryCategory::County => "county",
            BoundaryCategory::Region => "region",
            BoundaryCategory::River => "river",
            BoundaryCategory::ProtectedArea => "protected_area",
            BoundaryCategory::NationalPark => "national_park",
            BoundaryCategory::NatureReserve => "nature_reserve",
            BoundaryCategory::Forest => "forest",
            BoundaryCategory::MarineProtected => "marine_protected",
        }
    }
}

impl fmt::Display for BoundaryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoundaryCategory {
    type Err = TrailscopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "county" => Ok(BoundaryCategory::County),
            "region" => Ok(BoundaryCategory::Region),
            "river" => Ok(BoundaryCategory::River),
            "protected_area" => Ok(BoundaryCategory::ProtectedArea),
            "national_park" => Ok(BoundaryCategory::NationalPark),
            "nature_reserve" => Ok(BoundaryCategory::NatureReserve),
            "forest" => Ok(BoundaryCategory::Forest),
            "marine_protected" => Ok(BoundaryCategory::MarineProtected),
            other => Err(TrailscopeError::ConfigInvalid {
                key: "boundary_category".to_string(),
                reason: format!("unknown boundary category '{}'", other),
            }),
        }
    }
}

/// A named reference geometry (river line, park polygon, county polygon)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryEntity {
    pub id: BoundaryId,
    pub name: String,
    pub category: BoundaryCategory,
    pub geometry: Geometry,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parsing() {
        assert_eq!("river".parse::<BoundaryCategory>().unwrap(), BoundaryCategory::River);
        let park: BoundaryCategory = "National Park".parse().unwrap();
        assert_eq!(park, BoundaryCategory::NationalPark);
        let protected: BoundaryCategory = "protected-area".parse().unwrap();
        assert_eq!(protected, BoundaryCategory::ProtectedArea);
        assert!("ocean".parse::<BoundaryCategory>().is_err());
    }

    #[test]
    fn test_category_wire_format() {
        let json = serde_json::to_string(&BoundaryCategory::MarineProtected).unwrap();
        assert_eq!(json, "\"marine_protected\"");
    }
}
