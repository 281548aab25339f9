use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;
use trailscope_core::config::CliConfigOverrides;
use trailscope_store::memory::FixturePaths;

/// Trailscope - spatial queries over trails, towns and boundaries
#[derive(Parser, Debug)]
#[command(name = "trailscope")]
#[command(about = "Spatial queries over trails, towns and boundaries", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Storage backend to use (memory or postgres)
    #[arg(long, global = true, default_value = "memory")]
    pub storage: StorageBackend,

    /// TOML file layered over the query defaults
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub fixtures: FixtureArgs,

    #[command(flatten)]
    pub overrides: OverrideArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Storage backend selection
#[derive(Debug, Clone, clap::ValueEnum)]
pub enum StorageBackend {
    /// In-memory storage seeded from GeoJSON fixtures (default)
    Memory,
    /// PostgreSQL with PostGIS, configured by DATABASE_URL
    Postgres,
}

/// GeoJSON FeatureCollections seeding the memory backend
#[derive(clap::Args, Debug, Default)]
pub struct FixtureArgs {
    /// Cities searched by polygon queries
    #[arg(long, global = true, value_name = "FILE")]
    pub cities: Option<PathBuf>,

    /// Towns used by nearest-town lookups
    #[arg(long, global = true, value_name = "FILE")]
    pub towns: Option<PathBuf>,

    /// Points of interest
    #[arg(long, global = true, value_name = "FILE")]
    pub pois: Option<PathBuf>,

    /// Trails with start points and paths
    #[arg(long, global = true, value_name = "FILE")]
    pub trails: Option<PathBuf>,

    /// Boundaries (rivers, parks, counties) with a `category` property
    #[arg(long, global = true, value_name = "FILE")]
    pub boundaries: Option<PathBuf>,
}

impl FixtureArgs {
    pub fn to_paths(&self) -> FixturePaths {
        FixturePaths {
            cities: self.cities.clone(),
            towns: self.towns.clone(),
            pois: self.pois.clone(),
            trails: self.trails.clone(),
            boundaries: self.boundaries.clone(),
        }
    }
}

/// Query settings overriding file and environment values
#[derive(clap::Args, Debug, Default)]
pub struct OverrideArgs {
    /// Per-predicate timeout in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    pub predicate_timeout_ms: Option<u64>,

    /// Skip writing polygon search audit records
    #[arg(long, global = true)]
    pub no_audit: bool,
}

impl OverrideArgs {
    pub fn to_overrides(&self) -> CliConfigOverrides {
        CliConfigOverrides {
            predicate_timeout_ms: self.predicate_timeout_ms,
            audit_enabled: self.no_audit.then_some(false),
            ..Default::default()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the canonical closed ring for a polygon payload
    Normalize(NormalizeArgs),

    /// Find cities inside a polygon
    Search(SearchArgs),

    /// Find the nearest town to a point
    Nearest(PointArgs),

    /// Find trails starting within a radius of a point
    Radius(RadiusArgs),

    /// Find points of interest within a radius of a point
    Pois(PoiArgs),

    /// Find trails starting inside a bounding box
    Bbox(BboxArgs),

    /// Find trails crossing or inside a boundary
    Crossing(CrossingArgs),

    /// Trail totals, average length and difficulty counts
    Stats,

    /// Polygon search audit summary and latest searches
    Analytics(AnalyticsArgs),

    /// Show the resolved query configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct NormalizeArgs {
    /// JSON file holding the polygon payload
    pub payload: PathBuf,
}

#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// JSON file holding the polygon payload
    pub payload: PathBuf,

    /// Keep cities with at least this population
    #[arg(long)]
    pub min_population: Option<u64>,

    /// Keep cities in this country (repeatable)
    #[arg(long = "country", value_name = "COUNTRY")]
    pub countries: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct PointArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
}

#[derive(Parser, Debug)]
pub struct RadiusArgs {
    #[command(flatten)]
    pub point: PointArgs,

    /// Search radius in kilometers (defaults to trail_radius_km)
    #[arg(long)]
    pub radius_km: Option<f64>,
}

#[derive(Parser, Debug)]
pub struct PoiArgs {
    #[command(flatten)]
    pub point: PointArgs,

    /// Search radius in kilometers (defaults to poi_radius_km)
    #[arg(long)]
    pub radius_km: Option<f64>,

    /// Only this POI type, case-insensitive
    #[arg(long = "type", value_name = "TYPE")]
    pub poi_type: Option<String>,
}

#[derive(Parser, Debug)]
pub struct BboxArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub min_lon: f64,

    #[arg(long, allow_negative_numbers = true)]
    pub min_lat: f64,

    #[arg(long, allow_negative_numbers = true)]
    pub max_lon: f64,

    #[arg(long, allow_negative_numbers = true)]
    pub max_lat: f64,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("target").required(true).args(["id", "name"])))]
pub struct CrossingArgs {
    /// Boundary ID
    #[arg(long)]
    pub id: Option<u64>,

    /// Boundary name, matched case-insensitively
    #[arg(long, requires = "category")]
    pub name: Option<String>,

    /// Boundary category (county, region, river, protected_area, national_park, ...)
    #[arg(long, requires = "name")]
    pub category: Option<String>,
}

#[derive(Parser, Debug)]
pub struct AnalyticsArgs {
    /// How many of the latest searches to list
    #[arg(long, default_value_t = 10)]
    pub recent: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_radius_with_negative_longitude() {
        let cli = Cli::try_parse_from([
            "trailscope", "radius", "--lat", "52.06", "--lon", "-9.51", "--radius-km", "10",
        ])
        .unwrap();

        match cli.command {
            Commands::Radius(args) => {
                assert_eq!(args.point.lon, -9.51);
                assert_eq!(args.radius_km, Some(10.0));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_search_repeats_country() {
        let cli = Cli::try_parse_from([
            "trailscope", "search", "area.json", "--country", "Ireland", "--country", "France",
        ])
        .unwrap();

        let Commands::Search(args) = cli.command else { panic!("expected search") };
        assert_eq!(args.countries, vec!["Ireland", "France"]);
    }

    #[test]
    fn test_crossing_requires_target() {
        assert!(Cli::try_parse_from(["trailscope", "crossing"]).is_err());
        assert!(Cli::try_parse_from(["trailscope", "crossing", "--name", "Kerry"]).is_err());
        assert!(Cli::try_parse_from([
            "trailscope", "crossing", "--name", "Kerry", "--category", "county"
        ])
        .is_ok());
        assert!(Cli::try_parse_from(["trailscope", "crossing", "--id", "3"]).is_ok());
    }

    #[test]
    fn test_analytics_recent_default() {
        let cli = Cli::try_parse_from(["trailscope", "analytics"]).unwrap();

        let Commands::Analytics(args) = cli.command else { panic!("expected analytics") };
        assert_eq!(args.recent, 10);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "trailscope", "nearest", "--lat", "53.3", "--lon", "-6.2", "--json", "--no-audit",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(cli.overrides.to_overrides().audit_enabled, Some(false));
    }
}
