//! Trails crossing or lying within a boundary geometry.

use std::sync::Arc;
use trailscope_core::error::{Result, TrailscopeError};
use trailscope_core::models::{
    BoundaryCategory, BoundaryEntity, BoundaryId, SpatialFilter, SpatialPredicate,
};
use trailscope_store::ports::{BoundaryStore, TrailStore};

use crate::models::{BoundaryMatch, BoundarySummary, MatchKind};
use crate::observer::{MatchObserver, TracingObserver};

/// Boundary query over boundary and trail stores
pub struct BoundaryQuery {
    boundaries: Arc<dyn BoundaryStore>,
    trails: Arc<dyn TrailStore>,
    observer: Arc<dyn MatchObserver>,
}

impl BoundaryQuery {
    pub fn new(boundaries: Arc<dyn BoundaryStore>, trails: Arc<dyn TrailStore>) -> Self {
        Self { boundaries, trails, observer: Arc::new(TracingObserver) }
    }

    pub fn with_observer(mut self, observer: Arc<dyn MatchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Trails crossing and within the boundary with this ID.
    ///
    /// # Errors
    ///
    /// [`TrailscopeError::BoundaryNotFound`] for an unknown ID.
    pub async fn by_id(&self, id: BoundaryId) -> Result<BoundaryMatch> {
        let boundary = self.boundaries.get_boundary(id).await?.ok_or_else(|| {
            TrailscopeError::BoundaryNotFound { lookup: format!("id {}", id) }
        })?;

        self.spatial_match(&boundary).await
    }

    /// Trails crossing and within the named boundary.
    ///
    /// When no boundary of that name exists in the category, trails whose
    /// own region label equals `name` are returned instead, tagged
    /// [`MatchKind::LabelFallback`]. Both sets then hold the label matches.
    pub async fn by_name(&self, name: &str, category: BoundaryCategory) -> Result<BoundaryMatch> {
        match self.boundaries.find_boundary(name, category).await? {
            Some(boundary) => self.spatial_match(&boundary).await,
            None => {
                self.observer.label_fallback(name);
                let labelled = self.trails.trails_by_region(name).await?;

                Ok(BoundaryMatch {
                    boundary: None,
                    crossing: labelled.clone(),
                    within: labelled,
                    match_kind: MatchKind::LabelFallback,
                })
            }
        }
    }

    async fn spatial_match(&self, boundary: &BoundaryEntity) -> Result<BoundaryMatch> {
        let crossing_filter =
            SpatialFilter::new(SpatialPredicate::Intersects).geometry(boundary.geometry.clone());
        let within_filter =
            SpatialFilter::new(SpatialPredicate::Within).geometry(boundary.geometry.clone());

        let (crossing, within) = tokio::try_join!(
            self.trails.trails_by_path(&crossing_filter),
            self.trails.trails_by_path(&within_filter),
        )?;

        tracing::debug!(
            boundary = %boundary.name,
            category = boundary.category.as_str(),
            crossing = crossing.len(),
            within = within.len(),
            "Boundary query completed"
        );

        Ok(BoundaryMatch {
            boundary: Some(BoundarySummary::from(boundary)),
            crossing,
            within,
            match_kind: MatchKind::Spatial,
        })
    }
}
