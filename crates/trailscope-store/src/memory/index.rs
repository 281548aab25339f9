use rstar::{PointDistance, RTree, RTreeObject, AABB};
use trailscope_core::models::EntityId;

/// Indexed entity location
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedPoint {
    /// Entity owning this location
    pub id: EntityId,

    /// `[longitude, latitude]`
    pub position: [f64; 2],
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for IndexedPoint {
    // Squared planar distance in degrees, the same ordering PostGIS `<->` uses on geometry columns
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        dx * dx + dy * dy
    }
}

/// R-tree over entity locations
#[derive(Debug, Default)]
pub struct PointIndex {
    tree: RTree<IndexedPoint>,
}

impl PointIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a batch of locations
    pub fn from_points(points: Vec<(EntityId, [f64; 2])>) -> Self {
        let indexed: Vec<IndexedPoint> =
            points.into_iter().map(|(id, position)| IndexedPoint { id, position }).collect();

        Self { tree: RTree::bulk_load(indexed) }
    }

    /// Insert a location
    pub fn insert(&mut self, id: EntityId, position: [f64; 2]) {
        self.tree.insert(IndexedPoint { id, position });
    }

    /// Remove the location of an entity, returning it if present
    pub fn remove(&mut self, id: EntityId) -> Option<[f64; 2]> {
        let to_remove = self.tree.iter().find(|p| p.id == id).cloned()?;
        self.tree.remove(&to_remove).map(|p| p.position)
    }

    /// Entities inside the rectangle, edges included
    pub fn query_bbox(&self, min: [f64; 2], max: [f64; 2]) -> Vec<EntityId> {
        let bbox = AABB::from_corners(min, max);
        self.tree.locate_in_envelope(&bbox).map(|p| p.id).collect()
    }

    /// The k entities nearest to a point, nearest first
    pub fn query_k_nearest(&self, point: [f64; 2], k: usize) -> Vec<EntityId> {
        self.tree.nearest_neighbor_iter(&point).take(k).map(|p| p.id).collect()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PointIndex {
        PointIndex::from_points(vec![
            (EntityId(1), [-6.26, 53.35]),  // Dublin
            (EntityId(2), [-8.47, 51.90]),  // Cork
            (EntityId(3), [-9.06, 53.27]),  // Galway
            (EntityId(4), [-6.22, 53.46]),  // Swords
        ])
    }

    #[test]
    fn test_query_bbox() {
        let index = sample();
        let mut ids = index.query_bbox([-6.5, 53.0], [-6.0, 53.5]);
        ids.sort();

        assert_eq!(ids, vec![EntityId(1), EntityId(4)]);
    }

    #[test]
    fn test_query_bbox_includes_edges() {
        let index = sample();
        let ids = index.query_bbox([-6.26, 53.35], [-6.0, 53.40]);

        assert_eq!(ids, vec![EntityId(1)]);
    }

    #[test]
    fn test_query_k_nearest_orders_by_distance() {
        let index = sample();
        let ids = index.query_k_nearest([-6.25, 53.40], 3);

        assert_eq!(ids, vec![EntityId(1), EntityId(4), EntityId(2)]);
    }

    #[test]
    fn test_insert_and_remove() {
        let mut index = PointIndex::new();
        assert!(index.is_empty());

        index.insert(EntityId(7), [0.5, 0.5]);
        assert_eq!(index.len(), 1);

        assert_eq!(index.remove(EntityId(7)), Some([0.5, 0.5]));
        assert_eq!(index.remove(EntityId(7)), None);
        assert!(index.is_empty());
    }
}
