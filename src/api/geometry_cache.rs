use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{EmptyPointMode, PixelPoint, PointGeometry, SeriesGeometry};

/// Side table of per-point geometry keyed by series id.
///
/// Filled by the engine after every layout pass; builders never write into
/// series. Iteration follows series order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointGeometryCache {
    entries: IndexMap<String, Vec<PointGeometry>>,
}

impl PointGeometryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the points of `geometry`, replacing any previous entry.
    pub fn insert(&mut self, geometry: &SeriesGeometry) {
        self.entries
            .insert(geometry.series_id.clone(), geometry.points.clone());
    }

    #[must_use]
    pub fn get(&self, series_id: &str) -> Option<&[PointGeometry]> {
        self.entries.get(series_id).map(Vec::as_slice)
    }

    #[must_use]
    pub fn point(&self, series_id: &str, index: usize) -> Option<&PointGeometry> {
        self.get(series_id)?
            .iter()
            .find(|point| point.index == index)
    }

    /// Run number and vertex offset of point `index` within the paths of the
    /// last pass. Hidden points split runs unless `mode` is `Drop`; a hidden
    /// point itself has no vertex.
    #[must_use]
    pub fn run_position(&self, series_id: &str, index: usize, mode: EmptyPointMode) -> Option<(usize, usize)> {
        let mut run = 0;
        let mut offset = 0;
        for point in self.get(series_id)? {
            if point.visible {
                if point.index == index {
                    return Some((run, offset));
                }
                offset += 1;
            } else if point.index == index {
                return None;
            } else if mode != EmptyPointMode::Drop && offset > 0 {
                run += 1;
                offset = 0;
            }
        }
        None
    }

    pub fn remove(&mut self, series_id: &str) -> Option<Vec<PointGeometry>> {
        self.entries.shift_remove(series_id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PointGeometry])> {
        self.entries
            .iter()
            .map(|(id, points)| (id.as_str(), points.as_slice()))
    }

    /// Visible point whose hit region contains `pixel`, searching series in
    /// reverse order so the topmost series wins.
    #[must_use]
    pub fn hit_test(&self, pixel: PixelPoint) -> Option<(&str, &PointGeometry)> {
        self.entries.iter().rev().find_map(|(id, points)| {
            points
                .iter()
                .filter(|point| point.visible)
                .find(|point| point.regions.iter().any(|region| region.contains(pixel)))
                .map(|point| (id.as_str(), point))
        })
    }
}
