use tracing::{debug, warn};

use crate::fringe_pipeline::common::error::{FringeError, Result};
use crate::fringe_pipeline::grid::PixelGrid;
use crate::fringe_pipeline::regions::mask::{MaskMode, RegionMask};
use crate::fringe_pipeline::regions::types::Region;

/// A bright region and the dark region that follows it in file order.
#[derive(Debug, Clone, Copy)]
pub struct RegionPair<'a> {
    pub bright: &'a RegionMask,
    pub dark: &'a RegionMask,
}

/// Region masks with the positional bright/dark convention applied.
///
/// Region `2k` is bright and region `2k + 1` is its dark partner. With an odd
/// count the last region has no partner: it is kept but never used by either
/// statistic.
#[derive(Debug, Clone)]
pub struct RegionSet {
    masks: Vec<RegionMask>,
}

impl RegionSet {
    pub fn new(regions: &[Region], mode: MaskMode) -> Result<Self> {
        if regions.is_empty() {
            return Err(FringeError::EmptyRegionSet("no regions defined".to_string()));
        }
        if regions.len() < 2 {
            return Err(FringeError::EmptyRegionSet(
                "a single region cannot form a bright/dark pair".to_string(),
            ));
        }
        if regions.len() % 2 == 1 {
            warn!(
                count = regions.len(),
                "Odd region count, the last region has no dark partner and is ignored"
            );
        }

        let masks: Vec<RegionMask> = regions
            .iter()
            .enumerate()
            .map(|(index, region)| RegionMask::from_region(index, region, mode))
            .collect();

        debug!(regions = masks.len(), pairs = masks.len() / 2, ?mode, "Built region masks");
        Ok(Self { masks })
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    pub fn masks(&self) -> &[RegionMask] {
        &self.masks
    }

    pub fn pair_count(&self) -> usize {
        self.masks.len() / 2
    }

    pub fn pairs(&self) -> impl Iterator<Item = RegionPair<'_>> {
        self.masks.chunks_exact(2).map(|pair| RegionPair {
            bright: &pair[0],
            dark: &pair[1],
        })
    }

    /// The odd-indexed (dark) masks.
    pub fn dark_masks(&self) -> impl Iterator<Item = &RegionMask> {
        self.pairs().map(|pair| pair.dark)
    }

    pub fn unpaired(&self) -> Option<&RegionMask> {
        self.masks.chunks_exact(2).remainder().first()
    }

    /// Checks every mask, including an unpaired one, against the grid bounds.
    pub fn check_bounds(&self, grid: &PixelGrid) -> Result<()> {
        self.masks.iter().try_for_each(|mask| mask.check_bounds(grid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fringe_pipeline::regions::types::RegionShape;

    fn circle(x: f64) -> Region {
        Region::new(RegionShape::Circle { x, y: 5.0, radius: 1.0 })
    }

    #[test]
    fn test_empty_region_set() {
        let err = RegionSet::new(&[], MaskMode::Center).unwrap_err();
        assert!(matches!(err, FringeError::EmptyRegionSet(_)));
    }

    #[test]
    fn test_single_region_has_no_pairs() {
        let err = RegionSet::new(&[circle(2.0)], MaskMode::Center).unwrap_err();
        assert!(matches!(err, FringeError::EmptyRegionSet(_)));
    }

    #[test]
    fn test_pairs_follow_file_order() {
        let regions: Vec<Region> = (0..4).map(|i| circle(2.0 + 3.0 * i as f64)).collect();
        let set = RegionSet::new(&regions, MaskMode::Center).unwrap();
        let indices: Vec<(usize, usize)> = set
            .pairs()
            .map(|pair| (pair.bright.index(), pair.dark.index()))
            .collect();
        assert_eq!(indices, vec![(0, 1), (2, 3)]);
        let dark: Vec<usize> = set.dark_masks().map(RegionMask::index).collect();
        assert_eq!(dark, vec![1, 3]);
        assert!(set.unpaired().is_none());
    }

    #[test]
    fn test_odd_count_drops_last_region() {
        let regions: Vec<Region> = (0..3).map(|i| circle(2.0 + 3.0 * i as f64)).collect();
        let set = RegionSet::new(&regions, MaskMode::Center).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.pair_count(), 1);
        assert_eq!(set.unpaired().map(RegionMask::index), Some(2));
        let dark: Vec<usize> = set.dark_masks().map(RegionMask::index).collect();
        assert_eq!(dark, vec![1]);
    }

    #[test]
    fn test_oversized_region_is_out_of_bounds() {
        let huge = Region::new(RegionShape::Circle { x: 5.0, y: 5.0, radius: 1e10 });
        let endless = Region::new(RegionShape::Circle { x: 5.0, y: 5.0, radius: f64::INFINITY });
        let set = RegionSet::new(&[circle(2.0), huge, endless], MaskMode::default()).unwrap();
        let grid = PixelGrid::filled(10, 10, 0.0).unwrap();
        assert!(matches!(
            set.check_bounds(&grid),
            Err(FringeError::OutOfBounds { index: 1, .. })
        ));
    }

    #[test]
    fn test_bounds_include_unpaired_region() {
        let regions = vec![circle(2.0), circle(5.0), circle(30.0)];
        let set = RegionSet::new(&regions, MaskMode::Center).unwrap();
        let grid = PixelGrid::filled(10, 10, 0.0).unwrap();
        assert!(matches!(
            set.check_bounds(&grid),
            Err(FringeError::OutOfBounds { index: 2, .. })
        ));
    }
}
