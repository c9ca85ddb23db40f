use crate::error::{Error, Result};

/// Default raster sizes shipped by raster styles, largest first
pub const DEFAULT_RASTER_SIZES: [u32; 3] = [144, 72, 60];

/// Raster sizes available on disk, strictly descending and never empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterLadder {
    sizes: Vec<u32>,
}

/// Outcome of picking a source size for a requested size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeChoice {
    /// Ladder entry the glyph files are read from
    pub source: u32,
    /// Display size after clamping to what the ladder can supply
    pub effective: u32,
}

impl RasterLadder {
    pub fn new(sizes: Vec<u32>) -> Result<Self> {
        if sizes.is_empty() {
            return Err(Error::InvalidLadder("no raster sizes given".to_string()));
        }
        if sizes.contains(&0) {
            return Err(Error::InvalidLadder("raster sizes must be positive".to_string()));
        }
        if sizes.windows(2).any(|pair| pair[0] <= pair[1]) {
            return Err(Error::InvalidLadder(format!(
                "raster sizes must be strictly descending, got {:?}",
                sizes
            )));
        }
        Ok(Self { sizes })
    }

    pub fn sizes(&self) -> &[u32] {
        &self.sizes
    }

    pub fn largest(&self) -> u32 {
        self.sizes[0]
    }

    pub fn smallest(&self) -> u32 {
        self.sizes[self.sizes.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Pick the source size for `effective`
    ///
    /// Inline images only scale down, so the smallest entry that is at least
    /// the requested size wins. Requests above the ladder are clamped to the
    /// largest entry; requests no entry can serve fall back to the smallest.
    pub fn select(&self, effective: u32) -> SizeChoice {
        let effective = effective.min(self.largest());
        let source = self
            .sizes
            .iter()
            .rev()
            .copied()
            .find(|&size| size >= effective)
            .unwrap_or_else(|| self.smallest());

        SizeChoice {
            source,
            effective: effective.min(source),
        }
    }
}

impl Default for RasterLadder {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_RASTER_SIZES.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rejects_bad_ladders() {
        assert!(RasterLadder::new(vec![]).is_err());
        assert!(RasterLadder::new(vec![60, 72]).is_err());
        assert!(RasterLadder::new(vec![72, 72]).is_err());
        assert!(RasterLadder::new(vec![72, 0]).is_err());
        assert!(RasterLadder::new(vec![160, 72]).is_ok());
    }

    #[test]
    fn test_select_exact_entry() {
        let ladder = RasterLadder::default();
        assert_eq!(ladder.select(72), SizeChoice { source: 72, effective: 72 });
        assert_eq!(ladder.select(60), SizeChoice { source: 60, effective: 60 });
    }

    #[test]
    fn test_select_rounds_up_to_next_entry() {
        let ladder = RasterLadder::default();
        assert_eq!(ladder.select(61), SizeChoice { source: 72, effective: 61 });
        assert_eq!(ladder.select(28), SizeChoice { source: 60, effective: 28 });
        assert_eq!(ladder.select(100), SizeChoice { source: 144, effective: 100 });
    }

    #[test]
    fn test_select_clamps_oversized_requests() {
        let ladder = RasterLadder::default();
        assert_eq!(ladder.select(500), SizeChoice { source: 144, effective: 144 });
    }

    #[test]
    fn test_largest_and_smallest() {
        let ladder = RasterLadder::new(vec![160, 120, 60]).unwrap();
        assert_eq!(ladder.largest(), 160);
        assert_eq!(ladder.smallest(), 60);
        assert_eq!(ladder.len(), 3);
    }

    proptest! {
        #[test]
        fn prop_source_is_on_ladder_and_covers_effective(requested in 0u32..1000) {
            let ladder = RasterLadder::default();
            let choice = ladder.select(requested);
            prop_assert!(ladder.sizes().contains(&choice.source));
            prop_assert!(choice.source >= choice.effective);
            prop_assert!(choice.effective <= ladder.largest());
        }

        #[test]
        fn prop_selection_is_monotonic(a in 0u32..400, b in 0u32..400) {
            let ladder = RasterLadder::default();
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(ladder.select(low).source <= ladder.select(high).source);
        }
    }
}
