//! Resting positions for the shade.
//!
//! An [`AnchorSet`] is an immutable, sorted snapshot of distinct offsets. All
//! queries are pure; the coordinator swaps in a new snapshot whenever the
//! host reconfigures anchors.

/// Lowest and highest anchor offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorLimits {
    pub min: f32,
    pub max: f32,
}

impl AnchorLimits {
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Sorted, de-duplicated set of anchor offsets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnchorSet {
    offsets: Vec<f32>,
}

impl AnchorSet {
    /// Build a set from arbitrary offsets. Duplicates collapse and non-finite
    /// values are dropped.
    pub fn new(offsets: impl IntoIterator<Item = f32>) -> Self {
        let mut offsets: Vec<f32> = offsets.into_iter().filter(|o| o.is_finite()).collect();
        offsets.sort_by(f32::total_cmp);
        offsets.dedup();
        Self { offsets }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Offsets in ascending order.
    pub fn as_slice(&self) -> &[f32] {
        &self.offsets
    }

    /// `None` when the set is empty.
    pub fn limits(&self) -> Option<AnchorLimits> {
        match (self.offsets.first(), self.offsets.last()) {
            (Some(&min), Some(&max)) => Some(AnchorLimits { min, max }),
            _ => None,
        }
    }

    /// The anchor closest to `target`. Equidistant anchors resolve to the
    /// smaller (topmost) offset.
    pub fn nearest(&self, target: f32) -> Option<f32> {
        let mut best: Option<(f32, f32)> = None;
        for &offset in &self.offsets {
            let distance = (offset - target).abs();
            match best {
                // Ascending iteration: keeping the first minimum favors the smaller offset.
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((offset, distance)),
            }
        }
        best.map(|(offset, _)| offset)
    }

    /// The anchor adjacent to `anchor` in the direction of `direction`'s sign
    /// (positive = toward larger offsets). Clamps at the ends without
    /// wrapping; a zero direction returns `anchor` itself.
    ///
    /// Returns `None` when `anchor` is not a member of the set.
    pub fn neighbor(&self, anchor: f32, direction: f32) -> Option<f32> {
        let index = self.offsets.iter().position(|&o| o == anchor)?;
        let last = self.offsets.len() - 1;
        let next = if direction > 0.0 {
            (index + 1).min(last)
        } else if direction < 0.0 {
            index.saturating_sub(1)
        } else {
            index
        };
        Some(self.offsets[next])
    }
}

impl From<Vec<f32>> for AnchorSet {
    fn from(offsets: Vec<f32>) -> Self {
        Self::new(offsets)
    }
}

impl<const N: usize> From<[f32; N]> for AnchorSet {
    fn from(offsets: [f32; N]) -> Self {
        Self::new(offsets)
    }
}

impl FromIterator<f32> for AnchorSet {
    fn from_iter<I: IntoIterator<Item = f32>>(iter: I) -> Self {
        Self::new(iter)
    }
}
