use crate::engine::geometry::{Point, Rect};
use std::fmt;

/// Stable handle to a region. Handles are never reused, so a handle kept
/// across a `clear` simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(u64);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One tracked correction candidate.
///
/// `[from, to)` always spans exactly the characters of `replacement` in the
/// current buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    id: RegionId,
    from: usize,
    to: usize,
    source: String,
    replacement: String,
    alternatives: Vec<String>,
    message: Option<String>,
    bounds: Option<Rect>,
}

impl Region {
    /// A region whose replacement starts at `from` in the current buffer.
    pub fn new(
        from: usize,
        source: impl Into<String>,
        replacement: impl Into<String>,
        alternatives: Vec<String>,
    ) -> Self {
        let replacement = replacement.into();
        Self {
            id: RegionId(0),
            from,
            to: from + replacement.chars().count(),
            source: source.into(),
            replacement,
            alternatives,
            message: None,
            bounds: None,
        }
    }

    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }

    pub fn id(&self) -> RegionId {
        self.id
    }

    pub fn from(&self) -> usize {
        self.from
    }

    pub fn to(&self) -> usize {
        self.to
    }

    pub fn len(&self) -> usize {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    /// Text that occupied the span before any correction.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Text currently filling the span.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn alternatives(&self) -> &[String] {
        &self.alternatives
    }

    /// Explanation supplied by the analyzer, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Cached document-local box; `None` until the first resync.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// Every selectable text for this region: the source first, then the
    /// analyzer's alternatives.
    pub fn choices(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.source.as_str()).chain(self.alternatives.iter().map(String::as_str))
    }

    pub(crate) fn set_replacement(&mut self, replacement: &str) {
        self.replacement = replacement.to_string();
        self.to = self.from + replacement.chars().count();
    }

    pub(crate) fn shift(&mut self, delta: isize) {
        self.from = self.from.saturating_add_signed(delta);
        self.to = self.to.saturating_add_signed(delta);
    }

    pub(crate) fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = Some(bounds);
    }
}

/// Regions of the current document, ordered by `from`.
#[derive(Debug, Default)]
pub struct RegionStore {
    regions: Vec<Region>,
    next_id: u64,
}

impl RegionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// Track `region`, keeping the store ordered. Regions starting at the
    /// same position keep their insertion order.
    pub fn insert(&mut self, mut region: Region) -> RegionId {
        self.next_id += 1;
        region.id = RegionId(self.next_id);
        let at = self.regions.partition_point(|r| r.from <= region.from);
        self.regions.insert(at, region);
        RegionId(self.next_id)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    pub fn as_slice(&self) -> &[Region] {
        &self.regions
    }

    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.index_of(id).map(|index| &self.regions[index])
    }

    pub(crate) fn index_of(&self, id: RegionId) -> Option<usize> {
        self.regions.iter().position(|r| r.id == id)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> &mut Region {
        &mut self.regions[index]
    }

    /// Regions from `index` to the end, in order.
    pub(crate) fn tail_mut(&mut self, index: usize) -> &mut [Region] {
        &mut self.regions[index..]
    }

    /// Regions whose cached box contains a document-local point.
    pub fn find_by_point(&self, point: Point) -> Vec<&Region> {
        self.regions
            .iter()
            .filter(|r| r.bounds.is_some_and(|b| b.contains(point)))
            .collect()
    }
}

impl<'a> IntoIterator for &'a RegionStore {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_span_tracks_replacement() {
        let mut region = Region::new(4, "cat", "dog", vec!["dog".into(), "hound".into()]);
        assert_eq!((region.from(), region.to()), (4, 7));

        region.set_replacement("hound");
        assert_eq!((region.from(), region.to()), (4, 9));
        assert_eq!(region.len(), "hound".len());

        region.shift(-2);
        assert_eq!((region.from(), region.to()), (2, 7));
    }

    #[test]
    fn test_choices_start_with_source() {
        let region = Region::new(0, "teh", "the", vec!["the".into(), "tea".into()]);
        let choices: Vec<_> = region.choices().collect();
        assert_eq!(choices, vec!["teh", "the", "tea"]);
    }

    #[test]
    fn test_store_keeps_order() {
        let mut store = RegionStore::new();
        let late = store.insert(Region::new(10, "b", "b", vec![]));
        let early = store.insert(Region::new(2, "a", "a", vec![]));

        let order: Vec<_> = store.iter().map(Region::id).collect();
        assert_eq!(order, vec![early, late]);
        assert_eq!(store.get(late).map(Region::from), Some(10));
    }

    #[test]
    fn test_clear_invalidates_handles() {
        let mut store = RegionStore::new();
        let id = store.insert(Region::new(0, "teh", "the", vec![]));
        store.clear();
        assert!(store.is_empty());

        let fresh = store.insert(Region::new(0, "teh", "the", vec![]));
        assert_ne!(id, fresh);
        assert!(store.get(id).is_none());
    }

    #[test]
    fn test_find_by_point_skips_unplaced_regions() {
        let mut store = RegionStore::new();
        let placed = store.insert(Region::new(0, "teh", "the", vec![]));
        store.insert(Region::new(4, "cat", "cat", vec![]));
        store.get_mut(0).set_bounds(Rect {
            x: 0.0,
            y: 0.0,
            width: 3.0,
            height: 1.0,
        });

        let hits: Vec<_> = store.find_by_point(Point::new(1.5, 0.5)).iter().map(|r| r.id()).collect();
        assert_eq!(hits, vec![placed]);
        assert!(store.find_by_point(Point::new(5.0, 0.5)).is_empty());
    }
}
