use crate::engine::geometry::{FontMetrics, LayoutCursor, MonospaceMetrics, Point, Viewport};
use crate::engine::region::{Region, RegionId, RegionStore};
use crate::engine::rewrite::splice;
use crate::engine::{batch, EngineError};
use crate::AnalyzerOutput;
use tracing::{debug, warn};

/// Owns the corrected buffer and the regions tracked inside it.
///
/// Every operation is synchronous and must be called from the thread that
/// owns the session. The presentation layer reports its own events through
/// the `on_*` methods.
#[derive(Debug)]
pub struct CorrectionSession<M = MonospaceMetrics> {
    buffer: String,
    regions: RegionStore,
    metrics: M,
    viewport: Viewport,
    scroll_offset: f32,
}

impl<M: FontMetrics> CorrectionSession<M> {
    pub fn new(metrics: M, viewport: Viewport) -> Self {
        Self {
            buffer: String::new(),
            regions: RegionStore::new(),
            metrics,
            viewport,
            scroll_offset: 0.0,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn regions(&self) -> &RegionStore {
        &self.regions
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    /// Vertical displacement of the document on screen: a document point at
    /// `y` is drawn at `y + scroll_offset`.
    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    /// Apply an analysis result to `original`.
    ///
    /// `None` means the analyzer produced nothing; the session is left as
    /// it was. An invalid match span leaves the previous buffer in place
    /// with an empty store.
    pub fn run_batch(
        &mut self,
        original: &str,
        analysis: Option<AnalyzerOutput>,
    ) -> Result<(&str, &[Region]), EngineError> {
        let Some(output) = analysis else {
            warn!("analysis produced no result");
            return Err(EngineError::AnalysisFailed);
        };

        self.regions.clear();
        let (buffer, regions) = batch::apply(original, &output.matches)?;

        self.buffer = buffer;
        for region in regions {
            self.regions.insert(region);
        }
        self.resync_from(0);

        debug!(
            matches = output.matches.len(),
            chars = self.buffer.chars().count(),
            "batch pass applied"
        );
        Ok((&self.buffer, self.regions.as_slice()))
    }

    /// Put `chosen` into the region's span and shift every later region by
    /// the resulting length change.
    pub fn swap(&mut self, id: RegionId, chosen: &str) -> Result<(), EngineError> {
        let Some(index) = self.regions.index_of(id) else {
            warn!(region = %id, "swap requested for untracked region");
            return Err(EngineError::UnknownRegion(id));
        };

        let region = self.regions.get_mut(index);
        let spliced = splice(&self.buffer, region.from(), region.to(), chosen)?;
        region.set_replacement(chosen);
        self.buffer = spliced.buffer;

        if spliced.delta != 0 {
            for later in self.regions.tail_mut(index + 1) {
                later.shift(spliced.delta);
            }
        }
        self.resync_from(index);

        debug!(region = %id, delta = spliced.delta, "swapped replacement");
        Ok(())
    }

    /// Regions under a screen-space point.
    pub fn hit_test(&self, screen: Point) -> Vec<&Region> {
        let local = Point::new(screen.x, screen.y - self.scroll_offset);
        self.regions.find_by_point(local)
    }

    pub fn clear_regions(&mut self) {
        self.regions.clear();
    }

    pub fn set_scroll_offset(&mut self, offset: f32) {
        self.scroll_offset = offset;
    }

    /// The view scrolled so that `scroll_top` document units are above it.
    pub fn on_scroll_changed(&mut self, scroll_top: f32) {
        self.set_scroll_offset(-scroll_top);
    }

    /// The buffer was changed by someone other than the engine; every
    /// tracked position is stale.
    pub fn on_buffer_edited(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        if !self.regions.is_empty() {
            debug!(regions = self.regions.len(), "buffer edited externally, dropping regions");
            self.regions.clear();
        }
    }

    /// Wrapping width changed; recompute every box.
    pub fn on_viewport_resized(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.resync_from(0);
    }

    /// Recompute boxes for the region at `index` and everything after it,
    /// in one forward pass over the buffer.
    fn resync_from(&mut self, index: usize) {
        let mut cursor = LayoutCursor::new(&self.buffer, &self.metrics, self.viewport);
        for region in self.regions.tail_mut(index) {
            cursor.seek(region.from());
            region.set_bounds(cursor.measure(region.len()));
        }
    }
}

impl Default for CorrectionSession<MonospaceMetrics> {
    fn default() -> Self {
        Self::new(MonospaceMetrics::default(), Viewport::unbounded())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::geometry::{bounds_of, Rect};
    use crate::Match;

    fn output(matches: &[(usize, usize, &[&str])]) -> Option<AnalyzerOutput> {
        Some(AnalyzerOutput {
            matches: matches
                .iter()
                .map(|(from, to, s)| Match::new(*from, *to, s.iter().map(|s| s.to_string()).collect()))
                .collect(),
        })
    }

    fn new_session() -> CorrectionSession {
        CorrectionSession::default()
    }

    fn spans(session: &CorrectionSession) -> Vec<(usize, usize)> {
        session.regions().iter().map(|r| (r.from(), r.to())).collect()
    }

    fn ids(session: &CorrectionSession) -> Vec<RegionId> {
        session.regions().iter().map(Region::id).collect()
    }

    fn cat_and_dog() -> CorrectionSession {
        let mut session = new_session();
        session
            .run_batch("teh cat", output(&[(0, 3, &["the"]), (4, 7, &["dog", "hound"])]))
            .unwrap();
        session
    }

    #[test]
    fn test_run_batch_returns_buffer_and_regions() {
        let mut session = new_session();
        let (buffer, regions) = session.run_batch("teh cat", output(&[(0, 3, &["the"])])).unwrap();
        assert_eq!(buffer, "the cat");
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].source(), "teh");
        assert_eq!(regions[0].replacement(), "the");
    }

    #[test]
    fn test_run_batch_empty() {
        let mut session = new_session();
        let (buffer, regions) = session.run_batch("hello", output(&[])).unwrap();
        assert_eq!(buffer, "hello");
        assert!(regions.is_empty());
    }

    #[test]
    fn test_batch_stamps_geometry() {
        let session = cat_and_dog();
        let boxes: Vec<_> = session.regions().iter().map(|r| r.bounds().unwrap()).collect();
        assert_eq!(
            boxes,
            vec![
                Rect { x: 0.0, y: 0.0, width: 3.0, height: 1.0 },
                Rect { x: 4.0, y: 0.0, width: 3.0, height: 1.0 },
            ]
        );
    }

    #[test]
    fn test_swap_grows_later_region() {
        let mut session = cat_and_dog();
        let second = ids(&session)[1];

        session.swap(second, "hound").unwrap();
        assert_eq!(session.buffer(), "the hound");
        assert_eq!(spans(&session), vec![(0, 3), (4, 9)]);
        assert_eq!(session.region(second).unwrap().replacement(), "hound");
        assert_eq!(session.region(second).unwrap().bounds().unwrap().width, 5.0);
    }

    #[test]
    fn test_swap_cascades_to_later_regions_only() {
        let mut session = new_session();
        session
            .run_batch(
                "a teh b cat c wrod",
                output(&[(2, 5, &["the"]), (8, 11, &["dog"]), (14, 18, &["word"])]),
            )
            .unwrap();
        let all = ids(&session);
        let (first, second, third) = (all[0], all[1], all[2]);
        let before = spans(&session);

        session.swap(second, "hippopotamus").unwrap();
        let delta = "hippopotamus".len() as isize - 3;
        let after = spans(&session);

        assert_eq!(after[0], before[0]);
        assert_eq!(after[1], (8, 20));
        assert_eq!(
            after[2],
            ((before[2].0 as isize + delta) as usize, (before[2].1 as isize + delta) as usize)
        );
        assert_eq!(session.buffer(), "a the b hippopotamus c word");

        // Every box still matches a fresh layout of its span.
        for id in [first, second, third] {
            let region = session.region(id).unwrap();
            let fresh = bounds_of(session.buffer(), region.from(), region.len(), session.metrics(), session.viewport());
            assert_eq!(region.bounds(), Some(fresh));
        }
    }

    #[test]
    fn test_swap_round_trip_restores_spans() {
        let mut session = new_session();
        session
            .run_batch("teh cat sat", output(&[(0, 3, &["the", "tea"]), (4, 7, &["dog"]), (8, 11, &["sit"])]))
            .unwrap();
        let first = ids(&session)[0];
        let before = spans(&session);
        let buffer = session.buffer().to_string();

        session.swap(first, "teh-teh").unwrap();
        assert_ne!(spans(&session), before);
        session.swap(first, "the").unwrap();

        assert_eq!(spans(&session), before);
        assert_eq!(session.buffer(), buffer);
    }

    #[test]
    fn test_swap_back_to_source() {
        let mut session = cat_and_dog();
        let first = ids(&session)[0];
        session.swap(first, "teh").unwrap();
        assert_eq!(session.buffer(), "teh dog");
    }

    #[test]
    fn test_regions_stay_disjoint_across_swaps() {
        let mut session = new_session();
        session
            .run_batch("ab cd ef gh", output(&[(0, 2, &["x"]), (3, 5, &["yyyy"]), (6, 8, &[""]), (9, 11, &["z"])]))
            .unwrap();
        let all = ids(&session);
        for (id, choice) in all.iter().zip(["longer", "", "mid", "q"]) {
            session.swap(*id, choice).unwrap();
            let regions = session.regions().as_slice();
            for pair in regions.windows(2) {
                assert!(pair[0].to() <= pair[1].from());
            }
            for region in regions {
                assert_eq!(region.len(), region.replacement().chars().count());
            }
        }
        assert_eq!(session.buffer(), "longer  mid q");
    }

    #[test]
    fn test_swap_unknown_region_is_noop() {
        let mut session = cat_and_dog();
        let stale = ids(&session)[0];
        session.clear_regions();
        session.run_batch("teh cat", output(&[(0, 3, &["the"])])).unwrap();

        let buffer = session.buffer().to_string();
        assert_eq!(session.swap(stale, "tea"), Err(EngineError::UnknownRegion(stale)));
        assert_eq!(session.buffer(), buffer);
        assert_eq!(spans(&session), vec![(0, 3)]);
    }

    #[test]
    fn test_analysis_failed_leaves_session_untouched() {
        let mut session = cat_and_dog();
        let before = spans(&session);
        assert_eq!(session.run_batch("other", None).unwrap_err(), EngineError::AnalysisFailed);
        assert_eq!(session.buffer(), "the dog");
        assert_eq!(spans(&session), before);
    }

    #[test]
    fn test_invalid_batch_keeps_buffer_and_empties_store() {
        let mut session = cat_and_dog();
        let err = session.run_batch("short", output(&[(0, 3, &["x"]), (4, 9, &["y"])])).unwrap_err();
        assert!(matches!(err, EngineError::InvalidSpan { .. }));
        assert_eq!(session.buffer(), "the dog");
        assert!(session.regions().is_empty());
    }

    #[test]
    fn test_hit_test_accounts_for_scroll() {
        let mut session = new_session();
        session
            .run_batch("first line\nteh cat", output(&[(11, 14, &["the"])]))
            .unwrap();
        let id = ids(&session)[0];

        let hits: Vec<_> = session.hit_test(Point::new(1.5, 1.5)).iter().map(|r| r.id()).collect();
        assert_eq!(hits, vec![id]);
        assert!(session.hit_test(Point::new(5.5, 1.5)).is_empty());

        // Scrolled down one row: the region now sits on screen row 0.
        session.on_scroll_changed(1.0);
        assert!(session.hit_test(Point::new(1.5, 1.5)).is_empty());
        let hits: Vec<_> = session.hit_test(Point::new(1.5, 0.5)).iter().map(|r| r.id()).collect();
        assert_eq!(hits, vec![id]);
        // Stored geometry is untouched by scrolling.
        assert_eq!(session.region(id).unwrap().bounds().unwrap().y, 1.0);
    }

    #[test]
    fn test_external_edit_clears_regions() {
        let mut session = cat_and_dog();
        session.on_buffer_edited("the dog!");
        assert!(session.regions().is_empty());
        assert_eq!(session.buffer(), "the dog!");
    }

    #[test]
    fn test_viewport_resize_rewraps() {
        let mut session = cat_and_dog();
        let second = ids(&session)[1];
        session.on_viewport_resized(Viewport::new(4.0));
        let rect = session.region(second).unwrap().bounds().unwrap();
        assert_eq!((rect.x, rect.y), (0.0, 1.0));
    }
}
