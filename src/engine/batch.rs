use crate::engine::ledger::OffsetLedger;
use crate::engine::region::Region;
use crate::engine::rewrite::{self, splice};
use crate::engine::EngineError;
use crate::Match;

/// Apply every match to `original`, returning the corrected buffer and one
/// region per match in current-buffer coordinates.
///
/// Matches must be sorted by `from_pos` and must not overlap. Any invalid
/// span aborts the whole pass; nothing partial is returned.
pub fn apply(original: &str, matches: &[Match]) -> Result<(String, Vec<Region>), EngineError> {
    let mut buffer = original.to_string();
    let mut ledger = OffsetLedger::new();
    let mut regions = Vec::with_capacity(matches.len());

    for m in matches {
        let source = rewrite::slice(original, m.from_pos, m.to_pos)?;
        let replacement = m.suggestions.first().map(String::as_str).unwrap_or(source);

        let offset = ledger.offset_at(m.from_pos);
        let cur_from = m.from_pos.saturating_add_signed(offset);
        let cur_to = m.to_pos.saturating_add_signed(offset);

        let spliced = splice(&buffer, cur_from, cur_to, replacement)?;
        buffer = spliced.buffer;
        ledger.record(m.to_pos, spliced.delta);

        regions.push(
            Region::new(cur_from, source, replacement, m.suggestions.clone())
                .with_message(m.message.clone()),
        );
    }

    Ok((buffer, regions))
}
