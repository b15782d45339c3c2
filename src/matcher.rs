//! Grouping of repeats per sequence and pairing of candidate HOS repeats.
//!
//! Each sequence seeds a chain with its first repeat. Every later repeat is
//! compared with the repeats seen before it in the same sequence, and joins
//! the chain when it covers the same span as one of them and its period is
//! close to an integer multiple of that repeat's period.

use tracing::debug;

use crate::{reader::Event, HosConfig, RepeatRecord};

/// Identifies one sequence occurrence in the input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SequenceKey {
    /// The text after the `Sequence: ` marker.
    pub header: String,
    /// 1-based count of sequence markers seen up to and including this one.
    pub ordinal: usize,
}

/// A repeat kept in a chain, with the ratio that admitted it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainEntry {
    pub start: usize,
    pub end: usize,
    pub period: u32,
    pub copies: f32,
    /// 1 for the seed entry.
    pub ratio: f64,
    pub score: u32,
    pub identity: u32,
}

impl ChainEntry {
    fn new(record: &RepeatRecord, ratio: f64) -> ChainEntry {
        ChainEntry {
            start: record.start,
            end: record.end,
            period: record.period,
            copies: record.copies,
            ratio,
            score: record.score,
            identity: record.identity(),
        }
    }
}

/// The seed repeat of a sequence followed by every repeat paired with it or
/// with an earlier member.
#[derive(Debug, Clone, PartialEq)]
pub struct HosChain {
    pub key: SequenceKey,
    pub entries: Vec<ChainEntry>,
}

impl HosChain {
    /// Number of entries, reported as the chain's level.
    pub fn levels(&self) -> usize {
        self.entries.len()
    }

    /// Whether the chain holds a candidate pair at all.
    pub fn has_candidate(&self) -> bool {
        self.levels() >= 2
    }
}

/// Chains for the whole input, in the order their sequences were seeded.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ChainStore {
    chains: Vec<HosChain>,
}

impl ChainStore {
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HosChain> {
        self.chains.iter()
    }

    fn seed(&mut self, key: SequenceKey, entry: ChainEntry) -> usize {
        self.chains.push(HosChain {
            key,
            entries: vec![entry],
        });
        self.chains.len() - 1
    }
}

impl IntoIterator for ChainStore {
    type Item = HosChain;
    type IntoIter = std::vec::IntoIter<HosChain>;

    fn into_iter(self) -> Self::IntoIter {
        self.chains.into_iter()
    }
}

/// The sequence currently being scanned.
#[derive(Debug)]
struct SequenceContext {
    key: SequenceKey,
    repeats: Vec<RepeatRecord>,
    // index of this sequence's chain in the store, once seeded
    chain: Option<usize>,
}

/// Consumes reader events and accumulates chains.
#[derive(Debug)]
pub struct Matcher {
    config: HosConfig,
    ordinal: usize,
    // `None` until the first sequence marker; repeats before it are ignored
    context: Option<SequenceContext>,
    store: ChainStore,
}

impl Matcher {
    pub fn new(config: HosConfig) -> Matcher {
        Matcher {
            config,
            ordinal: 0,
            context: None,
            store: ChainStore::default(),
        }
    }

    pub fn feed(&mut self, event: Event) {
        match event {
            Event::Sequence(header) => self.start_sequence(header),
            Event::Repeat(record) => self.push_repeat(record),
        }
    }

    /// Begin a new sequence, dropping the repeats of the previous one.
    pub fn start_sequence(&mut self, header: String) {
        self.close_sequence();
        self.ordinal += 1;
        self.context = Some(SequenceContext {
            key: SequenceKey {
                header,
                ordinal: self.ordinal,
            },
            repeats: Vec::new(),
            chain: None,
        });
    }

    /// Record a repeat for the current sequence and try to pair it.
    pub fn push_repeat(&mut self, record: RepeatRecord) {
        let Some(ctx) = self.context.as_mut() else {
            debug!(
                start = record.start,
                end = record.end,
                "repeat before any sequence marker, ignoring"
            );
            return;
        };

        match ctx.chain {
            None => {
                let entry = ChainEntry::new(&record, 1.0);
                ctx.chain = Some(self.store.seed(ctx.key.clone(), entry));
            }
            Some(idx) => {
                let config = &self.config;
                let hit = ctx
                    .repeats
                    .iter()
                    .find_map(|prev| pair_ratio(prev, &record, config));
                if let Some(ratio) = hit {
                    debug!(
                        header = %ctx.key.header,
                        start = record.start,
                        end = record.end,
                        period = record.period,
                        ratio,
                        "extending HOS chain"
                    );
                    self.store.chains[idx]
                        .entries
                        .push(ChainEntry::new(&record, ratio));
                }
            }
        }

        ctx.repeats.push(record);
    }

    /// Hand over the accumulated chains.
    pub fn finish(mut self) -> ChainStore {
        self.close_sequence();
        self.store
    }

    fn close_sequence(&mut self) {
        if let Some(ctx) = self.context.take() {
            let levels = ctx
                .chain
                .map(|idx| self.store.chains[idx].levels())
                .unwrap_or(0);
            debug!(
                header = %ctx.key.header,
                ordinal = ctx.key.ordinal,
                repeats = ctx.repeats.len(),
                levels,
                "finished sequence"
            );
        }
    }
}

/// The period ratio when `record` pairs with the earlier repeat `prev`.
fn pair_ratio(prev: &RepeatRecord, record: &RepeatRecord, config: &HosConfig) -> Option<f64> {
    if !overlaps(prev, record, config.offset) {
        return None;
    }
    let ratio = period_ratio(prev.period, record.period)?;
    near_integer_multiple(ratio, config).then_some(ratio)
}

/// Both ends of the two repeats lie within `offset` of each other.
pub fn overlaps(a: &RepeatRecord, b: &RepeatRecord, offset: usize) -> bool {
    a.start.abs_diff(b.start) <= offset && a.end.abs_diff(b.end) <= offset
}

/// Larger period over smaller period. `None` when either period is zero.
pub fn period_ratio(a: u32, b: u32) -> Option<f64> {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if lo == 0 {
        return None;
    }
    Some(f64::from(hi) / f64::from(lo))
}

/// The digits after the decimal point of a non-negative ratio, read back as
/// `0.xxx`.
///
/// The ratio is first written with 15 significant digits, so 43/20 gives
/// exactly `0.15` rather than the `0.1499...` left by subtracting the
/// integer part.
pub fn fractional_part(ratio: f64) -> f64 {
    let rounded = format!("{:.14e}", ratio).parse::<f64>().unwrap_or(ratio);
    match rounded.to_string().split_once('.') {
        Some((_, digits)) => format!("0.{}", digits).parse().unwrap_or(0.0),
        None => 0.0,
    }
}

/// The loose "roughly an integer multiple, and clearly longer" test.
///
/// Only the fractional part is inspected, so a ratio of 2.9 passes just like
/// 3.0 does.
pub fn near_integer_multiple(ratio: f64, config: &HosConfig) -> bool {
    let frac = fractional_part(ratio);
    (frac < config.frac_tolerance || 1.0 - frac < config.frac_tolerance)
        && ratio > config.min_ratio
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rep(start: usize, end: usize, period: u32, score: u32, matches: u32) -> RepeatRecord {
        RepeatRecord {
            start,
            end,
            period,
            copies: 2.0,
            matches,
            score,
        }
    }

    fn scan(events: Vec<Event>) -> ChainStore {
        let mut matcher = Matcher::new(HosConfig::default());
        for e in events {
            matcher.feed(e);
        }
        matcher.finish()
    }

    fn seq(h: &str) -> Event {
        Event::Sequence(h.to_string())
    }

    #[test]
    fn fractional_part_keeps_digits_after_point() {
        assert_eq!(fractional_part(2.0), 0.0);
        assert!((fractional_part(2.25) - 0.25).abs() < 1e-12);
        assert!((fractional_part(3.9) - 0.9).abs() < 1e-12);
        assert_eq!(fractional_part(43.0 / 20.0), 0.15);
        assert_eq!(fractional_part(37.0 / 20.0), 0.85);
        assert_eq!(fractional_part(23.0 / 20.0), 0.15);
    }

    #[test]
    fn ratio_test_boundaries() {
        let cfg = HosConfig::default();
        assert!(near_integer_multiple(2.0, &cfg));
        assert!(near_integer_multiple(2.1, &cfg));
        assert!(near_integer_multiple(1.9, &cfg));
        assert!(near_integer_multiple(3.0, &cfg));
        assert!(!near_integer_multiple(2.5, &cfg));
        assert!(!near_integer_multiple(1.0, &cfg));
        assert!(!near_integer_multiple(1.05, &cfg));
        // 1.5 is not strictly above the minimum
        assert!(!near_integer_multiple(1.5, &cfg));
    }

    #[test]
    fn fraction_on_the_tolerance_is_rejected() {
        let cfg = HosConfig::default();
        let ratio = |a, b| period_ratio(a, b).unwrap();
        // 2.15, 1.85 and 1.15 sit exactly on the tolerance
        assert!(!near_integer_multiple(ratio(20, 43), &cfg));
        assert!(!near_integer_multiple(ratio(43, 20), &cfg));
        assert!(!near_integer_multiple(ratio(20, 37), &cfg));
        assert!(!near_integer_multiple(ratio(20, 23), &cfg));
        // one step inside the tolerance on either side
        assert!(near_integer_multiple(ratio(100, 214), &cfg));
        assert!(near_integer_multiple(ratio(100, 186), &cfg));
    }

    #[test]
    fn periods_on_the_tolerance_do_not_pair() {
        let store = scan(vec![
            seq("a"),
            Event::Repeat(rep(1, 100, 20, 50, 80)),
            Event::Repeat(rep(1, 100, 43, 50, 80)),
            Event::Repeat(rep(1, 100, 37, 50, 80)),
        ]);
        assert_eq!(store.iter().next().unwrap().levels(), 1);
    }

    #[test]
    fn zero_period_never_pairs() {
        assert_eq!(period_ratio(0, 10), None);
        assert_eq!(period_ratio(10, 20), Some(2.0));
        assert_eq!(period_ratio(20, 10), Some(2.0));
    }

    #[test]
    fn single_repeat_gives_single_entry_chain() {
        let store = scan(vec![seq("a"), Event::Repeat(rep(1, 100, 10, 50, 80))]);
        assert_eq!(store.len(), 1);
        assert!(!store.iter().next().unwrap().has_candidate());
    }

    #[test]
    fn overlapping_double_period_pairs() {
        let store = scan(vec![
            seq("gnl|ti|2250104470 GGZG7125.g1"),
            Event::Repeat(rep(51, 948, 164, 590, 70)),
            Event::Repeat(rep(51, 951, 328, 735, 86)),
        ]);
        let chain = store.iter().next().unwrap();
        assert_eq!(chain.key.ordinal, 1);
        assert_eq!(chain.levels(), 2);
        assert_eq!(chain.entries[0].period, 164);
        assert_eq!(chain.entries[0].ratio, 1.0);
        assert_eq!(chain.entries[1].period, 328);
        assert_eq!(chain.entries[1].ratio, 2.0);
    }

    #[test]
    fn offset_is_inclusive() {
        let store = scan(vec![
            seq("a"),
            Event::Repeat(rep(100, 200, 10, 50, 80)),
            Event::Repeat(rep(110, 190, 20, 50, 80)),
            Event::Repeat(rep(89, 200, 30, 50, 80)),
        ]);
        let chain = store.iter().next().unwrap();
        assert_eq!(chain.levels(), 2);
        assert_eq!(chain.entries[1].period, 20);
    }

    #[test]
    fn unpaired_repeats_still_serve_as_partners() {
        // the 7bp repeat does not pair with the seed, but the 14bp one pairs with it
        let store = scan(vec![
            seq("a"),
            Event::Repeat(rep(1, 100, 10, 50, 80)),
            Event::Repeat(rep(500, 600, 7, 50, 80)),
            Event::Repeat(rep(505, 601, 14, 60, 90)),
        ]);
        let chain = store.iter().next().unwrap();
        let periods: Vec<u32> = chain.entries.iter().map(|e| e.period).collect();
        assert_eq!(periods, vec![10, 14]);
        assert_eq!(chain.entries[1].ratio, 2.0);
    }

    #[test]
    fn first_match_wins() {
        let store = scan(vec![
            seq("a"),
            Event::Repeat(rep(1, 100, 10, 50, 80)),
            Event::Repeat(rep(1, 100, 15, 50, 80)),
            Event::Repeat(rep(1, 100, 30, 50, 80)),
        ]);
        let chain = store.iter().next().unwrap();
        assert_eq!(chain.levels(), 2);
        // 30/10 is tried before 30/15
        assert_eq!(chain.entries[1].ratio, 3.0);
    }

    #[test]
    fn sequences_are_keyed_by_ordinal() {
        let store = scan(vec![
            seq("dup"),
            Event::Repeat(rep(1, 100, 10, 50, 80)),
            seq("empty"),
            seq("dup"),
            Event::Repeat(rep(1, 100, 10, 50, 80)),
        ]);
        let keys: Vec<(&str, usize)> = store
            .iter()
            .map(|c| (c.key.header.as_str(), c.key.ordinal))
            .collect();
        assert_eq!(keys, vec![("dup", 1), ("dup", 3)]);
    }

    #[test]
    fn buffer_resets_between_sequences() {
        let store = scan(vec![
            seq("a"),
            Event::Repeat(rep(1, 100, 10, 50, 80)),
            seq("b"),
            Event::Repeat(rep(1, 100, 20, 50, 80)),
        ]);
        assert_eq!(store.len(), 2);
        assert!(store.iter().all(|c| c.levels() == 1));
    }

    #[test]
    fn repeats_without_marker_are_ignored() {
        let store = scan(vec![
            Event::Repeat(rep(1, 100, 10, 50, 80)),
            Event::Repeat(rep(1, 100, 20, 50, 80)),
        ]);
        assert!(store.is_empty());
    }
}
