/// The fields of a `trf` table row that HOS detection consumes.
///
/// Columns the scan never looks at (consensus size, indels, base
/// composition, entropy, the patterns themselves) are not kept.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RepeatRecord {
    /// Start index of the repeat (1-based, inclusive)
    pub start: usize,
    /// End index of the repeat (1-based, inclusive)
    pub end: usize,
    /// The period of the repeat, reported as its length
    pub period: u32,
    /// Number of copies aligned with the consensus pattern
    pub copies: f32,
    /// Percent of matches between adjacent copies overall (6th column)
    pub matches: u32,
    /// Alignment score (8th column)
    pub score: u32,
}

impl RepeatRecord {
    /// Percent identity of the copies to the consensus. TRF reports this as
    /// the percent of matches between adjacent copies.
    pub fn identity(&self) -> u32 {
        self.matches
    }
}
