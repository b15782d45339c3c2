use std::fmt;

use crate::{matcher::ChainEntry, ChainStore, HosChain, HosConfig};

/// Confidence that a chain reflects Higher-Order Structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HosFlag {
    /// No support, or the shorter member of a pair.
    None,
    /// Either the score ratio or the identity delta supports HOS.
    Weak,
    /// Both support HOS.
    Strong,
    /// Three or more members, which are not graded.
    Indeterminate,
}

impl fmt::Display for HosFlag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            HosFlag::None => "",
            HosFlag::Weak => "hos",
            HosFlag::Strong => "HOS",
            HosFlag::Indeterminate => "???",
        };
        f.write_str(s)
    }
}

/// One line of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// Shared by every row of the same chain.
    pub id: usize,
    pub levels: usize,
    pub start: usize,
    pub end: usize,
    pub period: u32,
    pub copies: f32,
    pub score: u32,
    pub identity: u32,
    pub flag: HosFlag,
    pub header: String,
}

/// Grade every chain holding at least one pair, numbering chains densely
/// from 1 in store order.
pub fn classify(store: ChainStore, config: &HosConfig) -> Vec<ReportRow> {
    store
        .into_iter()
        .filter(HosChain::has_candidate)
        .enumerate()
        .flat_map(|(i, chain)| classify_chain(i + 1, chain, config))
        .collect()
}

fn classify_chain(id: usize, chain: HosChain, config: &HosConfig) -> Vec<ReportRow> {
    let levels = chain.levels();
    let flags: Vec<HosFlag> = (0..levels)
        .map(|i| {
            if levels > 2 {
                HosFlag::Indeterminate
            } else if i == 0 {
                HosFlag::None
            } else {
                grade_pair(&chain.entries[i - 1], &chain.entries[i], config)
            }
        })
        .collect();

    chain
        .entries
        .into_iter()
        .zip(flags)
        .map(|(e, flag)| ReportRow {
            id,
            levels,
            start: e.start,
            end: e.end,
            period: e.period,
            copies: e.copies,
            score: e.score,
            identity: e.identity,
            flag,
            header: chain.key.header.clone(),
        })
        .collect()
}

/// Compare the longer-period member of a pair against the shorter one,
/// whichever order they were found in.
pub fn grade_pair(prev: &ChainEntry, current: &ChainEntry, config: &HosConfig) -> HosFlag {
    let (longer, shorter) = if prev.period > current.period {
        (prev, current)
    } else {
        (current, prev)
    };

    let score_ratio = f64::from(longer.score) / f64::from(shorter.score);
    let identity_delta = f64::from(longer.identity) - f64::from(shorter.identity);

    let by_score = score_ratio > config.score_ratio;
    let by_identity = identity_delta > config.identity_delta;

    match (by_score, by_identity) {
        (true, true) => HosFlag::Strong,
        (true, false) | (false, true) => HosFlag::Weak,
        (false, false) => HosFlag::None,
    }
}
