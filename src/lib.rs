//! Flag candidate Higher-Order Structure (HOS) in Tandem Repeats Finder
//! `.dat` output.
//!
//! A sequence is a candidate when two of its repeats cover roughly the same
//! span and the period of one is close to an integer multiple of the other.
//! Pairs are then graded on how much the longer period improves the
//! alignment score and the percent identity.
//!
//! ```
//! use trf_hos::{classify, scan, HosConfig, HosFlag, Reader};
//!
//! let dat = "Sequence: gnl|ti|2250104470 GGZG7125.g1
//! 51 948 164 5.5 164 70 10 590 31 18 22 27 1.96 AATG AATG
//! 51 951 328 2.7 328 86 3 735 31 18 22 27 1.96 AATG AATG
//! ";
//! let config = HosConfig::default();
//! let store = scan(Reader::new(dat.as_bytes()), &config)?;
//! let rows = classify(store, &config);
//! assert_eq!(rows[1].flag, HosFlag::Strong);
//! # Ok::<(), trf_hos::Error>(())
//! ```

mod classify;
mod config;
mod error;
mod matcher;
mod reader;
mod record;
mod report;

pub use classify::{classify, grade_pair, HosFlag, ReportRow};
pub use config::HosConfig;
pub use error::{Error, ErrorKind, Result};
pub use matcher::{
    fractional_part, near_integer_multiple, overlaps, period_ratio, ChainEntry, ChainStore,
    HosChain, Matcher, SequenceKey,
};
pub use reader::{Event, EventsIntoIter, EventsIter, Reader};
pub use record::RepeatRecord;
pub use report::{write_report, REPORT_HEADER};

/// Read a whole trf file and collect its chains.
pub fn scan<R: std::io::Read>(reader: Reader<R>, config: &HosConfig) -> Result<ChainStore> {
    config.validate()?;
    let mut matcher = Matcher::new(*config);
    for event in reader.into_events() {
        matcher.feed(event?);
    }
    Ok(matcher.finish())
}
