use std::{
    fs::File,
    io::{self, BufRead, Read},
    path::Path,
};

use tracing::trace;

use crate::{RepeatRecord, Result};

/// The marker TRF writes before the repeats of each input sequence.
const SEQUENCE_MARKER: &str = "Sequence: ";

/// A recognised line of a trf `.dat` file.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A `Sequence: ` line, carrying the rest of the line as the header.
    Sequence(String),
    /// A repeat data line.
    Repeat(RepeatRecord),
}

pub struct Reader<R> {
    rdr: io::BufReader<R>,
    line: u64,
}

impl Reader<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Reader<File>> {
        Ok(Reader::new(File::open(path)?))
    }
}

impl<R: io::Read> Reader<R> {
    pub fn new(rdr: R) -> Reader<R> {
        Reader {
            rdr: io::BufReader::new(rdr),
            line: 0,
        }
    }

    /// The number of lines consumed so far.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// A borrowed iterator over the events of a trf file.
    pub fn events(&mut self) -> EventsIter<R> {
        EventsIter::new(self)
    }

    /// An owned iterator over the events of a trf file.
    pub fn into_events(self) -> EventsIntoIter<R> {
        EventsIntoIter::new(self)
    }

    /// Read lines until one is recognised, or the input ends.
    fn read_event(&mut self) -> Result<Option<Event>> {
        let reader = self.rdr.by_ref();
        let mut temp_buf = String::new();

        loop {
            temp_buf.clear();
            let bytes = reader.read_line(&mut temp_buf)?;
            if bytes == 0 {
                // this is the EOF
                return Ok(None);
            }
            self.line += 1;

            match parse_input_line(&temp_buf) {
                Some(event) => return Ok(Some(event)),
                None => {
                    if !temp_buf.trim().is_empty() {
                        trace!(line = self.line, "skipping unrecognised line");
                    }
                    continue;
                }
            }
        }
    }
}

/// Classify a single line. Anything that is neither a sequence marker nor a
/// well formed repeat line is `None`; malformed lines are never an error.
pub(crate) fn parse_input_line(input: &str) -> Option<Event> {
    let input = input.trim_end_matches(['\n', '\r']);

    if input.trim().is_empty() {
        return None;
    }

    if let Some(header) = input.strip_prefix(SEQUENCE_MARKER) {
        return Some(Event::Sequence(header.to_string()));
    }

    parse_repeat_line(input).map(Event::Repeat)
}

fn parse_repeat_line(input: &str) -> Option<RepeatRecord> {
    let line_elements = input.split_whitespace().collect::<Vec<&str>>();

    // a full row also carries A, C, G, T, entropy and at least the consensus
    // pattern; shorter rows are truncated and skipped
    if let [start, end, period, copies, _consensus_size, matches, _indels, score, _a, _c, _g, _t, _entropy, _consensus, ..] =
        &line_elements[..]
    {
        if !(is_unsigned(start) && is_unsigned(end) && is_unsigned(period) && is_decimal(copies)) {
            return None;
        }
        if !(is_unsigned(matches) && is_unsigned(score)) {
            return None;
        }

        return Some(RepeatRecord {
            start: start.parse().ok()?,
            end: end.parse().ok()?,
            period: period.parse().ok()?,
            copies: copies.parse().ok()?,
            matches: matches.parse().ok()?,
            score: score.parse().ok()?,
        });
    }

    None
}

fn is_unsigned(field: &str) -> bool {
    !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit())
}

/// Digits, a decimal point, digits.
fn is_decimal(field: &str) -> bool {
    match field.split_once('.') {
        Some((int, frac)) => is_unsigned(int) && is_unsigned(frac),
        None => false,
    }
}

/// A borrowed iterator over the events of a trf file.
pub struct EventsIter<'r, R: 'r> {
    /// The underlying reader
    rdr: &'r mut Reader<R>,
}

impl<'r, R: io::Read> EventsIter<'r, R> {
    fn new(rdr: &'r mut Reader<R>) -> EventsIter<'r, R> {
        EventsIter { rdr }
    }
    /// Return a reference to the underlying reader.
    pub fn reader(&self) -> &Reader<R> {
        self.rdr
    }
}

impl<'r, R: io::Read> Iterator for EventsIter<'r, R> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Result<Event>> {
        self.rdr.read_event().transpose()
    }
}

/// An owned iterator over the events of a trf file.
pub struct EventsIntoIter<R> {
    /// The underlying reader.
    rdr: Reader<R>,
}

impl<R: io::Read> EventsIntoIter<R> {
    fn new(rdr: Reader<R>) -> EventsIntoIter<R> {
        EventsIntoIter { rdr }
    }
    /// Return a reference to the underlying reader.
    pub fn reader(&self) -> &Reader<R> {
        &self.rdr
    }

    /// Drop this iterator and return the underlying reader.
    pub fn into_reader(self) -> Reader<R> {
        self.rdr
    }
}

impl<R: io::Read> Iterator for EventsIntoIter<R> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Result<Event>> {
        self.rdr.read_event().transpose()
    }
}
