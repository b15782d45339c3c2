use std::io::Write;

use crate::{classify::ReportRow, Result};

pub const REPORT_HEADER: &str = "ID\tLEVEL\tSTART\tEND\tLENGTH\tCOPIES\tSCORE\t%IDENT\tHOS?\tSEQ_ID";

/// Write the tab separated report: header, one line per row, then a blank
/// line.
pub fn write_report<W: Write>(mut wtr: W, rows: &[ReportRow]) -> Result<()> {
    writeln!(wtr, "{}", REPORT_HEADER)?;
    for row in rows {
        writeln!(
            wtr,
            "{}\t{}\t{}\t{}\t{}\t{:.1}\t{}\t{}\t{}\t{}",
            row.id,
            row.levels,
            row.start,
            row.end,
            row.period,
            row.copies,
            row.score,
            row.identity,
            row.flag,
            row.header
        )?;
    }
    writeln!(wtr)?;
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::HosFlag;

    #[test]
    fn empty_report_is_header_and_blank_line() {
        let mut out = Vec::new();
        write_report(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n\n", REPORT_HEADER));
    }

    #[test]
    fn rows_are_tab_separated() {
        let row = ReportRow {
            id: 1,
            levels: 2,
            start: 51,
            end: 948,
            period: 164,
            copies: 5.5,
            score: 590,
            identity: 70,
            flag: HosFlag::None,
            header: "gnl|ti|2250104470 GGZG7125.g1".to_string(),
        };
        let mut out = Vec::new();
        write_report(&mut out, &[row]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(
            lines[1],
            "1\t2\t51\t948\t164\t5.5\t590\t70\t\tgnl|ti|2250104470 GGZG7125.g1"
        );
        assert_eq!(lines[2], "");
    }
}
