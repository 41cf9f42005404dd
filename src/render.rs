//! Text table rendering of a [`Report`].

use std::fmt::Write as _;

use mfdread::card::trailer::Trailer;
use mfdread::report::{BlockContents, BlockRecord, Report};
use mfdread::utils::hex;

const RULE: &str = "====================================================================================================";

/// ANSI escape sequences used by the table; all empty when colors are off.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub key_a: &'static str,
    pub key_b: &'static str,
    pub access: &'static str,
    pub warning: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub const COLOR: Self = Self {
        key_a: "\x1b[0;31m",
        key_b: "\x1b[0;34m",
        access: "\x1b[0;32m",
        warning: "\x1b[1;93m",
        reset: "\x1b[0m",
    };

    pub const PLAIN: Self = Self {
        key_a: "",
        key_b: "",
        access: "",
        warning: "",
        reset: "",
    };

    pub fn new(colored: bool) -> Self {
        if colored { Self::COLOR } else { Self::PLAIN }
    }
}

/// Render the full report as a table.
pub fn table(report: &Report, p: Palette) -> String {
    let mut out = String::new();
    let m = &report.manufacturer;
    let interpreted = report.card.size();
    let size = if interpreted == report.dump_len {
        format!("{interpreted} bytes")
    } else {
        format!("{interpreted} bytes (of {} read)", report.dump_len)
    };
    let _ = writeln!(
        out,
        "File size: {size}. Expected {} sectors ({})",
        report.sector_count,
        report.card.name()
    );
    let _ = writeln!(out, "\tUID:  {}", hex(&m.uid));
    let bcc_note = if m.bcc_valid() {
        String::new()
    } else {
        format!(" {}(expected {:02x}){}", p.warning, m.expected_bcc(), p.reset)
    };
    let _ = writeln!(out, "\tBCC:  {:02x}{bcc_note}", m.bcc);
    let _ = writeln!(out, "\tSAK:  {:02x}", m.sak);
    let _ = writeln!(out, "\tATQA: {}", hex(&m.atqa));

    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "| Sect | Blck |            Data                  | Access |  r  |  w    |  i  | d/t/r [info]       |"
    );
    let _ = writeln!(
        out,
        "|      |      |                                  |  cond. |   A | Acc.  | B                        |"
    );
    let _ = writeln!(
        out,
        "|      |      | {}Key A{}      {}Access Bits{}     {}Key B{} |        | r w | r   w | r w                      |",
        p.key_a, p.reset, p.access, p.reset, p.key_b, p.reset
    );

    for record in &report.blocks {
        if record.block == 0 {
            let _ = writeln!(out, "{RULE}");
        }
        let _ = writeln!(out, "{}", row(record, p));
    }
    let _ = writeln!(out, "{RULE}");

    let errors = report.error_count();
    if errors > 0 {
        let _ = writeln!(
            out,
            "{}{errors} block(s) with inconsistent access bits{}",
            p.warning, p.reset
        );
    }
    out
}

fn row(record: &BlockRecord, p: Palette) -> String {
    let label = record
        .sector_label()
        .map(|s| s.to_string())
        .unwrap_or_default();
    let data = match &record.contents {
        BlockContents::Data(d) => hex(d),
        BlockContents::Trailer(t) => trailer_hex(t, p),
    };
    let condition = match record.condition {
        Some(c) => format!("{}{c}{}", p.access, p.reset),
        None => format!("{}ERR{}", p.warning, p.reset),
    };
    format!(
        "| {label:<5}|  {:<3} | {data} |  {condition}   | {:<38} | {}",
        record.block,
        record.permission_text(),
        info(record)
    )
}

fn trailer_hex(t: &Trailer, p: Palette) -> String {
    format!(
        "{}{}{}{}{}{}{}",
        p.key_a, t.key_a, p.access, t.access_bits, p.key_b, t.key_b, p.reset
    )
}

/// Last column: printable ASCII for data blocks, key labels for trailers.
fn info(record: &BlockRecord) -> String {
    match &record.contents {
        BlockContents::Data(d) => d
            .iter()
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
            .collect(),
        BlockContents::Trailer(t) => {
            let mut labels = Vec::new();
            if let Some(name) = t.key_a.well_known() {
                labels.push(format!("A: {name}"));
            }
            if let Some(name) = t.key_b.well_known() {
                labels.push(format!("B: {name}"));
            }
            labels.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mfdread::report::{ReportOptions, build_report};

    fn transport_mini() -> Vec<u8> {
        let mut dump = vec![0u8; 320];
        dump[..5].copy_from_slice(&[0x11, 0x22, 0x33, 0x44, 0x44]);
        for sector in 0..5 {
            let t = sector * 64 + 48;
            dump[t..t + 6].fill(0xFF);
            dump[t + 6..t + 10].copy_from_slice(&[0xFF, 0x07, 0x80, 0x69]);
            dump[t + 10..t + 16].fill(0xFF);
        }
        dump
    }

    #[test]
    fn plain_table_has_one_row_per_block() {
        let report = build_report(&transport_mini(), ReportOptions::default()).unwrap();
        let text = table(&report, Palette::PLAIN);
        assert!(!text.contains('\x1b'));
        assert!(text.contains("\tUID:  11223344"));
        let rows = text
            .lines()
            .filter(|l| l.split('|').nth(2).is_some_and(|c| c.trim().parse::<usize>().is_ok()))
            .count();
        assert_eq!(rows, 20);
        assert!(text.contains("ffffffffffffff078069ffffffffffff"));
        assert!(text.contains("- A | A   A | A A [transport]"));
        assert!(text.contains("A: factory default, B: factory default"));
        assert!(!text.contains("inconsistent"));
    }

    #[test]
    fn errors_are_flagged() {
        let report = build_report(&[0u8; 320], ReportOptions::default()).unwrap();
        let text = table(&report, Palette::PLAIN);
        assert!(text.contains("ERR"));
        assert!(text.contains("20 block(s) with inconsistent access bits"));
    }

    #[test]
    fn forced_1k_header_shows_interpreted_size() {
        let report = build_report(&[0u8; 4096], ReportOptions { force_1k: true }).unwrap();
        let text = table(&report, Palette::PLAIN);
        assert!(text.starts_with("File size: 1024 bytes (of 4096 read). Expected 16 sectors"));

        let report = build_report(&transport_mini(), ReportOptions::default()).unwrap();
        assert!(table(&report, Palette::PLAIN).starts_with("File size: 320 bytes. Expected 5"));
    }

    #[test]
    fn colored_table_wraps_keys() {
        let report = build_report(&transport_mini(), ReportOptions::default()).unwrap();
        let text = table(&report, Palette::COLOR);
        assert!(text.contains("\x1b[0;31mffffffffffff\x1b[0;32mff078069"));
    }
}
