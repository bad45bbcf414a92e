//! Uniform node interface used by browsing front ends, plus the tabular rendering.

use crate::constants::{LEN_INFO, LEN_NAME, LEN_NUMBER, LEN_WIDTH};

/// A node of the record tree as seen by a shell: record, area or field.
pub trait Describe {
    fn name(&self) -> &str;

    fn is_present(&self) -> bool;

    /// One-line description.
    fn summary(&self) -> String;

    /// Full multi-line description.
    fn describe(&self) -> String;

    /// Child nodes in layout order; fields have none.
    fn children(&self) -> Vec<&dyn Describe>;
}

const BANNER_WIDTH: usize = 31;

/// Framed title line used above area tables.
pub(crate) fn banner(title: &str) -> String {
    let rule = format!("+{}+\n", "-".repeat(BANNER_WIDTH));
    format!("{rule}+ {title:<width$}+\n{rule}", width = BANNER_WIDTH - 1)
}

/// Column header of an area table.
pub(crate) fn table_header() -> String {
    let rule = "=".repeat(LEN_WIDTH + LEN_INFO + LEN_NAME + LEN_NUMBER);
    format!(
        "{rule}\n{:<nw$}{:<mw$}{:<iw$}{} \n{rule}\n",
        "N",
        "NAME",
        "INFO",
        "DATA",
        nw = LEN_NUMBER,
        mw = LEN_NAME,
        iw = LEN_INFO,
    )
}

/// One table row: number, name, info and a hex dump wrapped at [LEN_WIDTH] bytes.
pub(crate) fn table_row(number: usize, name: &str, info: &str, data: &[u8]) -> String {
    format!(
        "{:<nw$}{:<mw$}{:<iw$}{} \n",
        number,
        name,
        info,
        hex_dump(data),
        nw = LEN_NUMBER,
        mw = LEN_NAME,
        iw = LEN_INFO,
    )
}

/// `| 0x1  0xc0 ...`, continuation lines aligned under the DATA column.
pub(crate) fn hex_dump(data: &[u8]) -> String {
    let indent = " ".repeat(LEN_INFO + LEN_NAME + LEN_NUMBER);
    let mut out = String::from("|");

    for (i, byte) in data.iter().enumerate() {
        out.push_str(&format!(" {:<4}", format!("{byte:#x}")));

        if (i + 1) % LEN_WIDTH == 0 && i + 1 != data.len() {
            out.push('\n');
            out.push_str(&indent);
            out.push('|');
        }
    }

    out
}
