use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("range is empty")]
    Empty,

    #[error("range '{0}' does not start with a column letter")]
    MissingColumn(String),

    #[error("range '{0}' has an invalid start row")]
    InvalidRow(String),
}

/// Single-column A1 range holding the watch list, e.g. `Sheet1!A2:A`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRange {
    raw: String,
    sheet: Option<String>,
    column: u32,
    start_row: Option<u32>,
}

impl SheetRange {
    pub fn parse(range: &str) -> Result<Self, RangeError> {
        let range = range.trim();
        if range.is_empty() {
            return Err(RangeError::Empty);
        }

        let (sheet, cells) = match range.rsplit_once('!') {
            Some((sheet, cells)) => (Some(sheet.to_string()), cells),
            None => (None, range),
        };

        let start = cells.split(':').next().unwrap_or_default();
        let letters: String = start.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
        // Sheets columns stop at three letters
        if letters.is_empty() || letters.len() > 3 {
            return Err(RangeError::MissingColumn(range.to_string()));
        }

        let digits = &start[letters.len()..];
        let start_row = if digits.is_empty() {
            None
        } else {
            let row = digits
                .parse::<u32>()
                .map_err(|_| RangeError::InvalidRow(range.to_string()))?;
            if row == 0 {
                return Err(RangeError::InvalidRow(range.to_string()));
            }
            Some(row)
        };

        Ok(Self {
            raw: range.to_string(),
            sheet,
            column: column_index(&letters),
            start_row,
        })
    }

    /// The range as configured, used for reading
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn start_row(&self) -> Option<u32> {
        self.start_row
    }

    /// Two-column range immediately right of the watch list column,
    /// starting on the same row: `Sheet1!A2:A` → `Sheet1!B2:C`
    pub fn output_range(&self) -> String {
        let status_col = column_letters(self.column + 1);
        let date_col = column_letters(self.column + 2);
        let row = self.start_row.map(|r| r.to_string()).unwrap_or_default();
        let cells = format!("{}{}:{}", status_col, row, date_col);
        match &self.sheet {
            Some(sheet) => format!("{}!{}", sheet, cells),
            None => cells,
        }
    }
}

impl FromStr for SheetRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// A=1, Z=26, AA=27
fn column_index(letters: &str) -> u32 {
    letters
        .chars()
        .map(|c| c.to_ascii_uppercase() as u32 - 'A' as u32 + 1)
        .fold(0, |acc, n| acc * 26 + n)
}

fn column_letters(mut index: u32) -> String {
    let mut out = Vec::new();
    while index > 0 {
        let rem = (index - 1) % 26;
        out.push((b'A' + rem as u8) as char);
        index = (index - 1) / 26;
    }
    out.iter().rev().collect()
}
