use std::collections::HashMap;

use crate::errors::{ReconcileError, Result};

/// Cell value the sheets use for failed lookups; counts as empty.
pub const NOT_AVAILABLE: &str = "#N/A";

/// Header-indexed view over a raw string matrix whose first row holds the headers.
#[derive(Debug, Clone)]
pub struct SheetTable {
    headers: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl SheetTable {
    pub fn new(mut data: Vec<Vec<String>>) -> Result<Self> {
        if data.is_empty() {
            return Err(ReconcileError::invalid_format("Sheet has no header row"));
        }

        let header_row = data.remove(0);
        Ok(Self {
            headers: index_headers(&header_row),
            rows: data,
        })
    }

    /// Case-insensitive header lookup. Duplicate headers resolve to the first column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.get(&name.to_uppercase()).copied()
    }

    /// Non-empty data rows, in sheet order.
    pub fn rows(&self) -> SheetRows<'_> {
        SheetRows {
            headers: &self.headers,
            inner: self.rows.iter(),
        }
    }

    fn header_list(&self) -> String {
        describe_headers(&self.headers)
    }
}

// Some sheets carry both "Rank" and "RANK"; the first one is kept.
fn index_headers(header_row: &[String]) -> HashMap<String, usize> {
    let mut headers = HashMap::new();
    for (index, value) in header_row.iter().enumerate() {
        headers.entry(value.to_uppercase()).or_insert(index);
    }
    headers
}

fn describe_headers(headers: &HashMap<String, usize>) -> String {
    let mut known: Vec<(&String, &usize)> = headers.iter().collect();
    known.sort_by_key(|(_, index)| **index);
    known
        .into_iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Single-pass iterator over the non-empty rows of a [`SheetTable`].
pub struct SheetRows<'a> {
    headers: &'a HashMap<String, usize>,
    inner: std::slice::Iter<'a, Vec<String>>,
}

impl<'a> SheetRows<'a> {
    /// Stop before the first row whose `header` cell equals `marker`, ignoring case.
    pub fn until_marker(self, header: &'a str, marker: &'a str) -> impl Iterator<Item = SheetRow<'a>> {
        self.take_while(move |row| {
            !matches!(
                row.optional_column(header),
                Ok(Some(value)) if value.trim().eq_ignore_ascii_case(marker)
            )
        })
    }
}

impl<'a> Iterator for SheetRows<'a> {
    type Item = SheetRow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let headers = self.headers;
        self.inner
            .by_ref()
            .map(|cells| SheetRow { headers, cells })
            .find(|row| !row.is_empty())
    }
}

/// One data row with access to its table's header index.
#[derive(Debug, Clone, Copy)]
pub struct SheetRow<'a> {
    headers: &'a HashMap<String, usize>,
    cells: &'a [String],
}

impl<'a> SheetRow<'a> {
    pub fn required_column(&self, name: &str) -> Result<&'a str> {
        let index = self.headers.get(&name.to_uppercase()).copied().ok_or_else(|| {
            ReconcileError::invalid_format(format!(
                "Sheet is missing a header. Needed: {} Had: {}",
                name,
                describe_headers(self.headers)
            ))
        })?;
        self.cell(index)
    }

    pub fn optional_column(&self, name: &str) -> Result<Option<&'a str>> {
        match self.headers.get(&name.to_uppercase()) {
            Some(&index) => self.cell(index).map(Some),
            None => Ok(None),
        }
    }

    /// True when every cell is blank or `#N/A`.
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|cell| cell.is_empty() || cell == NOT_AVAILABLE)
    }

    // The values API drops trailing empty cells, so a row ending right at the index reads as blank.
    fn cell(&self, index: usize) -> Result<&'a str> {
        if self.cells.len() < index {
            return Err(ReconcileError::invalid_format(format!(
                "Row had too few columns. Needed: {} Had: {}",
                index,
                self.cells.len()
            )));
        }
        Ok(self.cells.get(index).map(String::as_str).unwrap_or(""))
    }
}

impl std::fmt::Display for SheetTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] x {} rows", self.header_list(), self.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> SheetTable {
        SheetTable::new(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn first_duplicate_header_wins() {
        let t = table(&[&["Name", "Rank", "Name"], &["a", "1", "b"]]);

        assert_eq!(t.column_index("Name"), Some(0));
        assert_eq!(t.column_index("NAME"), Some(0));
        assert_eq!(t.column_index("rank"), Some(1));

        let row = t.rows().next().unwrap();
        assert_eq!(row.required_column("name").unwrap(), "a");
    }

    #[test]
    fn empty_matrix_is_invalid() {
        assert!(matches!(
            SheetTable::new(Vec::new()),
            Err(ReconcileError::InvalidFormat(_))
        ));
    }

    #[test]
    fn missing_header_fails_required_but_not_optional() {
        let t = table(&[&["Name"], &["a"]]);
        let row = t.rows().next().unwrap();

        assert!(matches!(
            row.required_column("OMW%"),
            Err(ReconcileError::InvalidFormat(_))
        ));
        assert_eq!(row.optional_column("OMW%").unwrap(), None);
    }

    #[test]
    fn short_rows_fail_both_lookups() {
        let t = table(&[&["A", "B", "C", "D"], &["x"]]);
        let row = t.rows().next().unwrap();

        assert!(row.required_column("D").is_err());
        assert!(row.optional_column("D").is_err());
    }

    #[test]
    fn truncated_trailing_cell_reads_blank() {
        let t = table(&[&["A", "B"], &["x"]]);
        let row = t.rows().next().unwrap();

        assert_eq!(row.required_column("B").unwrap(), "");
    }

    #[test]
    fn blank_and_not_available_rows_are_skipped() {
        let t = table(&[
            &["Name", "Rank"],
            &["", ""],
            &["#N/A", ""],
            &["a", "1"],
            &[],
            &["b", "#N/A"],
        ]);

        let names: Vec<_> = t
            .rows()
            .map(|r| r.required_column("Name").unwrap())
            .collect();

        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn rows_restart_from_the_same_table() {
        let t = table(&[&["Name"], &["a"], &["b"]]);
        assert_eq!(t.rows().count(), 2);
        assert_eq!(t.rows().count(), 2);
    }

    #[test]
    fn marker_row_truncates() {
        let t = table(&[
            &["Player Name", "Rank"],
            &["a", "1"],
            &["b", "2"],
            &["Entropy", ""],
            &["notes", "x"],
        ]);

        let names: Vec<_> = t
            .rows()
            .until_marker("PLAYER NAME", "ENTROPY")
            .map(|r| r.required_column("Player Name").unwrap())
            .collect();

        assert_eq!(names, vec!["a", "b"]);
    }
}
