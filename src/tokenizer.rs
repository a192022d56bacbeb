//! CSV tokenizer for spreadsheet exports.
//!
//! Splits raw comma-separated text into rows of trimmed string cells. Quoted cells may
//! contain commas, line breaks, and `""`-escaped quotes. Rows whose cells are all empty
//! are dropped.

/// Tokenize a whole CSV payload into rows of cells.
pub fn tokenize(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    // Escaped quote
                    cell.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                row.push(cell.trim().to_string());
                cell.clear();
            }
            '\r' | '\n' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(cell.trim().to_string());
                cell.clear();
                push_row(&mut rows, std::mem::take(&mut row));
            }
            _ => cell.push(ch),
        }
    }

    // Trailing data without a final line terminator
    if !cell.is_empty() || !row.is_empty() {
        row.push(cell.trim().to_string());
        push_row(&mut rows, row);
    }

    rows
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    if row.iter().any(|c| !c.is_empty()) {
        rows.push(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_fields() {
        let rows = tokenize(r#"A,"B, with comma","C ""quoted"" text""#);
        assert_eq!(rows, vec![vec!["A", "B, with comma", "C \"quoted\" text"]]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("\n\r\n").is_empty());
    }

    #[test]
    fn test_crlf_and_lf_terminators() {
        let rows = tokenize("a,b\r\nc,d\ne,f");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"], vec!["e", "f"]]);
    }

    #[test]
    fn test_newline_inside_quotes_is_kept() {
        let rows = tokenize("name,notes\r\nAudit,\"line one\nline two\"\r\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["Audit", "line one\nline two"]);
    }

    #[test]
    fn test_blank_rows_dropped() {
        let rows = tokenize("h1,h2\n , \n,\nx,y\n");
        assert_eq!(rows, vec![vec!["h1", "h2"], vec!["x", "y"]]);
    }

    #[test]
    fn test_cells_are_trimmed_and_trailing_empty_cell_kept() {
        let rows = tokenize("  a , b ,\n");
        assert_eq!(rows, vec![vec!["a", "b", ""]]);
    }
}
