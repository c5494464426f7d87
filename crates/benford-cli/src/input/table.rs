use benford_core::RawTable;

/// Parse delimited text with the csv crate, honouring quoted fields.
///
/// Rows may have differing widths; short rows simply lack the later columns.
pub fn parse_table(
    text: &str,
    delimiter: char,
    has_headers: bool,
) -> Result<RawTable, Box<dyn std::error::Error>> {
    if !delimiter.is_ascii() {
        return Err(format!("Delimiter must be a single ASCII character, got '{}'", delimiter).into());
    }

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(has_headers)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = if has_headers {
        rdr.headers()?.iter().map(|h| h.trim().to_string()).collect()
    } else {
        Vec::new()
    };

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(String::from).collect::<Vec<String>>());
    }
    tracing::debug!(rows = rows.len(), columns = headers.len(), "parsed input table");

    if has_headers {
        Ok(RawTable::new(headers, rows))
    } else {
        Ok(RawTable::headerless(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quoted_fields() {
        let table = parse_table("name,amount\n\"Smith, J\",\"1,200\"\nDoe,300\n", ',', true).unwrap();
        assert_eq!(table.headers, vec!["name", "amount"]);
        assert_eq!(table.rows[0], vec!["Smith, J", "1,200"]);
        assert_eq!(table.rows[1], vec!["Doe", "300"]);
    }

    #[test]
    fn test_headerless_tab_delimited() {
        let table = parse_table("1\t2\n3\t4\t5\n", '\t', false).unwrap();
        assert_eq!(table.headers, vec!["column_1", "column_2", "column_3"]);
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        assert!(parse_table("a§b", '§', true).is_err());
    }
}
