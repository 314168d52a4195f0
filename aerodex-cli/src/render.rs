//! Plain-text output.

use std::fmt::Write;

use aerodex_directory::Airport;

const HEADERS: [&str; 4] = ["IATA", "NAME", "CITY", "COUNTRY"];

/// Airports as an aligned table, one row per airport, no trailing newline.
pub fn table(airports: &[Airport]) -> String {
    let rows: Vec<[&str; 4]> = airports
        .iter()
        .map(|a| [a.iata.as_str(), a.name.as_str(), a.city.as_str(), a.country.as_str()])
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in std::iter::once(HEADERS).chain(rows) {
        let mut line = String::new();
        for (cell, width) in row.iter().zip(widths) {
            let _ = write!(line, "{cell:<width$}  ");
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(line.trim_end());
    }
    out
}

/// One-line summary of a search.
pub fn summary(query: &str, shown: usize, complete: bool) -> String {
    let query = if query.is_empty() { "(all)" } else { query };
    let more = if complete { "" } else { ", more available" };
    format!("{shown} airport(s) for {query}{more}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_aligns_columns() {
        let airports = vec![
            Airport::new("BER", "Berlin Brandenburg Airport", "Berlin", "Germany"),
            Airport::new("SIN", "Singapore Changi Airport", "Singapore", "Singapore"),
        ];
        let expected = "\
IATA  NAME                        CITY       COUNTRY
BER   Berlin Brandenburg Airport  Berlin     Germany
SIN   Singapore Changi Airport    Singapore  Singapore";
        assert_eq!(table(&airports), expected);
    }

    #[test]
    fn test_table_counts_characters_not_bytes() {
        let airports = vec![Airport::new("GRU", "Guarulhos", "São Paulo", "Brasil")];
        let rendered = table(&airports);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0].find("COUNTRY"), Some(lines[1].find("Brasil").unwrap() - 1));
    }

    #[test]
    fn test_empty_table_is_header_only() {
        assert_eq!(table(&[]), "IATA  NAME  CITY  COUNTRY");
    }

    #[test]
    fn test_summary() {
        assert_eq!(summary("berlin", 2, true), "2 airport(s) for berlin");
        assert_eq!(summary("", 20, false), "20 airport(s) for (all), more available");
    }
}
