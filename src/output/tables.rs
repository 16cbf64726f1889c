//! Table rendering using comfy-table

use crate::bench::summary::{MedianRow, NOT_AVAILABLE};
use comfy_table::{
    presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, ContentArrangement, Table,
};

/// Format a table with headers and rows, indented for the terminal
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).add_attribute(Attribute::Bold).fg(Color::Cyan))
        .collect();
    table.set_header(header_cells);

    for row in rows {
        let cells: Vec<Cell> = row
            .iter()
            .map(|cell_text| {
                let mut cell = Cell::new(cell_text);
                if cell_text == NOT_AVAILABLE {
                    cell = cell.fg(Color::DarkGrey);
                } else if cell_text.parse::<f64>().is_ok() {
                    cell = cell.set_alignment(CellAlignment::Right);
                }
                cell
            })
            .collect();
        table.add_row(cells);
    }

    let mut out = String::new();
    for line in table.to_string().lines() {
        out.push_str(&format!("    {}\n", line));
    }
    out
}

/// Rows of the median table as display strings
pub fn median_table_rows(medians: &[MedianRow]) -> Vec<Vec<String>> {
    medians
        .iter()
        .map(|m| {
            vec![
                m.algorithm.clone(),
                m.metric.clone(),
                m.size_or_key.clone(),
                format!("{}/{}", m.available, m.trials),
                m.median_display(),
            ]
        })
        .collect()
}

/// Print the per-(algorithm, metric, size) median table
pub fn print_median_table(medians: &[MedianRow]) {
    let headers = ["Algorithm", "Metric", "Size/Key", "Trials", "Median"];
    print!("{}", format_table(&headers, &median_table_rows(medians)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_rows() {
        let rows = median_table_rows(&[MedianRow {
            algorithm: "rc4".to_string(),
            metric: "MB/s".to_string(),
            size_or_key: "16384B".to_string(),
            available: 0,
            trials: 3,
            median: None,
        }]);
        assert_eq!(
            rows[0],
            vec!["rc4", "MB/s", "16384B", "0/3", "not available"]
        );
    }

    #[test]
    fn test_format_table_contains_cells() {
        let out = format_table(&["A", "B"], &[vec!["x".to_string(), "1.000".to_string()]]);
        assert!(out.contains('x'));
        assert!(out.contains("1.000"));
    }
}
