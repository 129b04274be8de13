//! Markdown pipe tables.

/// A simple table with a header row, rendered as `| a | b |` lines.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Missing cells are rendered empty, extra cells are dropped.
    pub fn add_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    /// Render the header, separator and one line per row.
    pub fn render(&self) -> String {
        let mut output = String::new();

        output.push_str(&format_line(&self.headers, self.headers.len()));
        output.push_str(&format!("|{}\n", ":---|".repeat(self.headers.len())));
        for row in &self.rows {
            output.push_str(&format_line(row, self.headers.len()));
        }

        output
    }
}

fn format_line(cells: &[String], columns: usize) -> String {
    let cells: Vec<&str> = (0..columns)
        .map(|i| cells.get(i).map(String::as_str).unwrap_or(""))
        .collect();
    format!("| {} |\n", cells.join(" | "))
}
