//! Table and JSON rendering

use serde::Serialize;

use crate::Result;

/// Pretty-prints a report as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Box-drawn text table.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates an empty table with the given column headers.
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Two-column label/value table.
    pub fn key_value<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::new(&["Field", "Value"]);
        for (k, v) in pairs {
            table.row(vec![k.into(), v.into()]);
        }
        table
    }

    /// Appends a row; missing cells render empty.
    pub fn row(&mut self, cells: Vec<String>) -> &mut Self {
        self.rows.push(cells);
        self
    }

    /// Renders the table.
    pub fn render(&self) -> String {
        let placeholder = vec!["(no data)".to_string()];
        let body: Vec<&Vec<String>> = if self.rows.is_empty() {
            vec![&placeholder]
        } else {
            self.rows.iter().collect()
        };

        let widths: Vec<usize> = (0..self.headers.len())
            .map(|i| {
                body.iter()
                    .filter_map(|r| r.get(i))
                    .chain(std::iter::once(&self.headers[i]))
                    .map(|c| c.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let rule = |left: &str, mid: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{}{}{}", left, segments.join(mid), right)
        };
        let line = |cells: &[String]| {
            let padded: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, w)| {
                    let cell = cells.get(i).map(String::as_str).unwrap_or("");
                    format!(" {:<width$} ", cell, width = *w)
                })
                .collect();
            format!("│{}│", padded.join("│"))
        };

        let mut out = vec![rule("┌", "┬", "┐"), line(&self.headers), rule("├", "┼", "┤")];
        out.extend(body.iter().map(|r| line(r)));
        out.push(rule("└", "┴", "┘"));
        out.join("\n")
    }

    /// Prints the table on stdout, preceded by an optional title.
    pub fn print(&self, title: Option<&str>) {
        if let Some(title) = title {
            println!("\n{}", title);
        }
        println!("{}", self.render());
    }
}

/// Fixed-point number formatting.
pub fn num(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

/// Percentage formatting of a fraction (`0.2` → `20.00%`).
pub fn pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_aligns_columns() {
        let mut table = Table::new(&["Strike", "Pain"]);
        table.row(vec!["21900".into(), "1.5".into()]);
        table.row(vec!["22000".into(), "₹120".into()]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "│ Strike │ Pain │");
        assert_eq!(lines[4], "│ 22000  │ ₹120 │");
        let width = lines[0].chars().count();
        assert!(lines.iter().all(|l| l.chars().count() == width));
    }

    #[test]
    fn test_empty_table() {
        let rendered = Table::new(&["Strike", "Signal"]).render();
        assert!(rendered.contains("(no data)"));
    }

    #[test]
    fn test_formatting() {
        assert_eq!(num(567.35884, 2), "567.36");
        assert_eq!(pct(0.2), "20.00%");
        assert_eq!(pct(-0.25), "-25.00%");
    }
}
