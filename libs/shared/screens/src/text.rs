/// Splits one operator command into its leading word and the remainder,
/// both trimmed. The remainder keeps internal whitespace so free-text
/// values survive (`set reason Routine follow up`).
pub fn split_first_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.find(char::is_whitespace) {
        Some(at) => (&input[..at], input[at..].trim_start()),
        None => (input, ""),
    }
}

/// Fixed-width text table. Column widths stretch to the widest cell.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return "  (no records)\n".to_string();
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() && cell.len() > widths[i] {
                widths[i] = cell.len();
            }
        }
    }

    let mut out = String::new();
    out.push_str("  ");
    for (i, header) in headers.iter().enumerate() {
        out.push_str(&format!("{:<width$}  ", header, width = widths[i]));
    }
    out.push('\n');

    for row in rows {
        out.push_str("  ");
        for (i, cell) in row.iter().enumerate() {
            let width = widths.get(i).copied().unwrap_or(cell.len());
            out.push_str(&format!("{:<width$}  ", cell, width = width));
        }
        out.push('\n');
    }

    out
}

/// The one-line pager summary under every list: which page of how many, and
/// the element total the envelope reported.
pub fn pager_line(number: u32, total_pages: u32, total_elements: u64) -> String {
    if total_pages == 0 {
        return format!("  Page 1 of 1 ({} records)", total_elements);
    }
    format!(
        "  Page {} of {} ({} records)",
        number + 1,
        total_pages,
        total_elements
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_pads_columns_to_the_widest_cell() {
        let out = render_table(
            &["ID", "NAME"],
            &[
                vec!["1".to_string(), "Alice Reed".to_string()],
                vec!["2".to_string(), "Bo".to_string()],
            ],
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("NAME"));
        assert!(lines[1].contains("Alice Reed"));
    }

    #[test]
    fn empty_table_states_it() {
        assert!(render_table(&["ID"], &[]).contains("no records"));
    }

    #[test]
    fn pager_is_one_based_for_display() {
        assert_eq!(pager_line(2, 3, 25), "  Page 3 of 3 (25 records)");
        assert_eq!(pager_line(0, 0, 0), "  Page 1 of 1 (0 records)");
    }

    #[test]
    fn command_split_preserves_the_remainder() {
        assert_eq!(split_first_word("set reason Routine follow up"), ("set", "reason Routine follow up"));
        assert_eq!(split_first_word("  submit  "), ("submit", ""));
        assert_eq!(split_first_word(""), ("", ""));
    }
}
