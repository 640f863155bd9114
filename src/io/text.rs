use crate::io::{Row, cell::Cell};

/// Split page text into positional columns on whitespace runs.
///
/// Blank lines are dropped.
pub fn rows_from_text(text: &str) -> Vec<Row> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split_whitespace().map(Cell::from).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_from_text() {
        let rows = rows_from_text("科目  电量   电价\n\n 中长期合约 1,200 350.5 \n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec![Cell::from("中长期合约"), Cell::from("1,200"), Cell::from("350.5")]);
    }
}
