quantity!(Yuan, "¥");

impl Yuan {
    /// Round to fen, the smallest unit a settlement bill carries.
    pub fn round_to_fen(self) -> Self {
        Self((self.0 * 100.0).round() / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_round_to_fen() {
        assert_abs_diff_eq!(Yuan(12.345_6).round_to_fen().0, 12.35);
    }
}
