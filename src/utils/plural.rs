//! Count formatting for log lines.

/// Format a count with its noun: `1 file`, `3 files`, `0 files`.
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "byte"), "0 bytes");
        assert_eq!(plural_count(1, "static file"), "1 static file");
        assert_eq!(plural_count(12, "static file"), "12 static files");
    }
}
