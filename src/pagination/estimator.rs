//! Total-count reconciliation for the pagination footer.

/// Reconcile the server's reported total with what has actually been seen.
///
/// When the server still hands out a cursor but claims no more records than
/// are already cached, its count is stale. In that case the estimate becomes
/// `cached_len + page_limit` so the "next" control stays usable; the figure
/// is advisory and may overshoot until the real end is reached.
pub fn estimate_count(
    reported_count: usize,
    cached_len: usize,
    has_more: bool,
    page_limit: usize,
) -> usize {
    if has_more && reported_count <= cached_len {
        cached_len + page_limit
    } else {
        reported_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_count_is_corrected() {
        assert_eq!(estimate_count(5, 8, true, 10), 18);
    }

    #[test]
    fn test_equal_count_with_cursor_is_stale() {
        assert_eq!(estimate_count(20, 20, true, 10), 30);
    }

    #[test]
    fn test_trustworthy_count_passes_through() {
        assert_eq!(estimate_count(25, 10, true, 10), 25);
    }

    #[test]
    fn test_exhausted_list_keeps_reported_count() {
        assert_eq!(estimate_count(5, 8, false, 10), 5);
        assert_eq!(estimate_count(0, 0, false, 10), 0);
    }
}
