use bookstore::catalog::Page;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_clamped_page_and_limit_are_positive(page in any::<i64>(), limit in any::<i64>()) {
        let p = Page::clamped(page, limit);
        prop_assert!(p.page >= 1);
        prop_assert!(p.limit >= 1);
    }

    #[test]
    fn prop_offset_matches_slice_arithmetic(page in 1i64..10_000, limit in 1i64..10_000) {
        let p = Page::clamped(page, limit);
        prop_assert_eq!(p.offset(), (page as u64 - 1) * limit as u64);
    }

    #[test]
    fn prop_consecutive_pages_tile_without_overlap(page in 1i64..10_000, limit in 1i64..10_000) {
        let a = Page::clamped(page, limit);
        let b = Page::clamped(page + 1, limit);
        prop_assert_eq!(a.offset() + a.limit as u64, b.offset());
    }
}
