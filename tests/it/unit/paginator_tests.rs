//! Unit tests for paginator module.

use castboard::paginator::{PageBound, PaginatorEvent, PaginatorState, range_display_text};

fn paginator(total_pages: u32, bound: PageBound) -> PaginatorState {
    let mut p = PaginatorState::new(50, vec![10, 20, 50]).with_bound(bound);
    p.set_total_pages(total_pages);
    p
}

#[test]
fn test_range_display_text() {
    assert_eq!(range_display_text(1, 50, 0), "Page 0 of 0");
    assert_eq!(range_display_text(1, 0, 7), "Page 0 of 7");
    assert_eq!(range_display_text(0, 50, 7), "Page 1 of 7");
    assert_eq!(range_display_text(1, 50, 10), "Page 51 of 10");
    assert_eq!(range_display_text(3, 20, 9), "Page 61 of 9");
}

#[test]
fn test_range_display_text_does_not_overflow() {
    assert_eq!(
        range_display_text(u32::MAX, u32::MAX, 1),
        format!("Page {} of 1", u64::from(u32::MAX) * u64::from(u32::MAX) + 1)
    );
}

#[test]
fn test_exclusive_bound() {
    let mut p = paginator(3, PageBound::Exclusive);
    assert!(p.is_reachable(1));
    assert!(p.is_reachable(2));
    assert!(!p.is_reachable(3));
    assert!(!p.is_reachable(0));
    assert_eq!(p.request_page_change(3), None);
    assert_eq!(p.current_page(), 1);
}

#[test]
fn test_inclusive_bound_reaches_last_page() {
    let mut p = paginator(3, PageBound::Inclusive);
    assert_eq!(p.request_page_change(3), Some(PaginatorEvent::PageChanged(3)));
    assert!(!p.can_go_next());
    assert!(p.can_go_prev());
    assert_eq!(p.request_page_change(4), None);
}

#[test]
fn test_single_page_blocks_navigation() {
    let mut p = paginator(1, PageBound::Exclusive);
    assert!(!p.can_go_next());
    assert!(!p.can_go_prev());
    assert_eq!(p.request_page_change(1), None);
}

#[test]
fn test_set_total_pages_always_resets() {
    let mut p = paginator(10, PageBound::Exclusive);
    p.request_page_change(7);
    assert!(p.set_total_pages(10));
    assert_eq!(p.current_page(), 1);
    assert!(!p.set_total_pages(4));
}

#[test]
fn test_page_size_change_is_always_accepted() {
    let mut p = paginator(10, PageBound::Exclusive);
    p.request_page_change(4);
    assert_eq!(p.request_page_size_change(33), PaginatorEvent::PageSizeChanged(33));
    assert_eq!(p.page_size(), 33);
    // The caller decides where to go next.
    assert_eq!(p.current_page(), 4);
    assert!(p.reset_page());
    assert!(!p.reset_page());
}

#[test]
fn test_selectable_page_sizes() {
    let mut p = PaginatorState::new(50, vec![100, 10, 20]);
    assert_eq!(p.selectable_page_sizes(), [10, 20, 50, 100]);

    p.set_page_size_options(vec![50, 10]);
    assert_eq!(p.selectable_page_sizes(), [10, 50]);
}

#[test]
fn test_range_label() {
    let mut p = paginator(10, PageBound::Exclusive);
    p.request_page_change(2);
    assert_eq!(p.range_label(500), "Page 101 of 500");
}
