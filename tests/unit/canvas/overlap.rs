use super::*;
use crate::foundation::core::{CanvasId, FragmentId};

fn frag(id: i64, x: i64, y: i64, w: u32, h: u32) -> Fragment {
    Fragment {
        id: FragmentId(id),
        canvas_id: CanvasId(1),
        rect: Rect::new(x, y, w, h).unwrap(),
        seq: id as u64,
        inserted_at_ms: 0,
    }
}

fn ids(fragments: &[Fragment]) -> Vec<i64> {
    fragments.iter().map(|f| f.id.0).collect()
}

#[test]
fn find_intersecting_preserves_order() {
    let list = vec![
        frag(1, 0, 0, 100, 100),
        frag(2, 500, 500, 10, 10),
        frag(3, 50, 50, 10, 10),
        frag(4, 101, 100, 100, 100),
    ];
    let hit = find_intersecting(&list, Rect::new(20, 20, 90, 90).unwrap());
    assert_eq!(ids(&hit), vec![1, 3, 4]);
}

#[test]
fn find_intersecting_edge_cases() {
    let list = vec![frag(1, 0, 0, 100, 100), frag(2, 101, 100, 100, 100)];
    assert_eq!(
        find_intersecting(&list, Rect::new(20, 20, 30, 30).unwrap()).len(),
        1
    );
    assert_eq!(
        find_intersecting(&list, Rect::new(100, 100, 10, 10).unwrap()).len(),
        2
    );
}

#[test]
fn find_intersecting_disjoint_is_empty() {
    let list = vec![frag(1, 0, 0, 100, 100), frag(2, 103, 100, 100, 100)];
    assert!(find_intersecting(&list, Rect::new(300, 300, 30, 30).unwrap()).is_empty());
    assert!(find_intersecting(&list, Rect::new(101, 0, 1, 99).unwrap()).is_empty());
    assert!(find_intersecting(&[frag(1, 0, 0, 100, 100)], Rect::new(103, 0, 30, 100).unwrap()).is_empty());
}

#[test]
fn prune_reports_identical_predecessor() {
    let a = frag(1, 0, 0, 100, 100);
    let b = frag(2, 0, 0, 100, 100);
    let pruned = prune_contained(&[a, b], &b);
    assert_eq!(ids(&pruned), vec![1]);
}

#[test]
fn prune_keeps_partial_overlaps_and_self() {
    let list = vec![
        frag(1, 10, 10, 20, 20),
        frag(2, 40, 40, 30, 30),
        frag(3, 200, 200, 5, 5),
        frag(4, 0, 0, 50, 50),
    ];
    let pruned = prune_contained(&list, &list[3]);
    assert_eq!(ids(&pruned), vec![1]);
}

#[test]
fn prune_never_reports_newer_fragments() {
    let newer = frag(9, 10, 10, 5, 5);
    let candidate = frag(5, 0, 0, 50, 50);
    assert!(prune_contained(&[candidate, newer], &candidate).is_empty());
}
