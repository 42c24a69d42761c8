use super::*;
use crate::foundation::core::Rect;

fn new_fragment(canvas_id: CanvasId, x: i64, y: i64, w: u32, h: u32) -> NewFragment {
    NewFragment {
        canvas_id,
        rect: Rect::new(x, y, w, h).unwrap(),
    }
}

#[test]
fn canvas_lifecycle() {
    let mut store = InMemoryMetadataStore::new();
    let a = store.insert_canvas(100, 50).unwrap();
    let b = store.insert_canvas(10, 10).unwrap();
    assert_ne!(a.id, b.id);
    assert_eq!(store.get_canvas(a.id).unwrap(), a);

    store.delete_canvas(a.id).unwrap();
    assert!(store.get_canvas(a.id).unwrap_err().is_not_found());
    assert!(store.delete_canvas(a.id).unwrap_err().is_not_found());
    assert_eq!(store.get_canvas(b.id).unwrap(), b);
}

#[test]
fn fragments_listed_in_insertion_order() {
    let mut store = InMemoryMetadataStore::new();
    let c = store.insert_canvas(100, 100).unwrap();
    let other = store.insert_canvas(100, 100).unwrap();

    let f1 = store.insert_fragment(new_fragment(c.id, 50, 50, 10, 10)).unwrap();
    let f2 = store.insert_fragment(new_fragment(other.id, 0, 0, 10, 10)).unwrap();
    let f3 = store.insert_fragment(new_fragment(c.id, 0, 0, 10, 10)).unwrap();
    assert!(f1.seq < f2.seq && f2.seq < f3.seq);

    let listed = store.list_fragments(c.id).unwrap();
    assert_eq!(listed, vec![f1, f3]);
    assert_eq!(store.get_fragment(f2.id).unwrap(), f2);
}

#[test]
fn fragment_needs_existing_canvas() {
    let mut store = InMemoryMetadataStore::new();
    let err = store
        .insert_fragment(new_fragment(CanvasId(99), 0, 0, 1, 1))
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn deleting_canvas_cascades_to_fragments() {
    let mut store = InMemoryMetadataStore::new();
    let c = store.insert_canvas(100, 100).unwrap();
    let f = store.insert_fragment(new_fragment(c.id, 0, 0, 5, 5)).unwrap();

    store.delete_canvas(c.id).unwrap();
    assert!(store.get_fragment(f.id).unwrap_err().is_not_found());
    assert!(store.list_fragments(c.id).unwrap().is_empty());
}

#[test]
fn delete_fragment_reports_absence() {
    let mut store = InMemoryMetadataStore::new();
    let c = store.insert_canvas(100, 100).unwrap();
    let f = store.insert_fragment(new_fragment(c.id, 0, 0, 5, 5)).unwrap();
    store.delete_fragment(f.id).unwrap();
    assert!(store.delete_fragment(f.id).unwrap_err().is_not_found());
}

#[test]
fn seq_keeps_growing_after_deletes() {
    let mut store = InMemoryMetadataStore::new();
    let c = store.insert_canvas(100, 100).unwrap();
    let f1 = store.insert_fragment(new_fragment(c.id, 0, 0, 5, 5)).unwrap();
    store.delete_fragment(f1.id).unwrap();
    let f2 = store.insert_fragment(new_fragment(c.id, 0, 0, 5, 5)).unwrap();
    assert!(f2.seq > f1.seq);
    assert_ne!(f2.id, f1.id);
}
