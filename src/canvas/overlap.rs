use crate::{
    canvas::model::Fragment,
    foundation::core::{Rect, contains, intersects},
};

/// Fragments whose bounding box intersects `target`, in input order.
///
/// `fragments` is expected oldest-first, so the result is too.
pub fn find_intersecting(fragments: &[Fragment], target: Rect) -> Vec<Fragment> {
    fragments
        .iter()
        .filter(|f| intersects(f.rect, target))
        .copied()
        .collect()
}

/// Fragments made permanently invisible by `new_fragment`.
///
/// Every other fragment that `new_fragment` fully covers is returned. Partial overlaps are left
/// alone. Only fragments inserted before `new_fragment` qualify: a newer fragment always paints over
/// it and is never occluded by it.
pub fn prune_contained(fragments: &[Fragment], new_fragment: &Fragment) -> Vec<Fragment> {
    find_intersecting(fragments, new_fragment.rect)
        .into_iter()
        .filter(|f| f.id != new_fragment.id && f.seq < new_fragment.seq)
        .filter(|f| contains(new_fragment.rect, f.rect))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/overlap.rs"]
mod tests;
