//! Rendering-surface capability interface.
//!
//! The reorderer, the gallery and the tween engine never touch the terminal
//! directly.  They read layout with [`Surface::measure`] and write visual
//! state through the setters here, which keeps every transition testable
//! against the in-memory [`GridSurface`].

use std::collections::HashMap;

use super::geometry::{Bounds, Lerp, Transform};

/// Stable identity of an element on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

/// Which animatable property a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prop {
    Transform,
    Opacity,
    Bounds,
    /// Free scalar channel (counter values, revealed character counts…).
    Value,
}

/// A value for one [`Prop`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropValue {
    Transform(Transform),
    Opacity(f64),
    Bounds(Bounds),
    Value(f64),
}

impl PropValue {
    pub fn prop(&self) -> Prop {
        match self {
            PropValue::Transform(_) => Prop::Transform,
            PropValue::Opacity(_) => Prop::Opacity,
            PropValue::Bounds(_) => Prop::Bounds,
            PropValue::Value(_) => Prop::Value,
        }
    }
}

impl Lerp for PropValue {
    /// Mismatched variants snap to `to`.
    fn lerp(self, to: Self, t: f64) -> Self {
        match (self, to) {
            (PropValue::Transform(a), PropValue::Transform(b)) => {
                PropValue::Transform(a.lerp(b, t))
            }
            (PropValue::Opacity(a), PropValue::Opacity(b)) => PropValue::Opacity(a.lerp(b, t)),
            (PropValue::Bounds(a), PropValue::Bounds(b)) => PropValue::Bounds(a.lerp(b, t)),
            (PropValue::Value(a), PropValue::Value(b)) => PropValue::Value(a.lerp(b, t)),
            (_, to) => to,
        }
    }
}

/// What a transition needs from the host renderer.
///
/// Unknown ids are ignored by setters and yield `None` from getters; callers
/// treat that as "anchor missing" and fail soft.
pub trait Surface {
    /// On-screen bounds including the current transform, or `None` when the
    /// element is unknown or hidden.
    fn measure(&self, id: ElementId) -> Option<Bounds>;

    fn transform(&self, id: ElementId) -> Option<Transform>;
    fn set_transform(&mut self, id: ElementId, transform: Transform);

    fn opacity(&self, id: ElementId) -> Option<f64>;
    fn set_opacity(&mut self, id: ElementId, opacity: f64);

    /// Layout box of a free-positioned element.  Grid children ignore this.
    fn set_bounds(&mut self, id: ElementId, bounds: Bounds);
    fn layout_bounds(&self, id: ElementId) -> Option<Bounds>;

    fn is_visible(&self, id: ElementId) -> bool;
    fn set_visible(&mut self, id: ElementId, visible: bool);

    fn value(&self, id: ElementId) -> Option<f64>;
    fn set_value(&mut self, id: ElementId, value: f64);

    /// Children of a container in layout order.
    fn children(&self, container: ElementId) -> Option<Vec<ElementId>>;

    /// Re-append the container's children in `order`.  Ids that are not
    /// children of `container` are skipped; children missing from `order`
    /// keep their relative order at the end.
    fn reorder_children(&mut self, container: ElementId, order: &[ElementId]);

    fn read(&self, id: ElementId, prop: Prop) -> Option<PropValue> {
        match prop {
            Prop::Transform => self.transform(id).map(PropValue::Transform),
            Prop::Opacity => self.opacity(id).map(PropValue::Opacity),
            Prop::Bounds => self.layout_bounds(id).map(PropValue::Bounds),
            Prop::Value => self.value(id).map(PropValue::Value),
        }
    }

    fn write(&mut self, id: ElementId, value: PropValue) {
        match value {
            PropValue::Transform(t) => self.set_transform(id, t),
            PropValue::Opacity(o) => self.set_opacity(id, o),
            PropValue::Bounds(b) => self.set_bounds(id, b),
            PropValue::Value(v) => self.set_value(id, v),
        }
    }
}

// ───────────────────────────────────────── grid surface ──────

/// Wrapping grid of equally sized cells.
#[derive(Debug, Clone)]
struct GridContainer {
    area: Bounds,
    cell_width: f64,
    cell_height: f64,
    gap_x: f64,
    gap_y: f64,
    children: Vec<ElementId>,
}

impl GridContainer {
    fn columns(&self) -> usize {
        let stride = self.cell_width + self.gap_x;
        if stride <= 0.0 {
            return 1;
        }
        (((self.area.width + self.gap_x) / stride).floor() as usize).max(1)
    }

    fn slot(&self, index: usize) -> Bounds {
        let cols = self.columns();
        let (row, col) = (index / cols, index % cols);
        Bounds::new(
            self.area.x + col as f64 * (self.cell_width + self.gap_x),
            self.area.y + row as f64 * (self.cell_height + self.gap_y),
            self.cell_width,
            self.cell_height,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Placement {
    Slot(ElementId),
    Free(Bounds),
}

#[derive(Debug, Clone)]
struct Node {
    placement: Placement,
    transform: Transform,
    opacity: f64,
    visible: bool,
    value: f64,
}

impl Node {
    fn new(placement: Placement) -> Self {
        Self {
            placement,
            transform: Transform::IDENTITY,
            opacity: 1.0,
            visible: true,
            value: 0.0,
        }
    }
}

/// In-memory layout model the TUI renders from.
///
/// Grid children are positioned by their index in the container; free
/// elements carry their own box.  Both get the node's transform on top.
#[derive(Debug, Clone, Default)]
pub struct GridSurface {
    containers: HashMap<ElementId, GridContainer>,
    nodes: HashMap<ElementId, Node>,
    next_id: u32,
}

impl GridSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a grid container covering `area` with `cell` sized slots.
    pub fn add_grid(&mut self, area: Bounds, cell: (f64, f64), gap: (f64, f64)) -> ElementId {
        let id = self.alloc();
        self.containers.insert(
            id,
            GridContainer {
                area,
                cell_width: cell.0,
                cell_height: cell.1,
                gap_x: gap.0,
                gap_y: gap.1,
                children: Vec::new(),
            },
        );
        id
    }

    /// Append a new child to `container`.  Returns `None` for an unknown
    /// container.
    pub fn add_child(&mut self, container: ElementId) -> Option<ElementId> {
        if !self.containers.contains_key(&container) {
            return None;
        }
        let id = self.alloc();
        self.containers.get_mut(&container)?.children.push(id);
        self.nodes.insert(id, Node::new(Placement::Slot(container)));
        Some(id)
    }

    /// Add a free-positioned element.  Starts hidden.
    pub fn add_free(&mut self, bounds: Bounds) -> ElementId {
        let id = self.alloc();
        let mut node = Node::new(Placement::Free(bounds));
        node.visible = false;
        self.nodes.insert(id, node);
        id
    }

    /// Drop an element (or a whole grid) from the surface.
    pub fn remove(&mut self, id: ElementId) {
        if let Some(c) = self.containers.remove(&id) {
            for child in c.children {
                self.nodes.remove(&child);
            }
            return;
        }
        if let Some(Node {
            placement: Placement::Slot(container),
            ..
        }) = self.nodes.remove(&id)
        {
            if let Some(c) = self.containers.get_mut(&container) {
                c.children.retain(|&child| child != id);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Re-flow a grid into a new area (terminal resize).
    pub fn set_grid_area(&mut self, container: ElementId, area: Bounds) {
        if let Some(c) = self.containers.get_mut(&container) {
            c.area = area;
        }
    }

    pub fn grid_area(&self, container: ElementId) -> Option<Bounds> {
        self.containers.get(&container).map(|c| c.area)
    }

    /// Number of grid columns at the current area.
    pub fn columns(&self, container: ElementId) -> Option<usize> {
        self.containers.get(&container).map(GridContainer::columns)
    }

    /// Layout bounds without the transform.
    fn natural(&self, id: ElementId) -> Option<Bounds> {
        match self.nodes.get(&id)?.placement {
            Placement::Free(b) => Some(b),
            Placement::Slot(container) => {
                let c = self.containers.get(&container)?;
                let index = c.children.iter().position(|&child| child == id)?;
                Some(c.slot(index))
            }
        }
    }
}

impl Surface for GridSurface {
    fn measure(&self, id: ElementId) -> Option<Bounds> {
        if let Some(c) = self.containers.get(&id) {
            return Some(c.area);
        }
        let node = self.nodes.get(&id)?;
        if !node.visible {
            return None;
        }
        Some(node.transform.apply(self.natural(id)?))
    }

    fn transform(&self, id: ElementId) -> Option<Transform> {
        self.nodes.get(&id).map(|n| n.transform)
    }

    fn set_transform(&mut self, id: ElementId, transform: Transform) {
        if let Some(n) = self.nodes.get_mut(&id) {
            n.transform = transform;
        }
    }

    fn opacity(&self, id: ElementId) -> Option<f64> {
        self.nodes.get(&id).map(|n| n.opacity)
    }

    fn set_opacity(&mut self, id: ElementId, opacity: f64) {
        if let Some(n) = self.nodes.get_mut(&id) {
            n.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    fn set_bounds(&mut self, id: ElementId, bounds: Bounds) {
        if let Some(n) = self.nodes.get_mut(&id) {
            if let Placement::Free(_) = n.placement {
                n.placement = Placement::Free(bounds);
            }
        }
    }

    fn layout_bounds(&self, id: ElementId) -> Option<Bounds> {
        self.natural(id)
    }

    fn is_visible(&self, id: ElementId) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.visible)
    }

    fn set_visible(&mut self, id: ElementId, visible: bool) {
        if let Some(n) = self.nodes.get_mut(&id) {
            n.visible = visible;
        }
    }

    fn value(&self, id: ElementId) -> Option<f64> {
        self.nodes.get(&id).map(|n| n.value)
    }

    fn set_value(&mut self, id: ElementId, value: f64) {
        if let Some(n) = self.nodes.get_mut(&id) {
            n.value = value;
        }
    }

    fn children(&self, container: ElementId) -> Option<Vec<ElementId>> {
        self.containers.get(&container).map(|c| c.children.clone())
    }

    fn reorder_children(&mut self, container: ElementId, order: &[ElementId]) {
        let Some(c) = self.containers.get_mut(&container) else {
            return;
        };
        let mut next: Vec<ElementId> = Vec::with_capacity(c.children.len());
        for &id in order {
            if c.children.contains(&id) && !next.contains(&id) {
                next.push(id);
            }
        }
        for &child in &c.children {
            if !next.contains(&child) {
                next.push(child);
            }
        }
        c.children = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize) -> (GridSurface, ElementId, Vec<ElementId>) {
        let mut s = GridSurface::new();
        let g = s.add_grid(Bounds::new(0.0, 0.0, 31.0, 40.0), (10.0, 4.0), (1.0, 1.0));
        let ids = (0..n).filter_map(|_| s.add_child(g)).collect();
        (s, g, ids)
    }

    #[test]
    fn slots_wrap_by_column_count() {
        let (s, g, ids) = grid(4);
        assert_eq!(s.columns(g), Some(2));
        assert_eq!(s.measure(ids[0]), Some(Bounds::new(0.0, 0.0, 10.0, 4.0)));
        assert_eq!(s.measure(ids[1]), Some(Bounds::new(11.0, 0.0, 10.0, 4.0)));
        assert_eq!(s.measure(ids[2]), Some(Bounds::new(0.0, 5.0, 10.0, 4.0)));
    }

    #[test]
    fn trailing_gap_is_not_needed_for_the_last_column() {
        let mut s = GridSurface::new();
        let g = s.add_grid(Bounds::new(0.0, 0.0, 32.0, 40.0), (10.0, 4.0), (1.0, 1.0));
        let ids: Vec<_> = (0..4).filter_map(|_| s.add_child(g)).collect();
        assert_eq!(s.columns(g), Some(3));
        assert_eq!(s.measure(ids[2]), Some(Bounds::new(22.0, 0.0, 10.0, 4.0)));
        assert_eq!(s.measure(ids[3]), Some(Bounds::new(0.0, 5.0, 10.0, 4.0)));
    }

    #[test]
    fn measure_includes_transform() {
        let (mut s, _, ids) = grid(1);
        s.set_transform(ids[0], Transform::translate(3.0, -1.0));
        assert_eq!(s.measure(ids[0]), Some(Bounds::new(3.0, -1.0, 10.0, 4.0)));
        assert_eq!(s.layout_bounds(ids[0]), Some(Bounds::new(0.0, 0.0, 10.0, 4.0)));
    }

    #[test]
    fn reorder_children_moves_slots() {
        let (mut s, g, ids) = grid(3);
        s.reorder_children(g, &[ids[2], ids[0], ids[1]]);
        assert_eq!(s.children(g), Some(vec![ids[2], ids[0], ids[1]]));
        assert_eq!(s.measure(ids[2]), Some(Bounds::new(0.0, 0.0, 10.0, 4.0)));
    }

    #[test]
    fn reorder_children_ignores_strangers_and_keeps_missing() {
        let (mut s, g, ids) = grid(3);
        s.reorder_children(g, &[ElementId(999), ids[1]]);
        assert_eq!(s.children(g), Some(vec![ids[1], ids[0], ids[2]]));
    }

    #[test]
    fn free_elements_start_hidden() {
        let mut s = GridSurface::new();
        let d = s.add_free(Bounds::new(1.0, 1.0, 2.0, 2.0));
        assert_eq!(s.measure(d), None);
        s.set_visible(d, true);
        assert_eq!(s.measure(d), Some(Bounds::new(1.0, 1.0, 2.0, 2.0)));
    }

    #[test]
    fn remove_child_closes_the_gap() {
        let (mut s, g, ids) = grid(3);
        s.remove(ids[0]);
        assert_eq!(s.children(g), Some(vec![ids[1], ids[2]]));
        assert_eq!(s.measure(ids[1]), Some(Bounds::new(0.0, 0.0, 10.0, 4.0)));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn unknown_ids_fail_soft() {
        let mut s = GridSurface::new();
        s.set_transform(ElementId(7), Transform::translate(1.0, 1.0));
        assert_eq!(s.measure(ElementId(7)), None);
        assert_eq!(s.children(ElementId(7)), None);
        assert_eq!(s.add_child(ElementId(7)), None);
    }
}
