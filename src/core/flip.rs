//! Layout-transition reorderer (FLIP: First, Last, Invert, Play).
//!
//! 1. **First**: [`capture`] records every item's on-screen bounds.
//! 2. **Last**: [`reorder`] computes the new order and the caller applies it
//!    with [`Surface::reorder_children`], which moves every item's layout
//!    slot.
//! 3. **Invert**: [`plan`] computes, per item, the transform that puts it
//!    back where it was captured.
//! 4. **Play**: [`animate`] applies those transforms and tweens each one to
//!    identity.
//!
//! [`Reorderer::flip_to`] runs all four steps in one call, which keeps the
//! capture strictly ahead of the mutation.
//!
//! Because [`Surface::measure`] includes live transforms, re-triggering while
//! a transition is in flight captures the mid-flight geometry, and the new
//! tweens overwrite the old ones.  Items carry on from where they visibly are.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Duration;

use feruca::Collator;
use rand::seq::SliceRandom;
use rand::Rng;

use super::easing::Ease;
use super::engine::{stagger_delay, Engine, StaggerFrom, Timing};
use super::geometry::{Bounds, Transform};
use super::surface::{ElementId, PropValue, Surface};

/// A card the reorderer moves around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedElement {
    pub id: ElementId,
    pub key: String,
}

impl TrackedElement {
    pub fn new(id: ElementId, key: impl Into<String>) -> Self {
        Self { id, key: key.into() }
    }
}

/// Bounds of each item, taken before a reorder.
#[derive(Debug, Clone, Default)]
pub struct CaptureSnapshot {
    bounds: HashMap<ElementId, Bounds>,
}

impl CaptureSnapshot {
    pub fn get(&self, id: ElementId) -> Option<Bounds> {
        self.bounds.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}

/// How to reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Uniform random permutation.
    Shuffle,
    /// Stable ascending sort by key.
    Sort,
}

/// Timing shared by every item in one transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipTiming {
    pub duration: Duration,
    /// Extra start delay per position in the new order.
    pub stagger: Duration,
    pub ease: Ease,
}

/// One item's part of a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanEntry {
    pub id: ElementId,
    /// Transform that shows the item at its captured bounds.
    pub inverse: Transform,
    pub timing: Timing,
}

/// Per-item inverse transforms and timings, in new-order sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionPlan {
    pub entries: Vec<PlanEntry>,
}

impl TransitionPlan {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Number of items that actually move.
    pub fn moved(&self) -> usize {
        self.entries.iter().filter(|e| !e.inverse.is_identity()).count()
    }

    pub fn entry(&self, id: ElementId) -> Option<&PlanEntry> {
        self.entries.iter().find(|e| e.id == id)
    }
}

// ───────────────────────────────────────── steps ─────────────

/// Record the on-screen bounds of every measurable item.
pub fn capture(surface: &dyn Surface, items: &[TrackedElement]) -> CaptureSnapshot {
    let bounds = items
        .iter()
        .filter_map(|item| surface.measure(item.id).map(|b| (item.id, b)))
        .collect();
    CaptureSnapshot { bounds }
}

/// Key order used by [`Strategy::Sort`]: Unicode collation with the CLDR
/// root tailoring.  Accented letters sort with their base letter and
/// lowercase sorts before uppercase.  Keys that collate equal fall back to
/// their raw bytes, so the order is total.
pub fn compare_keys(collator: &mut Collator, a: &str, b: &str) -> Ordering {
    collator.collate(a, b)
}

/// The new order for `items`.  Never adds or drops an item.
pub fn reorder<R: Rng + ?Sized>(
    items: &[TrackedElement],
    strategy: Strategy,
    rng: &mut R,
) -> Vec<TrackedElement> {
    let mut next = items.to_vec();
    match strategy {
        // Fisher–Yates; a random comparator in a sort would be biased.
        Strategy::Shuffle => next.shuffle(rng),
        Strategy::Sort => {
            let mut collator = Collator::default();
            next.sort_by(|a, b| compare_keys(&mut collator, &a.key, &b.key));
        }
    }
    next
}

/// Inverse transforms for `new_order`, which must already be applied to
/// the surface.  Items missing from the snapshot get identity.
pub fn plan(
    snapshot: &CaptureSnapshot,
    surface: &dyn Surface,
    new_order: &[TrackedElement],
    timing: FlipTiming,
) -> TransitionPlan {
    let entries = new_order
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let inverse = match (snapshot.get(item.id), surface.layout_bounds(item.id)) {
                (Some(first), Some(last)) => Transform::between(last, first),
                _ => Transform::IDENTITY,
            };
            PlanEntry {
                id: item.id,
                inverse,
                timing: Timing::new(timing.duration, timing.ease).with_delay(stagger_delay(
                    index,
                    new_order.len(),
                    timing.stagger,
                    StaggerFrom::Start,
                )),
            }
        })
        .collect();
    TransitionPlan { entries }
}

/// Play a plan: jump each item to its inverse, then tween back to identity.
/// Items that don't move, or a zero duration, snap straight to identity.
pub fn animate(plan: &TransitionPlan, surface: &mut dyn Surface, engine: &mut Engine) {
    let identity = PropValue::Transform(Transform::IDENTITY);
    for entry in &plan.entries {
        if entry.inverse.is_identity() || entry.timing.duration.is_zero() {
            engine.set(surface, entry.id, identity);
        } else {
            engine.from_to(
                surface,
                entry.id,
                PropValue::Transform(entry.inverse),
                identity,
                entry.timing,
                None,
            );
        }
    }
}

// ───────────────────────────────────────── reorderer ─────────

/// Binds a grid container to the sort keys of its items.
#[derive(Debug, Clone)]
pub struct Reorderer {
    container: ElementId,
    keys: HashMap<ElementId, String>,
}

impl Reorderer {
    pub fn new(container: ElementId, items: impl IntoIterator<Item = TrackedElement>) -> Self {
        Self {
            container,
            keys: items.into_iter().map(|i| (i.id, i.key)).collect(),
        }
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    /// Tracked items in the container's current order.
    pub fn items(&self, surface: &dyn Surface) -> Vec<TrackedElement> {
        surface
            .children(self.container)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|id| self.keys.get(&id).map(|k| TrackedElement::new(id, k.clone())))
            .collect()
    }

    /// Capture, reorder, invert and play as one operation.
    pub fn flip_to<R: Rng + ?Sized>(
        &self,
        surface: &mut dyn Surface,
        engine: &mut Engine,
        strategy: Strategy,
        timing: FlipTiming,
        rng: &mut R,
    ) -> TransitionPlan {
        if surface.children(self.container).is_none() {
            tracing::debug!(container = ?self.container, "flip container missing; skipped");
            return TransitionPlan::default();
        }
        let items = self.items(surface);
        if items.is_empty() {
            return TransitionPlan::default();
        }

        let snapshot = capture(surface, &items);
        let next = reorder(&items, strategy, rng);
        let order: Vec<ElementId> = next.iter().map(|i| i.id).collect();
        surface.reorder_children(self.container, &order);

        let plan = plan(&snapshot, surface, &next, timing);
        animate(&plan, surface, engine);
        tracing::debug!(?strategy, items = plan.len(), moved = plan.moved(), "flip");
        plan
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::{any, prop};
    use proptest::strategy::Strategy as PropStrategy;
    use proptest::{prop_assert_eq, prop_assert_ne, proptest};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::core::surface::GridSurface;

    const TIMING: FlipTiming = FlipTiming {
        duration: Duration::from_millis(450),
        stagger: Duration::from_millis(25),
        ease: Ease::Power1InOut,
    };

    const INSTANT: FlipTiming = FlipTiming {
        duration: Duration::ZERO,
        stagger: Duration::ZERO,
        ease: Ease::Power1InOut,
    };

    fn deck(keys: &[&str]) -> (GridSurface, Reorderer) {
        let mut s = GridSurface::new();
        let g = s.add_grid(Bounds::new(0.0, 0.0, 40.0, 60.0), (12.0, 5.0), (2.0, 1.0));
        let items: Vec<_> = keys
            .iter()
            .filter_map(|k| s.add_child(g).map(|id| TrackedElement::new(id, *k)))
            .collect();
        (s, Reorderer::new(g, items))
    }

    fn keys_of(items: &[TrackedElement]) -> Vec<String> {
        items.iter().map(|i| i.key.clone()).collect()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn sort_scenario() {
        let (mut s, r) = deck(&["b", "a", "c"]);
        let mut e = Engine::new(60).unwrap();
        r.flip_to(&mut s, &mut e, Strategy::Sort, TIMING, &mut rng());
        assert_eq!(keys_of(&r.items(&s)), ["a", "b", "c"]);
    }

    fn tracked(keys: &[&str]) -> Vec<TrackedElement> {
        keys.iter()
            .enumerate()
            .map(|(i, k)| TrackedElement::new(ElementId(i as u32), *k))
            .collect()
    }

    #[test]
    fn sort_puts_lowercase_first_and_is_stable() {
        let sorted = reorder(&tracked(&["b", "B", "a", "b"]), Strategy::Sort, &mut rng());
        let ids: Vec<_> = sorted.iter().map(|i| i.id.0).collect();
        // "b" < "B"; the two "b"s keep input order.
        assert_eq!(ids, [2, 0, 3, 1]);
    }

    #[test]
    fn accented_keys_sort_with_their_base_letter() {
        let items = tracked(&["zebra", "éclair", "apple", "B", "b"]);
        let sorted = reorder(&items, Strategy::Sort, &mut rng());
        assert_eq!(keys_of(&sorted), ["apple", "b", "B", "éclair", "zebra"]);
    }

    #[test]
    fn unmoved_item_gets_identity() {
        let (mut s, r) = deck(&["a", "c", "b"]);
        let first = r.items(&s)[0].id;
        let mut e = Engine::new(60).unwrap();
        let plan = r.flip_to(&mut s, &mut e, Strategy::Sort, TIMING, &mut rng());
        assert!(plan.entry(first).unwrap().inverse.is_identity());
        assert_eq!(plan.moved(), 2);
    }

    #[test]
    fn items_appear_unmoved_right_after_flip() {
        let (mut s, r) = deck(&["e", "d", "c", "b", "a"]);
        let before = capture(&s, &r.items(&s));
        let mut e = Engine::new(60).unwrap();
        r.flip_to(&mut s, &mut e, Strategy::Sort, TIMING, &mut rng());
        for item in r.items(&s) {
            let now = s.measure(item.id).unwrap();
            let then = before.get(item.id).unwrap();
            assert!((now.x - then.x).abs() < 1e-9 && (now.y - then.y).abs() < 1e-9);
        }
        e.settle(&mut s, 1000);
        for item in r.items(&s) {
            assert_eq!(s.measure(item.id), s.layout_bounds(item.id));
        }
    }

    #[test]
    fn stagger_follows_new_order() {
        let (mut s, r) = deck(&["c", "b", "a"]);
        let mut e = Engine::new(60).unwrap();
        let plan = r.flip_to(&mut s, &mut e, Strategy::Sort, TIMING, &mut rng());
        let order: Vec<_> = r.items(&s).iter().map(|i| i.id).collect();
        for (i, entry) in plan.entries.iter().enumerate() {
            assert_eq!(entry.id, order[i]);
            assert_eq!(entry.timing.delay, Duration::from_millis(25) * i as u32);
        }
    }

    #[test]
    fn reduced_motion_snaps_without_frames() {
        let (mut s, r) = deck(&["d", "c", "b", "a"]);
        let mut e = Engine::new(60).unwrap();
        r.flip_to(&mut s, &mut e, Strategy::Sort, INSTANT, &mut rng());
        assert!(!e.is_active());
        assert_eq!(e.frames(), 0);
        for item in r.items(&s) {
            assert_eq!(s.measure(item.id), s.layout_bounds(item.id));
        }
    }

    #[test]
    fn empty_container_is_a_no_op() {
        let (mut s, r) = deck(&[]);
        let mut e = Engine::new(60).unwrap();
        for strategy in [Strategy::Shuffle, Strategy::Sort] {
            let plan = r.flip_to(&mut s, &mut e, strategy, TIMING, &mut rng());
            assert!(plan.is_empty());
        }
        assert!(!e.is_active());
        assert!(r.items(&s).is_empty());
    }

    #[test]
    fn single_item_is_identity() {
        let (mut s, r) = deck(&["only"]);
        let mut e = Engine::new(60).unwrap();
        let plan = r.flip_to(&mut s, &mut e, Strategy::Shuffle, TIMING, &mut rng());
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.moved(), 0);
        assert!(!e.is_active());
    }

    #[test]
    fn missing_container_fails_soft() {
        let (mut s, _) = deck(&["a", "b"]);
        let ghost = Reorderer::new(ElementId(999), Vec::new());
        let mut e = Engine::new(60).unwrap();
        assert!(ghost.flip_to(&mut s, &mut e, Strategy::Sort, TIMING, &mut rng()).is_empty());
    }

    #[test]
    fn retrigger_mid_flight_continues_from_current_geometry() {
        let (mut s, r) = deck(&["f", "e", "d", "c", "b", "a"]);
        let mut e = Engine::new(60).unwrap();
        let mut rng = rng();
        r.flip_to(&mut s, &mut e, Strategy::Shuffle, TIMING, &mut rng);
        for _ in 0..8 {
            e.tick(Duration::from_millis(16), &mut s);
        }
        let mid = capture(&s, &r.items(&s));
        r.flip_to(&mut s, &mut e, Strategy::Sort, TIMING, &mut rng);
        for item in r.items(&s) {
            let now = s.measure(item.id).unwrap();
            let then = mid.get(item.id).unwrap();
            assert!((now.x - then.x).abs() < 1e-9 && (now.y - then.y).abs() < 1e-9);
        }
        e.settle(&mut s, 1000);
        assert_eq!(keys_of(&r.items(&s)), ["a", "b", "c", "d", "e", "f"]);
        for item in r.items(&s) {
            assert_eq!(s.transform(item.id), Some(Transform::IDENTITY));
        }
    }

    #[test]
    fn shuffle_is_roughly_uniform() {
        let items: Vec<_> = (0..3)
            .map(|i| TrackedElement::new(ElementId(i), i.to_string()))
            .collect();
        let mut counts: HashMap<Vec<u32>, u32> = HashMap::new();
        let mut rng = rng();
        for _ in 0..6000 {
            let ids = reorder(&items, Strategy::Shuffle, &mut rng)
                .iter()
                .map(|i| i.id.0)
                .collect();
            *counts.entry(ids).or_default() += 1;
        }
        assert_eq!(counts.len(), 6);
        for (perm, n) in counts {
            assert!((800..1200).contains(&n), "{perm:?} seen {n} times");
        }
    }

    fn arb_items() -> impl PropStrategy<Value = Vec<TrackedElement>> {
        prop::collection::vec("[a-zA-Zéè]{0,4}", 0..24).prop_map(|keys| {
            keys.into_iter()
                .enumerate()
                .map(|(i, k)| TrackedElement::new(ElementId(i as u32), k))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn sort_orders_by_key_and_is_idempotent(items in arb_items()) {
            let mut rng = rng();
            let mut collator = Collator::default();
            let once = reorder(&items, Strategy::Sort, &mut rng);
            for pair in once.windows(2) {
                let order = compare_keys(&mut collator, &pair[0].key, &pair[1].key);
                prop_assert_ne!(order, Ordering::Greater);
            }
            let twice = reorder(&once, Strategy::Sort, &mut rng);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn shuffle_preserves_items(items in arb_items(), seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let shuffled = reorder(&items, Strategy::Shuffle, &mut rng);
            let mut a: Vec<_> = items.iter().map(|i| i.id).collect();
            let mut b: Vec<_> = shuffled.iter().map(|i| i.id).collect();
            a.sort();
            b.sort();
            prop_assert_eq!(a, b);
        }
    }
}
