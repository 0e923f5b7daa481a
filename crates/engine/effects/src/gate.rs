//! Pause and resume animations while the page is hidden
//!
//! Hiding records each observed node's running state and pauses it;
//! showing puts back exactly what was recorded. Nothing is torn down.
//!
//! Nodes scrolled out of the viewport are paused independently and stay
//! paused across a hide/show until they scroll back in.

use std::collections::BTreeSet;

use crate::{NodeId, Surface};

#[derive(Debug, Clone)]
pub struct VisibilityGate {
    regions: String,
    saved: Option<Vec<(NodeId, bool)>>,
    offscreen: BTreeSet<NodeId>,
}

impl VisibilityGate {
    /// Gate over the elements matching `regions` and everything below them
    pub fn new(regions: impl Into<String>) -> Self {
        Self {
            regions: regions.into(),
            saved: None,
            offscreen: BTreeSet::new(),
        }
    }

    #[inline]
    pub fn is_offscreen(&self, node: NodeId) -> bool {
        self.offscreen.contains(&node)
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.saved.is_some()
    }

    fn observed<S: Surface + ?Sized>(&self, surface: &S) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        for region in surface.query_all(&self.regions) {
            for node in std::iter::once(region).chain(surface.descendants(region)) {
                if !nodes.contains(&node) {
                    nodes.push(node);
                }
            }
        }
        nodes
    }

    /// Record and pause; returns the number of nodes paused, 0 if already paused
    pub fn hide<S: Surface + ?Sized>(&mut self, surface: &mut S) -> usize {
        if self.saved.is_some() {
            return 0;
        }
        let saved: Vec<_> = self
            .observed(surface)
            .into_iter()
            .map(|node| {
                // an off-screen pause is not the node's own state
                let running = self.offscreen.contains(&node) || surface.animation_running(node);
                (node, running)
            })
            .collect();
        for (node, _) in &saved {
            surface.set_animation_running(*node, false);
        }
        let count = saved.len();
        self.saved = Some(saved);
        tracing::debug!(nodes = count, "Paused animations");
        count
    }

    /// Restore recorded states; returns the number restored, 0 if not paused
    ///
    /// Nodes removed while hidden are skipped and off-screen nodes stay paused.
    pub fn show<S: Surface + ?Sized>(&mut self, surface: &mut S) -> usize {
        let Some(saved) = self.saved.take() else {
            return 0;
        };
        self.offscreen.retain(|node| surface.contains(*node));
        let mut restored = 0;
        for (node, running) in saved {
            if surface.contains(node) {
                let running = running && !self.offscreen.contains(&node);
                surface.set_animation_running(node, running);
                restored += 1;
            }
        }
        tracing::debug!(nodes = restored, "Resumed animations");
        restored
    }

    /// Node entered or left the viewport; returns `false` when nothing changed
    ///
    /// While the page is hidden only the flag moves, [`VisibilityGate::show`]
    /// applies it.
    pub fn set_onscreen<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        node: NodeId,
        onscreen: bool,
    ) -> bool {
        if !surface.contains(node) {
            self.offscreen.remove(&node);
            return false;
        }
        let changed = if onscreen {
            self.offscreen.remove(&node)
        } else {
            self.offscreen.retain(|n| surface.contains(*n));
            self.offscreen.insert(node)
        };
        if changed && self.saved.is_none() {
            surface.set_animation_running(node, onscreen);
        }
        changed
    }

    /// Resume everything the gate paused and forget off-screen flags
    pub fn release<S: Surface + ?Sized>(&mut self, surface: &mut S) -> usize {
        let offscreen = std::mem::take(&mut self.offscreen);
        let mut resumed = self.show(surface);
        for node in offscreen {
            if surface.contains(node) {
                surface.set_animation_running(node, true);
                resumed += 1;
            }
        }
        resumed
    }

    /// Bring nodes created while hidden under the gate
    ///
    /// They are recorded as running and paused until [`VisibilityGate::show`].
    pub fn adopt<S: Surface + ?Sized>(&mut self, surface: &mut S, nodes: &[NodeId]) {
        let Some(saved) = self.saved.as_mut() else {
            return;
        };
        for node in nodes {
            if !saved.iter().any(|(n, _)| n == node) {
                saved.push((*node, surface.animation_running(*node)));
                surface.set_animation_running(*node, false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{selectors, MemorySurface};

    #[test]
    fn test_round_trip_restores_exact_state() {
        let mut surface = MemorySurface::landing_page();
        let orb = surface.query(".orb").unwrap();
        surface.set_animation_running(orb, false);
        let before = surface.animation_states();

        let mut gate = VisibilityGate::new(selectors::ANIMATED_REGIONS);
        assert!(gate.hide(&mut surface) > 0);
        let hero = surface.query(selectors::HERO).unwrap();
        assert!(!surface.animation_running(hero));

        gate.show(&mut surface);
        assert_eq!(surface.animation_states(), before);
        assert!(!surface.animation_running(orb));
    }

    #[test]
    fn test_repeated_calls_are_noops() {
        let mut surface = MemorySurface::landing_page();
        let mut gate = VisibilityGate::new(selectors::ANIMATED_REGIONS);
        assert_eq!(gate.show(&mut surface), 0);

        gate.hide(&mut surface);
        assert_eq!(gate.hide(&mut surface), 0);
        assert!(gate.is_paused());
        gate.show(&mut surface);
        assert!(!gate.is_paused());
    }

    #[test]
    fn test_adopted_nodes_resume() {
        let mut surface = MemorySurface::landing_page();
        let mut gate = VisibilityGate::new(selectors::ANIMATED_REGIONS);
        gate.hide(&mut surface);

        let container = surface.query("#particles").unwrap();
        let node = surface.create_child(container, "particle").unwrap();
        gate.adopt(&mut surface, &[node]);
        assert!(!surface.animation_running(node));

        gate.show(&mut surface);
        assert!(surface.animation_running(node));
    }

    #[test]
    fn test_offscreen_node_stays_paused_after_show() {
        let mut surface = MemorySurface::landing_page();
        let orb = surface.query(".orb").unwrap();
        let blob = surface.query(".blob-shape").unwrap();
        let mut gate = VisibilityGate::new(selectors::ANIMATED_REGIONS);

        assert!(gate.set_onscreen(&mut surface, orb, false));
        assert!(!surface.animation_running(orb));
        assert!(!gate.set_onscreen(&mut surface, orb, false));

        gate.hide(&mut surface);
        assert!(!surface.animation_running(blob));
        gate.show(&mut surface);
        assert!(!surface.animation_running(orb));
        assert!(surface.animation_running(blob));

        assert!(gate.set_onscreen(&mut surface, orb, true));
        assert!(surface.animation_running(orb));
    }

    #[test]
    fn test_viewport_changes_while_hidden_apply_on_show() {
        let mut surface = MemorySurface::landing_page();
        let orbs = surface.query_all(".orb");
        let (left, right) = (orbs[0], orbs[1]);
        let mut gate = VisibilityGate::new(selectors::ANIMATED_REGIONS);
        gate.set_onscreen(&mut surface, left, false);

        gate.hide(&mut surface);
        gate.set_onscreen(&mut surface, left, true);
        gate.set_onscreen(&mut surface, right, false);
        assert!(!surface.animation_running(left));
        assert!(gate.is_offscreen(right));

        gate.show(&mut surface);
        assert!(surface.animation_running(left));
        assert!(!surface.animation_running(right));
    }

    #[test]
    fn test_release_resumes_offscreen_nodes() {
        let mut surface = MemorySurface::landing_page();
        let ring = surface.query(".animated-ring").unwrap();
        let mut gate = VisibilityGate::new(selectors::ANIMATED_REGIONS);
        gate.set_onscreen(&mut surface, ring, false);
        gate.hide(&mut surface);

        gate.release(&mut surface);
        assert!(surface.animation_running(ring));
        assert!(!gate.is_paused());
        assert!(!gate.is_offscreen(ring));
    }

    #[test]
    fn test_outside_region_untouched() {
        let mut surface = MemorySurface::landing_page();
        let loader = surface.query(selectors::LOADER).unwrap();
        let mut gate = VisibilityGate::new(selectors::ANIMATED_REGIONS);
        gate.hide(&mut surface);
        assert!(surface.animation_running(loader));
    }
}
