//! Effect lifecycle manager
//!
//! A spawned effect owns a set of nodes inside its container. Each node is
//! recycled on the scheduler once its animation has run: the old node is
//! removed and a fresh one with new parameters takes its place. Every timer
//! an effect schedules carries the effect's [`CancelToken`], and recycling
//! re-checks liveness before creating anything, so a torn-down effect never
//! creates another node.

use std::collections::BTreeMap;
use std::time::Duration;

use logic::{EffectClass, EffectKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use system::{CancelToken, Instant, Scheduler};

use crate::spawn::{SpawnParams, BUBBLE_STAGGER};
use crate::{selectors, NodeId, Surface};

/// Handle to one instantiated effect
#[derive(Debug, Clone)]
pub struct EffectHandle {
    id: u64,
    kind: EffectKind,
    token: CancelToken,
}

impl EffectHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    /// Whether teardown has run for this handle
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Timer events an effect schedules for itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectEvent {
    /// Create one more node (staggered start)
    Spawn { effect: u64 },
    /// Replace a node whose animation has finished
    Recycle { effect: u64, node: NodeId },
}

#[derive(Debug)]
struct LiveEffect {
    kind: EffectKind,
    container: NodeId,
    token: CancelToken,
    nodes: Vec<NodeId>,
}

/// Owns every live spawned effect
#[derive(Debug)]
pub struct EffectManager {
    effects: BTreeMap<u64, LiveEffect>,
    next_id: u64,
    rng: StdRng,
}

impl EffectManager {
    pub fn new(rng: StdRng) -> Self {
        Self {
            effects: BTreeMap::new(),
            next_id: 1,
            rng,
        }
    }

    /// Manager with reproducible parameters
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Start `count` nodes of a spawned effect
    ///
    /// Returns `None` when nothing would run: a zero count, a kind that does
    /// not spawn nodes, or a container missing from the page.
    pub fn instantiate<S, E>(
        &mut self,
        kind: EffectKind,
        count: u32,
        surface: &mut S,
        scheduler: &mut Scheduler<E>,
        now: Instant,
    ) -> Option<EffectHandle>
    where
        S: Surface + ?Sized,
        E: From<EffectEvent>,
    {
        if count == 0 || kind.class() != EffectClass::Spawned {
            return None;
        }
        let Some(container) = selectors::container(kind).and_then(|s| surface.query(s)) else {
            tracing::debug!(%kind, "Effect container missing, skipping");
            return None;
        };

        let id = self.next_id;
        self.next_id += 1;
        let token = CancelToken::new();
        self.effects.insert(
            id,
            LiveEffect {
                kind,
                container,
                token: token.clone(),
                nodes: Vec::with_capacity(count as usize),
            },
        );

        for i in 0..count {
            if kind == EffectKind::Bubbles && i > 0 {
                let delay = BUBBLE_STAGGER * i;
                scheduler.schedule_after(now, delay, &token, EffectEvent::Spawn { effect: id }.into());
            } else {
                self.spawn_one(id, surface, scheduler, now);
            }
        }

        tracing::debug!(%kind, count, effect = id, "Instantiated effect");
        Some(EffectHandle { id, kind, token })
    }

    /// Handle a due effect timer; returns the nodes it created
    pub fn handle_event<S, E>(
        &mut self,
        event: EffectEvent,
        surface: &mut S,
        scheduler: &mut Scheduler<E>,
        now: Instant,
    ) -> Vec<NodeId>
    where
        S: Surface + ?Sized,
        E: From<EffectEvent>,
    {
        let effect = match event {
            EffectEvent::Spawn { effect } | EffectEvent::Recycle { effect, .. } => effect,
        };
        let live = self
            .effects
            .get(&effect)
            .is_some_and(|e| !e.token.is_cancelled());
        if !live {
            tracing::trace!(effect, "Dropping timer for torn-down effect");
            return Vec::new();
        }

        if let EffectEvent::Recycle { node, .. } = event {
            surface.remove(node);
            if let Some(e) = self.effects.get_mut(&effect) {
                e.nodes.retain(|n| *n != node);
            }
        }

        self.spawn_one(effect, surface, scheduler, now)
            .into_iter()
            .collect()
    }

    fn spawn_one<S, E>(
        &mut self,
        effect: u64,
        surface: &mut S,
        scheduler: &mut Scheduler<E>,
        now: Instant,
    ) -> Option<NodeId>
    where
        S: Surface + ?Sized,
        E: From<EffectEvent>,
    {
        let live = self.effects.get_mut(&effect)?;
        let params = SpawnParams::generate(live.kind, &mut self.rng)?;
        let node = surface.create_child(live.container, &params.classes)?;
        params.apply(surface, node);
        live.nodes.push(node);

        let lifetime = params.lifetime().max(Duration::from_millis(1));
        scheduler.schedule_after(
            now,
            lifetime,
            &live.token,
            EffectEvent::Recycle { effect, node }.into(),
        );
        Some(node)
    }

    /// Remove every node an effect owns and cancel its timers
    ///
    /// Returns `false` if the handle was already torn down.
    pub fn teardown<S: Surface + ?Sized>(&mut self, handle: &EffectHandle, surface: &mut S) -> bool {
        handle.token.cancel();
        let Some(effect) = self.effects.remove(&handle.id) else {
            return false;
        };
        effect.token.cancel();
        for node in &effect.nodes {
            surface.remove(*node);
        }
        tracing::debug!(kind = %effect.kind, nodes = effect.nodes.len(), "Tore down effect");
        true
    }

    /// Tear down every live effect, returning how many there were
    pub fn teardown_all<S: Surface + ?Sized>(&mut self, surface: &mut S) -> usize {
        let effects = std::mem::take(&mut self.effects);
        let count = effects.len();
        for effect in effects.into_values() {
            effect.token.cancel();
            for node in effect.nodes {
                surface.remove(node);
            }
        }
        count
    }

    /// Nodes currently owned by an effect
    pub fn nodes(&self, handle: &EffectHandle) -> &[NodeId] {
        self.effects
            .get(&handle.id)
            .map_or(&[], |e| e.nodes.as_slice())
    }

    /// Live nodes across every effect of `kind`
    pub fn live_nodes(&self, kind: EffectKind) -> usize {
        self.effects
            .values()
            .filter(|e| e.kind == kind)
            .map(|e| e.nodes.len())
            .sum()
    }

    pub fn is_live(&self, handle: &EffectHandle) -> bool {
        self.effects.contains_key(&handle.id)
    }

    pub fn live_effects(&self) -> usize {
        self.effects.len()
    }
}
