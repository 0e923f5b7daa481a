//! Lifecycle manager and visibility gate working on the same page

use effects::{selectors, EffectEvent, EffectManager, MemorySurface, Surface, VisibilityGate};
use logic::EffectKind;
use system::{Instant, Scheduler};

fn drain(
    manager: &mut EffectManager,
    gate: &mut VisibilityGate,
    surface: &mut MemorySurface,
    scheduler: &mut Scheduler<EffectEvent>,
    now: f64,
) {
    let at = Instant::from_millis(now);
    for event in scheduler.drain_due(at) {
        let created = manager.handle_event(event, surface, scheduler, at);
        gate.adopt(surface, &created);
    }
}

#[test]
fn test_hidden_page_keeps_new_nodes_paused() {
    let mut surface = MemorySurface::landing_page();
    let mut scheduler = Scheduler::new();
    let mut manager = EffectManager::seeded(5);
    let mut gate = VisibilityGate::new(selectors::ANIMATED_REGIONS);

    manager
        .instantiate(EffectKind::Bubbles, 5, &mut surface, &mut scheduler, Instant::ZERO)
        .unwrap();
    gate.hide(&mut surface);

    let mut now = 0.0;
    while now < 30_000.0 {
        now += 50.0;
        drain(&mut manager, &mut gate, &mut surface, &mut scheduler, now);
    }

    let bubbles = surface.query_all(".bubble");
    assert_eq!(bubbles.len(), 5);
    assert!(bubbles.iter().all(|b| !surface.animation_running(*b)));

    gate.show(&mut surface);
    assert!(bubbles.iter().all(|b| surface.animation_running(*b)));
}

#[test]
fn test_teardown_while_hidden_then_show() {
    let mut surface = MemorySurface::landing_page();
    let mut scheduler = Scheduler::<EffectEvent>::new();
    let mut manager = EffectManager::seeded(5);
    let mut gate = VisibilityGate::new(selectors::ANIMATED_REGIONS);

    let handle = manager
        .instantiate(EffectKind::Particles, 5, &mut surface, &mut scheduler, Instant::ZERO)
        .unwrap();
    gate.hide(&mut surface);
    assert!(manager.teardown(&handle, &mut surface));

    gate.show(&mut surface);
    assert!(surface.query_all(".particle").is_empty());
    let hero = surface.query(selectors::HERO).unwrap();
    assert!(surface.animation_running(hero));
}
