//! End-to-end behavior of a page session over the in-memory page

use std::time::Duration;

use app::{PageConfig, PageSession, SessionState, TierCause};
use devices::{BatteryStatus, DeviceSignals};
use effects::render::LOW_CAPABILITY_CLASS;
use effects::{selectors, IntersectionWatch, MemorySurface, Surface};
use glam::Vec2;
use logic::{EffectKind, EffectTier};
use system::{Clock, Instant, ManualClock};
use widgets::{FormState, LoaderPhase, Rect, IDLE_LABEL, SENDING_LABEL, SENT_LABEL};

fn new_session() -> PageSession<MemorySurface> {
    PageSession::new(
        MemorySurface::landing_page(),
        PageConfig {
            seed: Some(42),
            ..PageConfig::default()
        },
    )
}

/// Run timers and frames at `fps` for `seconds`
fn run_frames(session: &mut PageSession<MemorySurface>, clock: &ManualClock, fps: u32, seconds: u32) {
    let frame = Duration::from_secs_f64(1.0 / f64::from(fps));
    for _ in 0..fps * seconds {
        clock.advance(frame);
        session.tick(clock.now());
        session.on_frame(clock.now());
    }
}

/// Run timers only, in 100 ms steps
fn run_timers(session: &mut PageSession<MemorySurface>, clock: &ManualClock, millis: u64) {
    for _ in 0..millis / 100 {
        clock.advance(Duration::from_millis(100));
        session.tick(clock.now());
    }
}

fn is_hidden(surface: &MemorySurface, selector: &str) -> bool {
    let nodes = surface.query_all(selector);
    !nodes.is_empty()
        && nodes
            .iter()
            .all(|n| surface.has_class(*n, selectors::HIDDEN_CLASS))
}

#[test]
fn test_narrow_viewport_never_full() {
    for width in [320, 390, 600, 767] {
        let mut session = new_session();
        let signals = DeviceSignals::desktop().with_viewport(width, 900);
        let evaluation = session.start(&signals, ManualClock::new().now()).unwrap();
        assert!(evaluation.tier <= EffectTier::Reduced, "width {width}");
    }

    let mut session = new_session();
    session.start(&DeviceSignals::desktop().with_viewport(768, 900), ManualClock::new().now());
    assert_eq!(session.tier(), EffectTier::Full);
}

#[test]
fn test_emergency_is_latched() {
    let clock = ManualClock::new();
    let mut session = new_session();
    let signals = DeviceSignals::desktop();
    session.start(&signals, clock.now());
    run_timers(&mut session, &clock, 1000);
    assert_eq!(session.live_nodes(EffectKind::HeroParticles), 15);

    run_frames(&mut session, &clock, 10, 3);
    assert_eq!(session.tier(), EffectTier::Emergency);
    assert!(session.watchdog().is_tripped());
    assert_eq!(session.live_nodes(EffectKind::Particles), 0);
    assert_eq!(session.live_nodes(EffectKind::HeroParticles), 0);
    let root = session.surface().root().unwrap();
    assert!(session.surface().has_class(root, "emergency-mode"));

    run_frames(&mut session, &clock, 60, 5);
    session.on_signals_changed(&signals, clock.now());
    assert_eq!(session.tier(), EffectTier::Emergency);

    let history = session.tier_history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].cause, TierCause::Watchdog);
    assert_eq!(history[1].tier, EffectTier::Emergency);
}

#[test]
fn test_single_slow_window_does_not_trip() {
    let clock = ManualClock::new();
    let mut session = new_session();
    session.start(&DeviceSignals::desktop(), clock.now());

    run_frames(&mut session, &clock, 60, 1);
    run_frames(&mut session, &clock, 10, 1);
    run_frames(&mut session, &clock, 60, 1);
    run_frames(&mut session, &clock, 10, 1);
    run_frames(&mut session, &clock, 60, 2);
    assert_eq!(session.tier(), EffectTier::Full);
    assert!(session.watchdog().is_armed());
}

#[test]
fn test_downgrade_tears_down_for_good() {
    let clock = ManualClock::new();
    let mut session = new_session();
    session.start(&DeviceSignals::desktop(), clock.now());
    assert_eq!(session.live_nodes(EffectKind::Sparkles), 3);
    let sparkles = session.handle(EffectKind::Sparkles).unwrap().clone();
    let particles = session.handle(EffectKind::Particles).unwrap().clone();

    run_timers(&mut session, &clock, 500);
    let phone = DeviceSignals::desktop().with_viewport(390, 844);
    session.on_signals_changed(&phone, clock.now());

    assert!(sparkles.is_cancelled());
    assert!(particles.is_cancelled());
    assert!(session.handle(EffectKind::Sparkles).is_none());
    assert_eq!(session.live_nodes(EffectKind::Particles), 2);

    let container = session.surface().query("#sparkles").unwrap();
    assert!(session.surface().children(container).is_empty());

    // well past every recreation interval
    run_timers(&mut session, &clock, 60_000);
    assert!(session.surface().children(container).is_empty());
    assert_eq!(session.live_nodes(EffectKind::Sparkles), 0);
    let particles_container = session.surface().query("#particles").unwrap();
    assert_eq!(session.surface().children(particles_container).len(), 2);
}

#[test]
fn test_visibility_round_trip() {
    let clock = ManualClock::new();
    let mut session = new_session();
    session.start(&DeviceSignals::desktop(), clock.now());
    run_timers(&mut session, &clock, 1500);

    let orb = session.surface().query(".orb").unwrap();
    session.surface_mut().set_animation_running(orb, false);
    let before = session.surface().animation_states();

    session.on_visibility_change(true, clock.now());
    let hero = session.surface().query(selectors::HERO).unwrap();
    assert!(!session.surface().animation_running(hero));
    assert_eq!(session.live_nodes(EffectKind::Particles), 5);

    session.on_visibility_change(false, clock.now());
    assert_eq!(session.surface().animation_states(), before);
}

#[test]
fn test_nodes_spawned_while_hidden_resume() {
    let clock = ManualClock::new();
    let mut session = new_session();
    session.start(&DeviceSignals::desktop(), clock.now());
    session.on_visibility_change(true, clock.now());

    // bubbles keep spawning on their stagger while hidden
    run_timers(&mut session, &clock, 1000);
    let container = session.surface().query(".bubbles-container").unwrap();
    let bubbles = session.surface().children(container);
    assert_eq!(bubbles.len(), 5);
    assert!(bubbles
        .iter()
        .all(|b| !session.surface().animation_running(*b)));

    session.on_visibility_change(false, clock.now());
    let bubbles = session.surface().children(container);
    assert!(bubbles
        .iter()
        .all(|b| session.surface().animation_running(*b)));
}

#[test]
fn test_hidden_page_does_not_trip_watchdog() {
    let clock = ManualClock::new();
    let mut session = new_session();
    session.start(&DeviceSignals::desktop(), clock.now());
    run_frames(&mut session, &clock, 60, 1);

    session.on_visibility_change(true, clock.now());
    clock.advance(Duration::from_secs(30));
    session.tick(clock.now());
    session.on_visibility_change(false, clock.now());

    run_frames(&mut session, &clock, 60, 2);
    assert_eq!(session.tier(), EffectTier::Full);
}

#[test]
fn test_low_battery_hides_exact_subset() {
    let clock = ManualClock::new();
    let mut session = new_session();
    let healthy = DeviceSignals::desktop().with_battery(BatteryStatus::new(0.5, false));
    let before = session.start(&healthy, clock.now()).unwrap();

    let low = DeviceSignals::desktop().with_battery(BatteryStatus::new(0.1, false));
    let after = session.on_signals_changed(&low, clock.now()).unwrap();
    assert_eq!(after.tier, before.tier);

    let mut changed: Vec<_> = after.changes.iter().map(|c| c.kind).collect();
    changed.sort();
    assert_eq!(
        changed,
        vec![EffectKind::Sparkles, EffectKind::Orbs, EffectKind::LightRays]
    );
    for kind in EffectKind::ALL {
        if !changed.contains(&kind) {
            assert_eq!(before.visibility.get(kind), after.visibility.get(kind), "{kind}");
        }
    }

    let surface = session.surface();
    assert!(is_hidden(surface, ".orb"));
    assert!(is_hidden(surface, ".light-ray"));
    assert!(is_hidden(surface, "#sparkles"));
    assert!(!is_hidden(surface, ".blob-shape"));
    assert!(!is_hidden(surface, ".animated-ring"));
    assert!(!is_hidden(surface, ".floating-shape"));
    assert_eq!(session.live_nodes(EffectKind::Sparkles), 0);
    assert_eq!(session.live_nodes(EffectKind::Particles), 5);

    let charging = DeviceSignals::desktop().with_battery(BatteryStatus::new(0.1, true));
    session.on_signals_changed(&charging, clock.now());
    let surface = session.surface();
    assert!(!is_hidden(surface, ".orb"));
    assert!(!is_hidden(surface, ".light-ray"));
    assert!(!is_hidden(surface, "#sparkles"));
    assert_eq!(session.live_nodes(EffectKind::Sparkles), 3);
}

#[test]
fn test_carousel_wraps_and_rotates() {
    let clock = ManualClock::new();
    let mut session = new_session();
    session.start(&DeviceSignals::desktop(), clock.now());
    assert_eq!(session.carousel().current(), Some(0));

    assert_eq!(session.on_carousel_prev(clock.now()), Some(2));
    assert_eq!(session.on_carousel_next(clock.now()), Some(0));
    assert!(!session.on_carousel_dot(3, clock.now()));
    assert!(session.on_carousel_dot(2, clock.now()));
    assert_eq!(session.on_carousel_next(clock.now()), Some(0));

    run_timers(&mut session, &clock, 5000);
    assert_eq!(session.carousel().current(), Some(1));

    // manual navigation restarts the interval
    run_timers(&mut session, &clock, 1000);
    session.on_carousel_next(clock.now());
    run_timers(&mut session, &clock, 4000);
    assert_eq!(session.carousel().current(), Some(2));
    run_timers(&mut session, &clock, 1000);
    assert_eq!(session.carousel().current(), Some(0));

    let items = session.surface().query_all(selectors::TESTIMONIAL);
    assert!(session.surface().has_class(items[0], "active"));
    assert!(!session.surface().has_class(items[2], "active"));
}

#[test]
fn test_contact_form_cycle() {
    let clock = ManualClock::new();
    let mut session = new_session();
    session.start(&DeviceSignals::desktop(), clock.now());
    let button = session.surface().query(selectors::SUBMIT_BUTTON).unwrap();
    let form = session.surface().query(selectors::CONTACT_FORM).unwrap();

    assert!(session.on_submit(clock.now()));
    assert!(!session.on_submit(clock.now()));
    assert_eq!(session.surface().text(button).as_deref(), Some(SENDING_LABEL));
    assert_eq!(session.confetti().len(), 50);

    run_timers(&mut session, &clock, 2000);
    assert_eq!(session.form().state(), FormState::Sent);
    assert_eq!(session.surface().text(button).as_deref(), Some(SENT_LABEL));
    assert_eq!(session.surface().form_resets(form), 1);

    run_timers(&mut session, &clock, 1000);
    assert!(!session.confetti().is_active());

    run_timers(&mut session, &clock, 2000);
    assert_eq!(session.form().state(), FormState::Idle);
    assert_eq!(session.surface().text(button).as_deref(), Some(IDLE_LABEL));
}

#[test]
fn test_reduced_motion_skips_confetti() {
    let clock = ManualClock::new();
    let mut session = new_session();
    session.start(&DeviceSignals::desktop().with_reduced_motion(true), clock.now());
    assert!(session.on_submit(clock.now()));
    assert!(!session.confetti().is_active());
    assert!(!session.is_autoplaying());
}

#[test]
fn test_loader_timing() {
    let clock = ManualClock::new();
    let mut session = new_session();
    session.boot(&DeviceSignals::desktop(), clock.now());
    session.start(&DeviceSignals::desktop(), clock.now());

    run_timers(&mut session, &clock, 2900);
    assert_eq!(session.loader().phase(), LoaderPhase::Visible);
    run_timers(&mut session, &clock, 100);
    assert_eq!(session.loader().phase(), LoaderPhase::Fading);
    run_timers(&mut session, &clock, 800);
    assert_eq!(session.loader().phase(), LoaderPhase::Hidden);
    let loader = session.surface().query(selectors::LOADER).unwrap();
    assert_eq!(session.surface().style(loader, "display").as_deref(), Some("none"));
}

#[test]
fn test_scroll_is_throttled() {
    let clock = ManualClock::new();
    let mut session = new_session();
    session.start(&DeviceSignals::desktop(), clock.now());
    let content = session.surface().query(selectors::HERO_CONTENT).unwrap();

    session.on_scroll(400.0, 800.0, clock.now());
    assert!(session.navbar().is_scrolled());
    assert_eq!(session.surface().style(content, "opacity").as_deref(), Some("0.250"));

    clock.advance(Duration::from_millis(30));
    session.on_scroll(0.0, 800.0, clock.now());
    assert!(session.navbar().is_scrolled());

    run_timers(&mut session, &clock, 100);
    assert!(!session.navbar().is_scrolled());
    assert_eq!(session.surface().style(content, "opacity").as_deref(), Some("1.000"));
}

#[test]
fn test_trailing_scroll_applies_at_fractional_times() {
    let clock = ManualClock::starting_at(Instant::from_millis(1000.274));
    let mut session = new_session();
    session.start(&DeviceSignals::desktop(), clock.now());

    session.on_scroll(0.0, 800.0, clock.now());
    assert!(!session.navbar().is_scrolled());

    clock.advance(Duration::from_millis(30));
    session.on_scroll(500.0, 800.0, clock.now());
    assert!(!session.navbar().is_scrolled());

    clock.advance(Duration::from_millis(70));
    session.tick(clock.now());
    clock.advance(Duration::from_millis(300));
    session.tick(clock.now());
    assert!(session.navbar().is_scrolled());
}

#[test]
fn test_parallax_off_in_reduced_tier() {
    let clock = ManualClock::new();
    let mut session = new_session();
    session.start(&DeviceSignals::desktop().with_memory(2.0), clock.now());
    let content = session.surface().query(selectors::HERO_CONTENT).unwrap();
    session.on_scroll(400.0, 800.0, clock.now());
    assert!(session.navbar().is_scrolled());
    assert_eq!(session.surface().style(content, "opacity"), None);
}

#[test]
fn test_avatar_tilt() {
    let clock = ManualClock::new();
    let mut session = new_session();
    session.start(&DeviceSignals::desktop(), clock.now());
    let rects = [
        Rect::new(100.0, 100.0, 200.0, 200.0),
        Rect::new(2000.0, 2000.0, 200.0, 200.0),
    ];
    session.on_pointer_move(Vec2::new(200.0, 250.0), &rects);

    let avatars = session.surface().query_all(selectors::AVATAR_TILT);
    let near = session.surface().style(avatars[0], "transform").unwrap();
    assert!(near.contains("rotateY(10.00deg)"), "{near}");
    assert_eq!(
        session.surface().style(avatars[1], "transform").as_deref(),
        Some("perspective(1000px) rotateX(0.00deg) rotateY(0.00deg)")
    );
}

#[test]
fn test_counters_finish() {
    let clock = ManualClock::new();
    let mut session = new_session();
    session.start(&DeviceSignals::desktop(), clock.now());
    run_timers(&mut session, &clock, 1000);
    run_frames(&mut session, &clock, 60, 3);

    let counters = session.surface().query_all(selectors::COUNTER);
    let texts: Vec<_> = counters
        .iter()
        .map(|c| session.surface().text(*c).unwrap_or_default())
        .collect();
    assert_eq!(texts, vec!["150".to_string(), "4.9".to_string()]);
}

#[test]
fn test_stop_is_idempotent() {
    let clock = ManualClock::new();
    let mut session = new_session();
    session.start(&DeviceSignals::desktop(), clock.now());
    run_timers(&mut session, &clock, 1500);

    assert!(session.stop());
    assert!(!session.stop());
    assert_eq!(session.state(), SessionState::Stopped);
    assert_eq!(session.pending_timers(), 0);
    for kind in EffectKind::ALL {
        assert_eq!(session.live_nodes(kind), 0, "{kind}");
    }

    let created = session.surface().created_count();
    run_timers(&mut session, &clock, 30_000);
    assert_eq!(session.surface().created_count(), created);
    assert!(!session.on_submit(clock.now()));
}

#[test]
fn test_offscreen_decoration_stays_paused_across_hide() {
    let clock = ManualClock::new();
    let mut session = new_session();
    session.start(&DeviceSignals::desktop(), clock.now());
    run_timers(&mut session, &clock, 1500);

    let orb = session.surface().query(".orb").unwrap();
    let blob = session.surface().query(".blob-shape").unwrap();
    assert!(session.surface().is_observed(orb, IntersectionWatch::Offscreen));
    session.on_intersection(orb, IntersectionWatch::Offscreen, false);
    assert!(!session.surface().animation_running(orb));

    session.on_visibility_change(true, clock.now());
    session.on_visibility_change(false, clock.now());
    assert!(!session.surface().animation_running(orb));
    assert!(session.surface().animation_running(blob));

    session.on_intersection(orb, IntersectionWatch::Offscreen, true);
    assert!(session.surface().animation_running(orb));
}

#[test]
fn test_spawned_decorations_are_watched() {
    let clock = ManualClock::new();
    let mut session = new_session();
    session.start(&DeviceSignals::desktop(), clock.now());
    run_timers(&mut session, &clock, 1500);

    let spawned =
        session.live_nodes(EffectKind::Particles) + session.live_nodes(EffectKind::HeroParticles);
    let surface = session.surface();
    let particles = surface.query_all(".particle");
    assert_eq!(particles.len(), spawned);
    assert!(particles
        .iter()
        .all(|p| surface.is_observed(*p, IntersectionWatch::Offscreen)));
    let sparkles = surface.query_all(".sparkle");
    assert!(!sparkles.is_empty());
    assert!(sparkles
        .iter()
        .all(|s| surface.is_observed(*s, IntersectionWatch::Offscreen)));
    let container = surface.query(".bubbles-container").unwrap();
    assert!(surface
        .children(container)
        .iter()
        .all(|b| !surface.is_observed(*b, IntersectionWatch::Offscreen)));
}

#[test]
fn test_timeline_steps_reveal_in_view() {
    let clock = ManualClock::new();
    let mut session = new_session();
    session.start(&DeviceSignals::desktop(), clock.now());

    let steps = session.surface().query_all(selectors::TIMELINE_STEP);
    let path = session.surface().query(selectors::TIMELINE_PATH).unwrap();
    assert!(steps
        .iter()
        .all(|s| session.surface().is_observed(*s, IntersectionWatch::Reveal)));

    session.on_intersection(steps[1], IntersectionWatch::Reveal, false);
    assert_eq!(session.surface().style(steps[1], "animation"), None);

    session.on_intersection(steps[1], IntersectionWatch::Reveal, true);
    assert_eq!(
        session.surface().style(steps[1], "animation").as_deref(),
        Some("slide-in-right 0.6s ease-out forwards")
    );
    assert!(!session.surface().has_class(path, "animate"));

    session.on_intersection(steps[0], IntersectionWatch::Reveal, true);
    assert!(session.surface().has_class(path, "animate"));
}

#[test]
fn test_touch_ripple_expires() {
    let clock = ManualClock::new();
    let mut session = new_session();
    assert!(session.on_touch_start(Vec2::new(120.0, 300.0), clock.now()).is_none());
    session.start(&DeviceSignals::desktop(), clock.now());

    let ripple = session
        .on_touch_start(Vec2::new(120.0, 300.0), clock.now())
        .unwrap();
    let surface = session.surface();
    let hero = surface.query(selectors::HERO).unwrap();
    assert!(surface.children(hero).contains(&ripple));
    assert!(surface.has_class(ripple, selectors::TOUCH_RIPPLE_CLASS));
    assert_eq!(surface.style(ripple, "left").as_deref(), Some("120px"));
    assert_eq!(surface.style(ripple, "top").as_deref(), Some("300px"));

    run_timers(&mut session, &clock, 900);
    assert!(session.surface().contains(ripple));
    run_timers(&mut session, &clock, 100);
    assert!(!session.surface().contains(ripple));
}

#[test]
fn test_stop_clears_ripples_and_viewport_pauses() {
    let clock = ManualClock::new();
    let mut session = new_session();
    session.start(&DeviceSignals::desktop(), clock.now());
    let ripple = session
        .on_touch_start(Vec2::new(10.0, 10.0), clock.now())
        .unwrap();
    let ring = session.surface().query(".animated-ring").unwrap();
    session.on_intersection(ring, IntersectionWatch::Offscreen, false);

    session.stop();
    assert!(!session.surface().contains(ripple));
    assert!(session.surface().animation_running(ring));
    assert_eq!(session.pending_timers(), 0);
}

#[test]
fn test_scroll_indicator_scrolls_to_skills() {
    let clock = ManualClock::new();
    let mut session = new_session();
    assert!(!session.on_scroll_indicator());
    session.start(&DeviceSignals::desktop(), clock.now());

    assert!(session.on_scroll_indicator());
    let skills = session.surface().query(selectors::SKILLS).unwrap();
    assert_eq!(session.surface().scroll_count(skills), 1);
}

#[test]
fn test_boot_root_class_follows_session_thresholds() {
    const ANDROID_UA: &str = "Mozilla/5.0 (Linux; Android 13; Pixel 7) Mobile";
    let clock = ManualClock::new();

    // an earlier pre-paint check marked the page, this config disagrees
    let mut config = PageConfig {
        seed: Some(42),
        ..PageConfig::default()
    };
    config.detection.low_capability_signatures.clear();
    let mut surface = MemorySurface::landing_page();
    let root = surface.root().unwrap();
    surface.set_class(root, LOW_CAPABILITY_CLASS, true);
    let mut session = PageSession::new(surface, config);
    session.boot(&DeviceSignals::desktop().with_user_agent(ANDROID_UA), clock.now());
    assert!(!session.surface().has_class(root, LOW_CAPABILITY_CLASS));

    let mut session = new_session();
    session.boot(&DeviceSignals::desktop().with_user_agent(ANDROID_UA), clock.now());
    let root = session.surface().root().unwrap();
    assert!(session.surface().has_class(root, LOW_CAPABILITY_CLASS));
}
