//! Per-page-session controller
//!
//! [`PageSession`] owns every piece of page state and a single timer
//! [`Scheduler`]. The host (browser glue or the simulator) forwards events
//! into it and calls [`PageSession::tick`] with the current time; nothing in
//! here reads a clock or spawns work on its own.
//!
//! Lifecycle: `Created` → [`boot`](PageSession::boot) → `Booted` →
//! [`start`](PageSession::start) → `Running` → [`stop`](PageSession::stop) →
//! `Stopped`. Handlers called outside `Running` do nothing.

use std::collections::BTreeMap;

use devices::{DeviceProfile, DeviceSignals};
use effects::render::LOW_CAPABILITY_CLASS;
use effects::{
    apply_evaluation, selectors, ConfettiField, EffectEvent, EffectHandle, EffectManager,
    IntersectionWatch, NodeId, Surface, VisibilityGate,
};
use glam::Vec2;
use logic::{
    EffectClass, EffectKind, EffectTier, Evaluation, FrameRateWatchdog, Governor, Overlays,
    Visibility, WatchdogEvent,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use system::{CancelToken, Instant, Scheduler};
use widgets::{
    tilt_for, Carousel, ContactForm, CounterAnimation, FormState, FormTimer, Loader, MobileMenu,
    NavbarState, Rect, Throttle, ThrottleDecision, HERO_FADE_INTERVAL_MS,
};

use crate::PageConfig;

/// Timer events owned by a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Effect(EffectEvent),
    LoaderFade,
    LoaderHide,
    /// Hero particles and stat counters start
    HeroStart,
    CarouselAdvance,
    Form(FormTimer),
    ConfettiStop,
    /// Trailing call of a throttled scroll
    ScrollDeferred,
    RippleExpired(NodeId),
}

impl From<EffectEvent> for SessionEvent {
    fn from(event: EffectEvent) -> Self {
        SessionEvent::Effect(event)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Created,
    Booted,
    Running,
    Stopped,
}

/// What moved the tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TierCause {
    Start,
    Signals,
    Watchdog,
}

/// One entry of the tier timeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierChange {
    pub at: Instant,
    pub tier: EffectTier,
    pub cause: TierCause,
}

/// Controller for one landing-page session
#[derive(Debug)]
pub struct PageSession<S: Surface> {
    config: PageConfig,
    surface: S,
    scheduler: Scheduler<SessionEvent>,
    state: SessionState,
    session_token: CancelToken,

    governor: Governor,
    watchdog: FrameRateWatchdog,
    history: Vec<TierChange>,

    effects: EffectManager,
    handles: BTreeMap<EffectKind, (EffectHandle, u32)>,
    gate: VisibilityGate,
    hidden: bool,
    hero_started: bool,

    loader: Loader,
    carousel: Carousel,
    carousel_token: CancelToken,
    autoplay: bool,
    form: ContactForm,
    menu: MobileMenu,
    navbar: NavbarState,
    scroll_throttle: Throttle,
    scroll_token: CancelToken,
    pending_scroll: Option<(f64, f64)>,
    scroll_deferred: bool,
    counters: Vec<(NodeId, CounterAnimation)>,

    confetti: ConfettiField,
    confetti_token: CancelToken,
    ripples: Vec<NodeId>,
}

impl<S: Surface> PageSession<S> {
    pub fn new(surface: S, config: PageConfig) -> Self {
        let (effects, confetti) = match config.seed {
            Some(seed) => (
                EffectManager::seeded(seed),
                ConfettiField::seeded(0.0, 0.0, seed.wrapping_add(1)),
            ),
            None => (
                EffectManager::new(StdRng::from_os_rng()),
                ConfettiField::new(0.0, 0.0, StdRng::from_os_rng()),
            ),
        };
        let carousel = Carousel::from_surface(&surface);
        let watchdog = FrameRateWatchdog::new(config.watchdog.clone());
        let scroll_throttle = Throttle::new(std::time::Duration::from_millis(HERO_FADE_INTERVAL_MS));

        tracing::info!(
            seed = ?config.seed,
            testimonials = carousel.len(),
            "Created page session"
        );

        Self {
            config,
            surface,
            scheduler: Scheduler::new(),
            state: SessionState::Created,
            session_token: CancelToken::new(),
            governor: Governor::standard(),
            watchdog,
            history: Vec::new(),
            effects,
            handles: BTreeMap::new(),
            gate: VisibilityGate::new(selectors::ANIMATED_REGIONS),
            hidden: false,
            hero_started: false,
            loader: Loader::new(),
            carousel,
            carousel_token: CancelToken::new(),
            autoplay: false,
            form: ContactForm::new(),
            menu: MobileMenu::default(),
            navbar: NavbarState::default(),
            scroll_throttle,
            scroll_token: CancelToken::new(),
            pending_scroll: None,
            scroll_deferred: false,
            counters: Vec::new(),
            confetti,
            confetti_token: CancelToken::new(),
            ripples: Vec::new(),
        }
    }

    /// Pre-paint setup: mark a low-capability OS on the root and start the loader timer
    ///
    /// The root class follows this session's thresholds, replacing whatever
    /// an earlier check decided.
    pub fn boot(&mut self, signals: &DeviceSignals, now: Instant) -> bool {
        if self.state != SessionState::Created {
            return false;
        }
        let profile = DeviceProfile::classify(signals, &self.config.detection);
        if let Some(root) = self.surface.root() {
            self.surface
                .set_class(root, LOW_CAPABILITY_CLASS, profile.is_low_capability_os);
        }
        if profile.is_low_capability_os {
            tracing::info!("Low-capability OS detected before first paint");
        }
        let hold = self.config.timing.loader_hold(profile.is_low_capability_os);
        self.scheduler
            .schedule_after(now, hold, &self.session_token, SessionEvent::LoaderFade);
        self.state = SessionState::Booted;
        true
    }

    /// Evaluate the device and bring up every effect and widget
    ///
    /// Boots first if needed. Returns `None` once started or stopped.
    pub fn start(&mut self, signals: &DeviceSignals, now: Instant) -> Option<Evaluation> {
        if self.state == SessionState::Created {
            self.boot(signals, now);
        }
        if self.state != SessionState::Booted {
            return None;
        }
        self.state = SessionState::Running;

        self.confetti
            .resize(signals.viewport.width as f32, signals.viewport.height as f32);
        self.carousel.render(&mut self.surface);
        self.menu.render(&mut self.surface);
        self.form.render(&mut self.surface);
        self.watch_viewport();
        self.scheduler.schedule_after(
            now,
            self.config.timing.hero_start(),
            &self.session_token,
            SessionEvent::HeroStart,
        );

        let profile = DeviceProfile::classify(signals, &self.config.detection);
        let evaluation = self.governor.evaluate(&profile);
        self.apply(&evaluation, TierCause::Start, now);
        tracing::info!(
            tier = %evaluation.tier,
            rule = ?evaluation.rule,
            "Page session started"
        );

        if signals.page_hidden {
            self.on_visibility_change(true, now);
        }
        Some(evaluation)
    }

    /// Tear everything down; later calls do nothing
    pub fn stop(&mut self) -> bool {
        if self.state == SessionState::Stopped {
            return false;
        }
        let effects = self.effects.teardown_all(&mut self.surface);
        self.handles.clear();
        for token in [
            &self.session_token,
            &self.carousel_token,
            &self.scroll_token,
            &self.confetti_token,
        ] {
            token.cancel();
        }
        self.scheduler.clear();
        self.watchdog.disarm();
        self.confetti.clear();
        self.counters.clear();
        self.autoplay = false;
        for ripple in self.ripples.drain(..) {
            self.surface.remove(ripple);
        }
        self.gate.release(&mut self.surface);
        self.state = SessionState::Stopped;
        tracing::info!(effects, "Page session stopped");
        true
    }

    /// Re-evaluate after resize, connection, battery or preference changes
    pub fn on_signals_changed(&mut self, signals: &DeviceSignals, now: Instant) -> Option<Evaluation> {
        if self.state != SessionState::Running {
            return None;
        }
        self.confetti
            .resize(signals.viewport.width as f32, signals.viewport.height as f32);
        let profile = DeviceProfile::classify(signals, &self.config.detection);
        let evaluation = self.governor.evaluate(&profile);
        self.apply(&evaluation, TierCause::Signals, now);
        if signals.page_hidden != self.hidden {
            self.on_visibility_change(signals.page_hidden, now);
        }
        Some(evaluation)
    }

    /// Page hidden or shown
    pub fn on_visibility_change(&mut self, hidden: bool, now: Instant) {
        if self.state != SessionState::Running || hidden == self.hidden {
            return;
        }
        self.hidden = hidden;
        if hidden {
            let paused = self.gate.hide(&mut self.surface);
            tracing::debug!(paused, "Page hidden");
        } else {
            let resumed = self.gate.show(&mut self.surface);
            // frames were not delivered while hidden
            if self.watchdog.is_armed() {
                self.watchdog.start(now);
            }
            tracing::debug!(resumed, "Page visible");
        }
    }

    /// One animation frame
    pub fn on_frame(&mut self, now: Instant) -> WatchdogEvent {
        if self.state != SessionState::Running || self.hidden {
            return WatchdogEvent::Idle;
        }

        let event = self.watchdog.record_frame(now);
        if let WatchdogEvent::Tripped { fps } = event {
            if let Some(evaluation) = self.governor.trip_emergency() {
                tracing::warn!(fps, "Switching to emergency tier");
                self.apply(&evaluation, TierCause::Watchdog, now);
            }
        }

        if self.confetti.is_active() {
            self.confetti.step();
        }

        if !self.counters.is_empty() {
            for (node, counter) in &mut self.counters {
                let text = counter.step();
                self.surface.set_text(*node, &text);
            }
            self.counters.retain(|(_, counter)| !counter.is_done());
        }

        event
    }

    /// Dispatch every timer due at `now`; returns how many ran
    pub fn tick(&mut self, now: Instant) -> usize {
        if self.state == SessionState::Stopped {
            return 0;
        }
        let due = self.scheduler.drain_due(now);
        let count = due.len();
        for event in due {
            self.dispatch(event, now);
        }
        count
    }

    fn dispatch(&mut self, event: SessionEvent, now: Instant) {
        match event {
            SessionEvent::Effect(event) => {
                let created =
                    self.effects
                        .handle_event(event, &mut self.surface, &mut self.scheduler, now);
                self.gate.adopt(&mut self.surface, &created);
                self.watch_offscreen(&created);
            }
            SessionEvent::LoaderFade => {
                if self.loader.begin_fade() {
                    self.loader.render(&mut self.surface);
                    self.scheduler.schedule_after(
                        now,
                        self.config.timing.loader_fade(),
                        &self.session_token,
                        SessionEvent::LoaderHide,
                    );
                }
            }
            SessionEvent::LoaderHide => {
                if self.loader.finish() {
                    self.loader.render(&mut self.surface);
                    tracing::debug!("Loader hidden");
                }
            }
            SessionEvent::HeroStart => self.start_hero(now),
            SessionEvent::CarouselAdvance => {
                if self.autoplay {
                    self.carousel.next();
                    self.carousel.render(&mut self.surface);
                    self.scheduler.schedule_after(
                        now,
                        self.config.timing.carousel_interval(),
                        &self.carousel_token,
                        SessionEvent::CarouselAdvance,
                    );
                }
            }
            SessionEvent::Form(timer) => {
                if let Some(state) = self.form.on_timer(timer) {
                    self.form.render(&mut self.surface);
                    if state == FormState::Sent {
                        self.scheduler.schedule_after(
                            now,
                            self.config.timing.form_reset(),
                            &self.session_token,
                            SessionEvent::Form(FormTimer::Reset),
                        );
                    }
                }
            }
            SessionEvent::ConfettiStop => self.confetti.clear(),
            SessionEvent::ScrollDeferred => {
                self.scroll_deferred = false;
                if self.scroll_throttle.fire_deferred(now) {
                    if let Some((scroll_y, hero_height)) = self.pending_scroll {
                        self.apply_scroll(scroll_y, hero_height);
                    }
                }
            }
            SessionEvent::RippleExpired(node) => {
                self.ripples.retain(|n| *n != node);
                self.surface.remove(node);
            }
        }
    }

    /// Register static decorations and timeline steps with the viewport watch
    fn watch_viewport(&mut self) {
        for node in self.surface.query_all(selectors::OFFSCREEN_PAUSED) {
            self.surface
                .observe_intersection(node, IntersectionWatch::Offscreen);
        }
        for node in self.surface.query_all(selectors::TIMELINE_STEP) {
            self.surface.observe_intersection(node, IntersectionWatch::Reveal);
        }
    }

    fn watch_offscreen(&mut self, nodes: &[NodeId]) {
        for node in nodes {
            if selectors::pauses_offscreen(&self.surface, *node) {
                self.surface
                    .observe_intersection(*node, IntersectionWatch::Offscreen);
            }
        }
    }

    fn start_hero(&mut self, now: Instant) {
        if self.hero_started {
            return;
        }
        self.hero_started = true;
        self.sync_spawned(EffectKind::HeroParticles, now);

        self.counters = self
            .surface
            .query_all(selectors::COUNTER)
            .into_iter()
            .filter_map(|node| {
                let target = self.surface.attribute(node, "data-target")?;
                CounterAnimation::from_attribute(&target).map(|counter| (node, counter))
            })
            .collect();
        tracing::debug!(counters = self.counters.len(), "Hero started");
    }

    fn apply(&mut self, evaluation: &Evaluation, cause: TierCause, now: Instant) {
        apply_evaluation(evaluation, &mut self.surface);
        for change in &evaluation.changes {
            tracing::debug!(
                kind = %change.kind,
                before = ?change.before,
                after = ?change.after,
                "Effect visibility changed"
            );
        }
        if evaluation.tier_changed {
            self.history.push(TierChange {
                at: now,
                tier: evaluation.tier,
                cause,
            });
        }

        self.sync_watchdog(evaluation.tier, now);
        self.sync_autoplay(evaluation.overlays, now);
        for kind in EffectKind::ALL {
            match kind.class() {
                EffectClass::Spawned => self.sync_spawned(kind, now),
                EffectClass::Canvas => {
                    if !evaluation.visibility.is_shown(kind) && self.confetti.is_active() {
                        self.confetti.clear();
                    }
                }
                EffectClass::Behavior => {
                    if !evaluation.visibility.is_shown(kind) {
                        if let Some(content) = self.surface.query(selectors::HERO_CONTENT) {
                            self.surface.set_style(content, "opacity", "");
                        }
                    }
                }
                EffectClass::Static => {}
            }
        }
    }

    fn sync_watchdog(&mut self, tier: EffectTier, now: Instant) {
        if tier.permits_effects() {
            if !self.watchdog.is_armed() && !self.watchdog.is_tripped() {
                self.watchdog.start(now);
            }
        } else {
            self.watchdog.disarm();
        }
    }

    fn sync_autoplay(&mut self, overlays: Overlays, now: Instant) {
        let wanted = overlays.carousel_autoplay() && !self.carousel.is_empty();
        if wanted == self.autoplay {
            return;
        }
        self.autoplay = wanted;
        if wanted {
            self.schedule_carousel(now);
        } else {
            self.carousel_token.cancel();
            tracing::debug!("Carousel auto-rotation off");
        }
    }

    fn schedule_carousel(&mut self, now: Instant) {
        self.carousel_token.cancel();
        self.carousel_token = CancelToken::new();
        self.scheduler.schedule_after(
            now,
            self.config.timing.carousel_interval(),
            &self.carousel_token,
            SessionEvent::CarouselAdvance,
        );
    }

    /// Bring one spawned effect to the count its visibility asks for
    fn sync_spawned(&mut self, kind: EffectKind, now: Instant) {
        let visibility = self
            .governor
            .last()
            .map_or(Visibility::Shown { count: 0 }, |e| e.visibility.get(kind));
        let waiting = kind == EffectKind::HeroParticles && !self.hero_started;
        let wanted = match visibility {
            Visibility::Shown { count } if !waiting => count,
            _ => 0,
        };
        let current = self.handles.get(&kind).map_or(0, |(_, count)| *count);
        if wanted == current {
            return;
        }

        if let Some((handle, _)) = self.handles.remove(&kind) {
            self.effects.teardown(&handle, &mut self.surface);
        }
        if wanted == 0 {
            return;
        }
        if let Some(handle) =
            self.effects
                .instantiate(kind, wanted, &mut self.surface, &mut self.scheduler, now)
        {
            let nodes = self.effects.nodes(&handle).to_vec();
            self.gate.adopt(&mut self.surface, &nodes);
            self.watch_offscreen(&nodes);
            self.handles.insert(kind, (handle, wanted));
        }
    }

    /// Next testimonial button
    pub fn on_carousel_next(&mut self, now: Instant) -> Option<usize> {
        if self.state != SessionState::Running {
            return None;
        }
        let index = self.carousel.next()?;
        self.after_carousel_input(now);
        Some(index)
    }

    /// Previous testimonial button
    pub fn on_carousel_prev(&mut self, now: Instant) -> Option<usize> {
        if self.state != SessionState::Running {
            return None;
        }
        let index = self.carousel.prev()?;
        self.after_carousel_input(now);
        Some(index)
    }

    /// Dot `index` clicked; out-of-range indices are ignored
    pub fn on_carousel_dot(&mut self, index: usize, now: Instant) -> bool {
        if self.state != SessionState::Running || !self.carousel.show(index) {
            return false;
        }
        self.after_carousel_input(now);
        true
    }

    fn after_carousel_input(&mut self, now: Instant) {
        self.carousel.render(&mut self.surface);
        if self.autoplay {
            self.schedule_carousel(now);
        }
    }

    /// Contact form submitted; returns `false` when ignored
    pub fn on_submit(&mut self, now: Instant) -> bool {
        if self.state != SessionState::Running || !self.form.submit() {
            return false;
        }
        self.form.render(&mut self.surface);
        self.scheduler.schedule_after(
            now,
            self.config.timing.form_sending(),
            &self.session_token,
            SessionEvent::Form(FormTimer::Delivered),
        );

        let pieces = self
            .governor
            .last()
            .map_or(0, |e| e.visibility.get(EffectKind::Confetti).count());
        if pieces > 0 {
            self.confetti.burst(pieces);
            self.confetti_token.cancel();
            self.confetti_token = CancelToken::new();
            self.scheduler.schedule_after(
                now,
                self.config.timing.confetti(),
                &self.confetti_token,
                SessionEvent::ConfettiStop,
            );
        }
        true
    }

    /// Window scrolled; navbar and hero fade run at most once per throttle window
    pub fn on_scroll(&mut self, scroll_y: f64, hero_height: f64, now: Instant) {
        if self.state != SessionState::Running {
            return;
        }
        self.pending_scroll = Some((scroll_y, hero_height));
        match self.scroll_throttle.call(now) {
            ThrottleDecision::Run => self.apply_scroll(scroll_y, hero_height),
            ThrottleDecision::Defer { at } => {
                if !self.scroll_deferred {
                    self.scroll_deferred = true;
                    self.scheduler
                        .schedule_at(at, &self.scroll_token, SessionEvent::ScrollDeferred);
                }
            }
        }
    }

    fn apply_scroll(&mut self, scroll_y: f64, hero_height: f64) {
        if self.navbar.update(scroll_y) {
            self.navbar.render(&mut self.surface);
        }
        let parallax = self
            .governor
            .last()
            .is_some_and(|e| e.visibility.is_shown(EffectKind::Parallax));
        if parallax {
            widgets::render_hero_fade(&mut self.surface, scroll_y, hero_height);
        }
    }

    /// An observed element entered or left the viewport
    pub fn on_intersection(&mut self, node: NodeId, watch: IntersectionWatch, visible: bool) {
        if self.state != SessionState::Running {
            return;
        }
        match watch {
            IntersectionWatch::Offscreen => {
                if self.gate.set_onscreen(&mut self.surface, node, visible) {
                    tracing::trace!(node = node.raw(), visible, "Viewport pause changed");
                }
            }
            IntersectionWatch::Reveal if visible => self.reveal_step(node),
            IntersectionWatch::Reveal => {}
        }
    }

    fn reveal_step(&mut self, step: NodeId) {
        self.surface
            .set_style(step, "animation", "slide-in-right 0.6s ease-out forwards");
        if self.surface.attribute(step, "data-step").as_deref() == Some("1") {
            if let Some(path) = self.surface.query(selectors::TIMELINE_PATH) {
                self.surface.set_class(path, "animate", true);
            }
        }
    }

    /// Touch on the hero; spawns a ripple at the touch point in viewport pixels
    pub fn on_touch_start(&mut self, touch: Vec2, now: Instant) -> Option<NodeId> {
        if self.state != SessionState::Running {
            return None;
        }
        let hero = self.surface.query(selectors::HERO)?;
        let ripple = self
            .surface
            .create_child(hero, selectors::TOUCH_RIPPLE_CLASS)?;
        self.surface
            .set_style(ripple, "left", &format!("{}px", touch.x));
        self.surface.set_style(ripple, "top", &format!("{}px", touch.y));
        self.ripples.push(ripple);
        self.scheduler.schedule_after(
            now,
            self.config.timing.ripple(),
            &self.session_token,
            SessionEvent::RippleExpired(ripple),
        );
        Some(ripple)
    }

    /// Scroll indicator clicked; scrolls to the skills section
    pub fn on_scroll_indicator(&mut self) -> bool {
        if self.state != SessionState::Running {
            return false;
        }
        let Some(skills) = self.surface.query(selectors::SKILLS) else {
            return false;
        };
        self.surface.scroll_into_view(skills);
        true
    }

    /// Pointer moved; `rects` are the avatar bounds in document order
    pub fn on_pointer_move(&mut self, pointer: Vec2, rects: &[Rect]) {
        if self.state != SessionState::Running {
            return;
        }
        let avatars = self.surface.query_all(selectors::AVATAR_TILT);
        for (node, rect) in avatars.into_iter().zip(rects) {
            let tilt = tilt_for(pointer, *rect);
            self.surface.set_style(node, "transform", &tilt.to_css());
        }
    }

    pub fn on_menu_toggle(&mut self) -> bool {
        if self.state != SessionState::Running {
            return false;
        }
        let open = self.menu.toggle();
        self.menu.render(&mut self.surface);
        open
    }

    pub fn on_menu_link(&mut self) {
        if self.state != SessionState::Running {
            return;
        }
        self.menu.close();
        self.menu.render(&mut self.surface);
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Effective tier, `Full` before start
    pub fn tier(&self) -> EffectTier {
        self.governor.tier()
    }

    pub fn evaluation(&self) -> Option<&Evaluation> {
        self.governor.last()
    }

    pub fn governor(&self) -> &Governor {
        &self.governor
    }

    pub fn watchdog(&self) -> &FrameRateWatchdog {
        &self.watchdog
    }

    pub fn tier_history(&self) -> &[TierChange] {
        &self.history
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Handle of the running instance of a spawned effect
    pub fn handle(&self, kind: EffectKind) -> Option<&EffectHandle> {
        self.handles.get(&kind).map(|(handle, _)| handle)
    }

    /// Nodes currently owned by effects of `kind`
    pub fn live_nodes(&self, kind: EffectKind) -> usize {
        self.effects.live_nodes(kind)
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.scheduler.next_due()
    }

    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn is_autoplaying(&self) -> bool {
        self.autoplay
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn menu(&self) -> &MobileMenu {
        &self.menu
    }

    pub fn navbar(&self) -> &NavbarState {
        &self.navbar
    }

    pub fn confetti(&self) -> &ConfettiField {
        &self.confetti
    }
}
