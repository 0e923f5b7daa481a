//! Document surface abstraction
//!
//! Effects and widgets never touch the DOM directly. They go through
//! [`Surface`], which the browser crate implements on top of `web-sys` and
//! [`MemorySurface`] implements in memory for tests and the simulator.
//!
//! Every lookup is optional: a missing element disables the feature that
//! needs it, it is never an error.

use std::collections::{BTreeMap, BTreeSet};

/// Which viewport report an observed element feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IntersectionWatch {
    /// Decorations paused while scrolled out of view
    Offscreen,
    /// Timeline steps revealed when scrolled into view
    Reveal,
}

/// Opaque handle to an element on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> u64 {
        self.0
    }
}

/// Element tree the page controller renders into
///
/// Selectors are `#id`, `.class`, or a comma-separated list of those.
pub trait Surface {
    /// First element matching `selector`
    fn query(&self, selector: &str) -> Option<NodeId>;

    /// Every element matching `selector`, in document order
    fn query_all(&self, selector: &str) -> Vec<NodeId>;

    /// Element that carries page-wide mode classes
    fn root(&self) -> Option<NodeId>;

    /// Append a new `div` with the given (space separated) classes
    fn create_child(&mut self, parent: NodeId, classes: &str) -> Option<NodeId>;

    /// Remove an element and its subtree; `false` if it was already gone
    fn remove(&mut self, node: NodeId) -> bool;

    /// Whether the element is still attached
    fn contains(&self, node: NodeId) -> bool;

    /// All elements below `node`, in document order
    fn descendants(&self, node: NodeId) -> Vec<NodeId>;

    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    fn style(&self, node: NodeId, property: &str) -> Option<String>;

    fn set_class(&mut self, node: NodeId, class: &str, on: bool);

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Whether the element's CSS animation is playing
    fn animation_running(&self, node: NodeId) -> bool;

    fn set_animation_running(&mut self, node: NodeId, running: bool);

    fn set_text(&mut self, node: NodeId, text: &str);

    fn text(&self, node: NodeId) -> Option<String>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    /// Clear the inputs of a form element
    fn reset_form(&mut self, node: NodeId);

    /// Report the element's viewport intersection back to the page
    ///
    /// Surfaces without a viewport ignore this.
    fn observe_intersection(&mut self, _node: NodeId, _watch: IntersectionWatch) {}

    /// Smoothly scroll the element to the top of the viewport
    fn scroll_into_view(&mut self, _node: NodeId) {}

    /// Toggle a class, returning the new state
    fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        let on = !self.has_class(node, class);
        self.set_class(node, class, on);
        on
    }
}

#[derive(Debug, Clone)]
struct MemoryNode {
    element_id: Option<String>,
    classes: BTreeSet<String>,
    styles: BTreeMap<String, String>,
    attributes: BTreeMap<String, String>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    animation_running: bool,
    form_resets: u32,
    watches: BTreeSet<IntersectionWatch>,
    scrolled_into_view: u32,
}

impl MemoryNode {
    fn new(parent: Option<NodeId>, element_id: Option<&str>, classes: &str) -> Self {
        Self {
            element_id: element_id.map(str::to_string),
            classes: classes.split_whitespace().map(str::to_string).collect(),
            styles: BTreeMap::new(),
            attributes: BTreeMap::new(),
            text: String::new(),
            parent,
            children: Vec::new(),
            animation_running: true,
            form_resets: 0,
            watches: BTreeSet::new(),
            scrolled_into_view: 0,
        }
    }

    fn matches(&self, selector: &str) -> bool {
        selector.split(',').map(str::trim).any(|part| {
            if let Some(id) = part.strip_prefix('#') {
                self.element_id.as_deref() == Some(id)
            } else if let Some(class) = part.strip_prefix('.') {
                self.classes.contains(class)
            } else {
                false
            }
        })
    }
}

/// In-memory element tree
#[derive(Debug, Clone)]
pub struct MemorySurface {
    nodes: BTreeMap<NodeId, MemoryNode>,
    root: NodeId,
    next_id: u64,
    created: u64,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    /// Empty document with only a root element
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = BTreeMap::new();
        nodes.insert(root, MemoryNode::new(None, None, ""));
        Self {
            nodes,
            root,
            next_id: 1,
            created: 0,
        }
    }

    /// Document shaped like the landing page markup
    pub fn landing_page() -> Self {
        let mut surface = Self::new();
        let body = surface.root;

        surface.add_element(body, Some("loader"), "loader-wrapper");
        surface.add_element(body, Some("main-navbar"), "navbar");
        surface.add_element(body, Some("mobile-menu-btn"), "menu-button");
        let menu = surface.add_element(body, Some("mobile-menu"), "mobile-menu");
        for _ in 0..3 {
            surface.add_element(menu, None, "mobile-link");
        }

        let hero = surface.add_element(body, Some("hero-section"), "hero");
        surface.add_element(hero, None, "hero-gradient");
        surface.add_element(hero, None, "hero-content");
        surface.add_element(hero, Some("particles"), "particles");
        surface.add_element(hero, Some("particles-container"), "particles-container");
        surface.add_element(hero, Some("sparkles"), "sparkles");
        surface.add_element(hero, None, "bubbles-container");
        for _ in 0..2 {
            surface.add_element(hero, None, "blob-shape");
        }
        let orbs = surface.add_element(hero, None, "orbs-container");
        for _ in 0..2 {
            surface.add_element(orbs, None, "orb");
        }
        let rays = surface.add_element(hero, None, "light-rays");
        for _ in 0..2 {
            surface.add_element(rays, None, "light-ray");
        }
        let rings = surface.add_element(hero, None, "rings-container");
        for _ in 0..2 {
            surface.add_element(rings, None, "animated-ring");
        }
        for _ in 0..2 {
            surface.add_element(hero, None, "floating-shape");
        }
        surface.add_element(hero, None, "floating-dot");
        surface.add_element(hero, Some("scroll-indicator"), "scroll-indicator");

        surface.add_element(body, Some("skills"), "skills");
        surface.add_element(body, None, "timeline-path");
        for step in ["1", "2", "3"] {
            let node = surface.add_element(body, None, "timeline-step");
            surface.set_attribute(node, "data-step", step);
        }
        for target in ["150", "4.9"] {
            let counter = surface.add_element(body, None, "counter");
            surface.set_attribute(counter, "data-target", target);
        }

        for _ in 0..3 {
            surface.add_element(body, None, "testimonial");
        }
        for _ in 0..3 {
            surface.add_element(body, None, "testimonial-dot bg-gray-300");
        }
        surface.add_element(body, Some("prev-testimonial"), "carousel-button");
        surface.add_element(body, Some("next-testimonial"), "carousel-button");

        for _ in 0..2 {
            surface.add_element(body, None, "avatar-tilt");
        }

        let form = surface.add_element(body, Some("contact-form"), "contact-form");
        surface.add_element(form, Some("submit-btn"), "submit-button");
        surface.add_element(body, Some("confetti-canvas"), "confetti-canvas");

        surface
    }

    /// Add a fixture element; not counted by [`MemorySurface::created_count`]
    pub fn add_element(&mut self, parent: NodeId, element_id: Option<&str>, classes: &str) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes
            .insert(id, MemoryNode::new(Some(parent), element_id, classes));
        if let Some(parent) = self.nodes.get_mut(&parent) {
            parent.children.push(id);
        }
        id
    }

    /// Elements created through [`Surface::create_child`] so far
    pub fn created_count(&self) -> u64 {
        self.created
    }

    /// Number of attached elements, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct children of `node`
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Times [`Surface::reset_form`] ran on `node`
    pub fn form_resets(&self, node: NodeId) -> u32 {
        self.nodes.get(&node).map_or(0, |n| n.form_resets)
    }

    /// Whether [`Surface::observe_intersection`] registered `node` for `watch`
    pub fn is_observed(&self, node: NodeId, watch: IntersectionWatch) -> bool {
        self.nodes
            .get(&node)
            .is_some_and(|n| n.watches.contains(&watch))
    }

    /// Times [`Surface::scroll_into_view`] ran on `node`
    pub fn scroll_count(&self, node: NodeId) -> u32 {
        self.nodes.get(&node).map_or(0, |n| n.scrolled_into_view)
    }

    /// Running state of every attached element
    pub fn animation_states(&self) -> BTreeMap<NodeId, bool> {
        self.nodes
            .iter()
            .map(|(id, node)| (*id, node.animation_running))
            .collect()
    }

    /// Root and every element below it, in document order
    fn document_order(&self) -> Vec<NodeId> {
        let mut out = vec![self.root];
        self.collect_descendants(self.root, &mut out);
        out
    }

    fn collect_descendants(&self, node: NodeId, out: &mut Vec<NodeId>) {
        if let Some(n) = self.nodes.get(&node) {
            for child in &n.children {
                out.push(*child);
                self.collect_descendants(*child, out);
            }
        }
    }
}

impl Surface for MemorySurface {
    fn query(&self, selector: &str) -> Option<NodeId> {
        self.document_order()
            .into_iter()
            .find(|id| self.nodes.get(id).is_some_and(|n| n.matches(selector)))
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.document_order()
            .into_iter()
            .filter(|id| self.nodes.get(id).is_some_and(|n| n.matches(selector)))
            .collect()
    }

    fn root(&self) -> Option<NodeId> {
        Some(self.root)
    }

    fn create_child(&mut self, parent: NodeId, classes: &str) -> Option<NodeId> {
        if !self.nodes.contains_key(&parent) {
            return None;
        }
        self.created += 1;
        Some(self.add_element(parent, None, classes))
    }

    fn remove(&mut self, node: NodeId) -> bool {
        if node == self.root {
            return false;
        }
        let Some(removed) = self.nodes.remove(&node) else {
            return false;
        };
        if let Some(parent) = removed.parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|c| *c != node);
        }
        let mut stack = removed.children;
        while let Some(child) = stack.pop() {
            if let Some(n) = self.nodes.remove(&child) {
                stack.extend(n.children);
            }
        }
        true
    }

    fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(node, &mut out);
        out
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(n) = self.nodes.get_mut(&node) {
            if value.is_empty() {
                n.styles.remove(property);
            } else {
                n.styles.insert(property.to_string(), value.to_string());
            }
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes.get(&node)?.styles.get(property).cloned()
    }

    fn set_class(&mut self, node: NodeId, class: &str, on: bool) {
        if let Some(n) = self.nodes.get_mut(&node) {
            if on {
                n.classes.insert(class.to_string());
            } else {
                n.classes.remove(class);
            }
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes
            .get(&node)
            .is_some_and(|n| n.classes.contains(class))
    }

    fn animation_running(&self, node: NodeId) -> bool {
        self.nodes.get(&node).is_some_and(|n| n.animation_running)
    }

    fn set_animation_running(&mut self, node: NodeId, running: bool) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.animation_running = running;
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.text = text.to_string();
        }
    }

    fn text(&self, node: NodeId) -> Option<String> {
        self.nodes.get(&node).map(|n| n.text.clone())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes.get(&node)?.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn reset_form(&mut self, node: NodeId) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.form_resets += 1;
        }
    }

    fn observe_intersection(&mut self, node: NodeId, watch: IntersectionWatch) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.watches.insert(watch);
        }
    }

    fn scroll_into_view(&mut self, node: NodeId) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.scrolled_into_view += 1;
        }
    }
}
