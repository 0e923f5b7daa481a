//! [`Surface`] over the live document
//!
//! Elements are interned on first sight: each gets a `data-fx-node`
//! attribute holding its [`NodeId`], so later queries for the same element
//! return the same id.
//!
//! Intersection watches go to the observers installed with
//! [`DomSurface::set_observer`]; without one they are ignored.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use effects::{IntersectionWatch, NodeId, Surface};
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlElement, HtmlFormElement, IntersectionObserver, ScrollBehavior,
    ScrollIntoViewOptions, ScrollLogicalPosition,
};

const NODE_ATTRIBUTE: &str = "data-fx-node";
const PLAY_STATE: &str = "animation-play-state";

pub struct DomSurface {
    document: Document,
    nodes: RefCell<HashMap<NodeId, Element>>,
    next_id: Cell<u64>,
    observers: HashMap<IntersectionWatch, IntersectionObserver>,
}

impl DomSurface {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            nodes: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
            observers: HashMap::new(),
        }
    }

    /// Route `watch` registrations to `observer`, replacing any previous one
    pub fn set_observer(&mut self, watch: IntersectionWatch, observer: IntersectionObserver) {
        if let Some(old) = self.observers.insert(watch, observer) {
            old.disconnect();
        }
    }

    pub fn disconnect_observers(&mut self) {
        for (_, observer) in self.observers.drain() {
            observer.disconnect();
        }
    }

    /// Id of an element this surface has already handed out
    pub fn node_of(&self, element: &Element) -> Option<NodeId> {
        let id = element
            .get_attribute(NODE_ATTRIBUTE)
            .and_then(|raw| raw.parse::<u64>().ok())
            .map(NodeId::new)?;
        self.nodes.borrow().contains_key(&id).then_some(id)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Element behind an id, if it is still attached
    pub fn element(&self, node: NodeId) -> Option<Element> {
        self.nodes
            .borrow()
            .get(&node)
            .filter(|el| el.is_connected())
            .cloned()
    }

    fn html(&self, node: NodeId) -> Option<HtmlElement> {
        self.element(node)?.dyn_into::<HtmlElement>().ok()
    }

    fn intern(&self, element: Element) -> NodeId {
        if let Some(id) = element
            .get_attribute(NODE_ATTRIBUTE)
            .and_then(|raw| raw.parse::<u64>().ok())
            .map(NodeId::new)
        {
            if self.nodes.borrow().contains_key(&id) {
                return id;
            }
        }
        let id = NodeId::new(self.next_id.get());
        self.next_id.set(id.raw() + 1);
        // an element that refuses attributes is still usable by id
        let _ = element.set_attribute(NODE_ATTRIBUTE, &id.raw().to_string());
        self.nodes.borrow_mut().insert(id, element);
        id
    }

    fn forget_subtree(&self, element: &Element) {
        let Ok(list) = element.query_selector_all(&format!("[{NODE_ATTRIBUTE}]")) else {
            return;
        };
        let mut nodes = self.nodes.borrow_mut();
        for i in 0..list.length() {
            let Some(child) = list.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            if let Some(id) = child
                .get_attribute(NODE_ATTRIBUTE)
                .and_then(|raw| raw.parse::<u64>().ok())
            {
                nodes.remove(&NodeId::new(id));
            }
        }
    }
}

impl Surface for DomSurface {
    fn query(&self, selector: &str) -> Option<NodeId> {
        let element = self.document.query_selector(selector).ok().flatten()?;
        Some(self.intern(element))
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| self.intern(element))
            .collect()
    }

    fn root(&self) -> Option<NodeId> {
        self.document.document_element().map(|el| self.intern(el))
    }

    fn create_child(&mut self, parent: NodeId, classes: &str) -> Option<NodeId> {
        let parent = self.element(parent)?;
        let child = self.document.create_element("div").ok()?;
        child.set_class_name(classes);
        parent.append_child(&child).ok()?;
        Some(self.intern(child))
    }

    fn remove(&mut self, node: NodeId) -> bool {
        let Some(element) = self.element(node) else {
            self.nodes.borrow_mut().remove(&node);
            return false;
        };
        for observer in self.observers.values() {
            observer.unobserve(&element);
        }
        self.forget_subtree(&element);
        element.remove();
        self.nodes.borrow_mut().remove(&node);
        true
    }

    fn contains(&self, node: NodeId) -> bool {
        self.element(node).is_some()
    }

    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let Some(element) = self.element(node) else {
            return Vec::new();
        };
        let Ok(list) = element.query_selector_all("*") else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|n| n.dyn_into::<Element>().ok())
            .map(|el| self.intern(el))
            .collect()
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        let Some(element) = self.html(node) else {
            return;
        };
        let style = element.style();
        let _ = if value.is_empty() {
            style.remove_property(property).map(|_| ())
        } else {
            style.set_property(property, value)
        };
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        let value = self.html(node)?.style().get_property_value(property).ok()?;
        (!value.is_empty()).then_some(value)
    }

    fn set_class(&mut self, node: NodeId, class: &str, on: bool) {
        if let Some(element) = self.element(node) {
            let _ = element.class_list().toggle_with_force(class, on);
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|el| el.class_list().contains(class))
    }

    fn animation_running(&self, node: NodeId) -> bool {
        self.style(node, PLAY_STATE).as_deref() != Some("paused")
    }

    fn set_animation_running(&mut self, node: NodeId, running: bool) {
        // running clears the inline override so stylesheet rules apply again
        self.set_style(node, PLAY_STATE, if running { "" } else { "paused" });
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(element) = self.element(node) {
            element.set_text_content(Some(text));
        }
    }

    fn text(&self, node: NodeId) -> Option<String> {
        self.element(node)?.text_content()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.get_attribute(name)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element(node) {
            let _ = element.set_attribute(name, value);
        }
    }

    fn reset_form(&mut self, node: NodeId) {
        if let Some(form) = self
            .element(node)
            .and_then(|el| el.dyn_into::<HtmlFormElement>().ok())
        {
            form.reset();
        }
    }

    fn observe_intersection(&mut self, node: NodeId, watch: IntersectionWatch) {
        if let (Some(element), Some(observer)) = (self.element(node), self.observers.get(&watch)) {
            observer.observe(&element);
        }
    }

    fn scroll_into_view(&mut self, node: NodeId) {
        if let Some(element) = self.element(node) {
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            options.set_block(ScrollLogicalPosition::Start);
            element.scroll_into_view_with_scroll_into_view_options(&options);
        }
    }
}
