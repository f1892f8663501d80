//! An in-memory document tree.
//!
//! Elements live in a `SlotMap` and are indexed by name. The standard
//! clock-face layout is available through [`Document::clock_face`].

use crate::common::ElementId;
use crate::host::DocumentTree;
use slotmap::SlotMap;
use std::collections::HashMap;

/// The root element; taps on it cycle the stats slot.
pub const ROOT_ELEMENT: &str = "clock";

/// What an element renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Group,
    Text,
    Image,
}

/// A single visual element.
#[derive(Debug, Clone)]
pub struct Element {
    pub name: String,
    pub kind: ElementKind,
    pub text: String,
    pub href: String,
}

/// A point-in-time view of one element, as shown on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSnapshot {
    pub name: String,
    pub kind: ElementKind,
    /// Text for labels, resource reference for images, empty for groups.
    pub value: String,
}

#[derive(Debug)]
pub struct Document {
    elements: SlotMap<ElementId, Element>,
    by_name: HashMap<String, ElementId>,
    writes: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self {
            elements: SlotMap::with_key(),
            by_name: HashMap::new(),
            writes: 0,
        }
    }

    /// Builds the standard clock-face layout.
    ///
    /// Contains the `clock` root, the `time`, `date` and `stats` label pairs
    /// and the `stats` icon pair.
    pub fn clock_face() -> Self {
        let mut document = Self::new();
        document.insert(ROOT_ELEMENT, ElementKind::Group);
        for name in ["time", "date", "stats"] {
            document.insert(&format!("{name}LabelShadow"), ElementKind::Text);
            document.insert(&format!("{name}LabelMain"), ElementKind::Text);
        }
        document.insert("statsIconShadow", ElementKind::Image);
        document.insert("statsIconMain", ElementKind::Image);
        document
    }

    /// Adds an element. A later element with the same name shadows the
    /// earlier one in lookups.
    pub fn insert(&mut self, name: &str, kind: ElementKind) -> ElementId {
        let id = self.elements.insert(Element {
            name: name.to_string(),
            kind,
            text: String::new(),
            href: String::new(),
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn by_name(&self, name: &str) -> Option<&Element> {
        self.by_name.get(name).and_then(|id| self.elements.get(*id))
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.by_name(name).map(|element| element.text.as_str())
    }

    pub fn href(&self, name: &str) -> Option<&str> {
        self.by_name(name).map(|element| element.href.as_str())
    }

    /// Number of mutations applied since the document was created.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Returns every element in insertion order.
    pub fn snapshot(&self) -> Vec<ElementSnapshot> {
        self.elements
            .values()
            .map(|element| ElementSnapshot {
                name: element.name.clone(),
                kind: element.kind,
                value: match element.kind {
                    ElementKind::Text => element.text.clone(),
                    ElementKind::Image => element.href.clone(),
                    ElementKind::Group => String::new(),
                },
            })
            .collect()
    }
}

impl DocumentTree for Document {
    fn element_id(&self, name: &str) -> Option<ElementId> {
        self.by_name.get(name).copied()
    }

    fn set_text(&mut self, id: ElementId, text: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element.text = text.to_string();
            self.writes += 1;
        }
    }

    fn set_href(&mut self, id: ElementId, href: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element.href = href.to_string();
            self.writes += 1;
        }
    }
}
