//! Shared test support: an in-memory document adapter.

#![allow(dead_code, reason = "shared between test binaries; not every binary uses every helper")]

use element_query::{DocumentAdapter, Viewport};
use std::collections::BTreeSet;

/// A minimal document tree for driving the engine in tests. Selector
/// support covers a single compound selector (tag, `#id`, `.class` parts),
/// which is all the generated selectors in these tests need.
pub struct MockDocument {
    elements: Vec<MockElement>,
    root_font_size_px: Option<f32>,
    viewport: Viewport,
}

struct MockElement {
    tag: String,
    id: Option<String>,
    classes: BTreeSet<String>,
    parent: Option<usize>,
    width_px: f32,
    font_size_px: Option<f32>,
}

impl MockDocument {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            root_font_size_px: Some(16.0),
            viewport: Viewport {
                width_px: 1024.0,
                height_px: 768.0,
            },
        }
    }

    pub fn with_viewport(width_px: f32, height_px: f32) -> Self {
        let mut document = Self::new();
        document.viewport = Viewport {
            width_px,
            height_px,
        };
        document
    }

    pub fn add_element(&mut self, tag: &str, parent: Option<usize>) -> usize {
        self.elements.push(MockElement {
            tag: tag.to_owned(),
            id: None,
            classes: BTreeSet::new(),
            parent,
            width_px: 0.0,
            font_size_px: None,
        });
        self.elements.len() - 1
    }

    pub fn set_id(&mut self, element: usize, id: &str) {
        self.elements[element].id = Some(id.to_owned());
    }

    pub fn set_class(&mut self, element: usize, class: &str) {
        self.elements[element].classes.insert(class.to_owned());
    }

    pub fn set_width(&mut self, element: usize, width_px: f32) {
        self.elements[element].width_px = width_px;
    }

    pub fn set_font_size(&mut self, element: usize, font_size_px: Option<f32>) {
        self.elements[element].font_size_px = font_size_px;
    }

    pub fn set_root_font_size(&mut self, font_size_px: Option<f32>) {
        self.root_font_size_px = font_size_px;
    }

    pub fn classes(&self, element: usize) -> Vec<String> {
        self.elements[element].classes.iter().cloned().collect()
    }

    pub fn has_class(&self, element: usize, class: &str) -> bool {
        self.elements[element].classes.contains(class)
    }

    fn matches_compound(&self, element: usize, compound: &str) -> bool {
        let subject = &self.elements[element];
        split_simples(compound).iter().all(|simple| match simple {
            Simple::Tag(name) => subject.tag == *name,
            Simple::Id(name) => subject.id.as_deref() == Some(name),
            Simple::Class(name) => subject.classes.contains(name),
        })
    }
}

impl DocumentAdapter for MockDocument {
    type Handle = usize;

    fn select(&self, selector: &str) -> Vec<usize> {
        let compound = selector.trim();
        if compound.is_empty() {
            return Vec::new();
        }
        (0..self.elements.len())
            .filter(|element| self.matches_compound(*element, compound))
            .collect()
    }

    fn parent(&self, element: usize) -> Option<usize> {
        self.elements[element].parent
    }

    fn box_width_px(&self, element: usize) -> f32 {
        self.elements[element].width_px
    }

    fn font_size_px(&self, element: Option<usize>) -> Option<f32> {
        match element {
            Some(index) => self.elements[index].font_size_px,
            None => self.root_font_size_px,
        }
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn add_class(&mut self, element: usize, class: &str) {
        self.elements[element].classes.insert(class.to_owned());
    }

    fn remove_class(&mut self, element: usize, class: &str) {
        self.elements[element].classes.remove(class);
    }
}

enum Simple {
    Tag(String),
    Id(String),
    Class(String),
}

fn split_simples(compound: &str) -> Vec<Simple> {
    let mut simples = Vec::new();
    let mut kind = 't';
    let mut current = String::new();
    for character in compound.chars() {
        if character == '.' || character == '#' {
            push_simple(&mut simples, kind, &current);
            kind = character;
            current.clear();
        } else {
            current.push(character);
        }
    }
    push_simple(&mut simples, kind, &current);
    simples
}

fn push_simple(simples: &mut Vec<Simple>, kind: char, name: &str) {
    if name.is_empty() {
        return;
    }
    match kind {
        '.' => simples.push(Simple::Class(name.to_owned())),
        '#' => simples.push(Simple::Id(name.to_owned())),
        _ => simples.push(Simple::Tag(name.to_owned())),
    }
}
