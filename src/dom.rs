// Minimal document model: the elements a page reads from and renders into, keyed by id

use std::collections::{BTreeMap, BTreeSet};

pub const HIDDEN: &str = "hidden";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    pub text: String,
    pub inner_html: String,
    pub value: String,
    pub classes: BTreeSet<String>,
    pub disabled: bool,
    pub required: bool,
    pub input_type: Option<String>,
    pub name: Option<String>,
    // `data-i18n` key
    pub i18n_key: Option<String>,
    // Select options, first one is the placeholder
    pub options: Vec<String>,
    pub min: Option<String>,
    // Inline error shown under a form field
    pub field_error: Option<String>,
    // Ids of nested elements, in document order (form inputs)
    pub children: Vec<String>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn input(name: &str, input_type: &str, required: bool) -> Self {
        Self {
            tag: "input".to_string(),
            name: Some(name.to_string()),
            input_type: Some(input_type.to_string()),
            required,
            ..Self::default()
        }
    }

    pub fn select(options: &[&str]) -> Self {
        Self {
            tag: "select".to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.insert(class.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn with_i18n(mut self, key: &str) -> Self {
        self.i18n_key = Some(key.to_string());
        self
    }

    pub fn with_children(mut self, children: &[&str]) -> Self {
        self.children = children.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    pub fn is_hidden(&self) -> bool {
        self.has_class(HIDDEN)
    }

    pub fn is_email(&self) -> bool {
        self.input_type.as_deref() == Some("email")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub lang: String,
    elements: BTreeMap<String, Element>,
}

impl Document {
    pub fn new(lang: &str) -> Self {
        Self {
            lang: lang.to_string(),
            elements: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, id: &str, element: Element) -> &mut Self {
        self.elements.insert(id.to_string(), element);
        self
    }

    pub fn remove(&mut self, id: &str) -> Option<Element> {
        self.elements.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    // Value of a control, `None` when the control isn't on the page
    pub fn value_of(&self, id: &str) -> Option<&str> {
        self.get(id).map(|el| el.value.as_str())
    }

    pub fn set_value(&mut self, id: &str, value: &str) -> bool {
        match self.get_mut(id) {
            Some(el) => {
                el.value = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Element)> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Element)> {
        self.elements.iter_mut()
    }

    pub fn with_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = (&'a String, &'a Element)> {
        self.elements.iter().filter(move |(_, el)| el.has_class(class))
    }

    pub fn with_class_mut<'a>(
        &'a mut self,
        class: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a mut Element)> {
        self.elements.iter_mut().filter(move |(_, el)| el.has_class(class))
    }
}
