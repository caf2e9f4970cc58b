use crate::error::{ModeSwitchError, Result};
use log::debug;
use std::path::PathBuf;

/// A text element as the host display draws it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementDefinition {
    pub value: String,
    pub position: (i32, i32),
    pub font_size: u32,
    /// Font asset; `None` uses the host's default font.
    pub font_path: Option<PathBuf>,
}

impl ElementDefinition {
    pub fn text(value: impl Into<String>, position: (i32, i32), font_size: u32) -> Self {
        Self {
            value: value.into(),
            position,
            font_size,
            font_path: None,
        }
    }

    pub fn with_font(mut self, font_path: Option<PathBuf>) -> Self {
        self.font_path = font_path;
        self
    }
}

/// Host display the presenter drives. Elements are kept in insertion order.
pub trait DisplaySurface: Send {
    fn elements(&self) -> Vec<(String, ElementDefinition)>;

    /// Adds an element, replacing any element already stored under `key`.
    fn add_element(&mut self, key: &str, element: ElementDefinition) -> Result<()>;

    fn remove_element(&mut self, key: &str);

    fn contains(&self, key: &str) -> bool {
        self.elements().iter().any(|(existing, _)| existing == key)
    }

    fn update(&mut self, force: bool) -> Result<()>;
}

/// Ordered copy of every element visible before the transient view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisualSnapshot {
    elements: Vec<(String, ElementDefinition)>,
}

impl VisualSnapshot {
    pub fn capture(surface: &dyn DisplaySurface) -> Self {
        Self {
            elements: surface.elements(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ElementDefinition)> {
        self.elements
            .iter()
            .map(|(key, element)| (key.as_str(), element))
    }
}

/// In-process display that keeps elements in memory and logs each redraw.
///
/// Adding an element whose font asset does not exist fails, the way loading
/// a missing TrueType file fails on the device.
#[derive(Debug, Default)]
pub struct MemorySurface {
    elements: Vec<(String, ElementDefinition)>,
    redraws: u64,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_elements<I, K>(elements: I) -> Self
    where
        I: IntoIterator<Item = (K, ElementDefinition)>,
        K: Into<String>,
    {
        Self {
            elements: elements
                .into_iter()
                .map(|(key, element)| (key.into(), element))
                .collect(),
            redraws: 0,
        }
    }

    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    pub fn get(&self, key: &str) -> Option<&ElementDefinition> {
        self.elements
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, element)| element)
    }
}

impl DisplaySurface for MemorySurface {
    fn elements(&self) -> Vec<(String, ElementDefinition)> {
        self.elements.clone()
    }

    fn add_element(&mut self, key: &str, element: ElementDefinition) -> Result<()> {
        if let Some(font) = element.font_path.as_deref().filter(|font| !font.is_file()) {
            return Err(ModeSwitchError::Presentation(format!(
                "cannot open font resource {}",
                font.display()
            )));
        }

        match self.elements.iter_mut().find(|(existing, _)| existing == key) {
            Some((_, slot)) => *slot = element,
            None => self.elements.push((key.to_string(), element)),
        }
        Ok(())
    }

    fn remove_element(&mut self, key: &str) {
        self.elements.retain(|(existing, _)| existing != key);
    }

    fn update(&mut self, force: bool) -> Result<()> {
        self.redraws += 1;
        debug!(
            "Redraw #{} (force: {force}): {}",
            self.redraws,
            self.elements
                .iter()
                .map(|(key, element)| format!("{key}={:?}", element.value))
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(())
    }
}
