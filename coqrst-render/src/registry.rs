//! Renderer registry for output selection by name
//!
//! Callers that take the output target from user input (the CLI's `--format`) look it
//! up here instead of matching on strings themselves.

use crate::error::RenderError;
use crate::renderer::Renderer;
use coqrst_notation::Notation;
use std::collections::HashMap;

/// Registry of notation renderers
///
/// # Examples
///
/// ```ignore
/// let registry = RendererRegistry::with_defaults();
/// let html = registry.render_str("intros {* @ident}", "html")?;
/// ```
pub struct RendererRegistry {
    renderers: HashMap<String, Box<dyn Renderer>>,
}

impl RendererRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        RendererRegistry {
            renderers: HashMap::new(),
        }
    }

    /// Register a renderer
    ///
    /// If a renderer with the same name already exists, it will be replaced.
    pub fn register<R: Renderer + 'static>(&mut self, renderer: R) {
        self.renderers
            .insert(renderer.name().to_string(), Box::new(renderer));
    }

    /// Get a renderer by name
    pub fn get(&self, name: &str) -> Result<&dyn Renderer, RenderError> {
        self.renderers
            .get(name)
            .map(|r| r.as_ref())
            .ok_or_else(|| RenderError::RendererNotFound(name.to_string()))
    }

    /// Check if a renderer exists
    pub fn has(&self, name: &str) -> bool {
        self.renderers.contains_key(name)
    }

    /// List all available renderer names (sorted)
    pub fn list_renderers(&self) -> Vec<String> {
        let mut names: Vec<_> = self.renderers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Render a parsed notation with the named renderer
    pub fn render(&self, notation: &Notation, renderer: &str) -> Result<String, RenderError> {
        self.get(renderer)?.render(notation)
    }

    /// Parse and render raw notation text with the named renderer
    pub fn render_str(&self, source: &str, renderer: &str) -> Result<String, RenderError> {
        self.get(renderer)?.render_str(source)
    }

    /// Create a registry with the built-in renderers and default options
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(crate::formats::html::HtmlRenderer::default());
        registry.register(crate::formats::doctree::DoctreeRenderer::default());
        registry.register(crate::formats::doctree::DoctreeJsonRenderer::default());
        registry.register(crate::formats::ellipsis::EllipsisRenderer::default());
        registry.register(crate::formats::regexp::RegexpRenderer::default());

        registry
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
