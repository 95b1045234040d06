//! Shared configuration loader for the coqrst tools.
//!
//! `defaults/coqrst.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`CoqrstConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use coqrst_render::formats::doctree::DoctreeOptions;
use coqrst_render::formats::ellipsis::EllipsisOptions;
use coqrst_render::formats::html::HtmlOptions;
use coqrst_render::formats::regexp::RegexpOptions;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_TOML: &str = include_str!("../defaults/coqrst.default.toml");

/// Top-level configuration consumed by coqrst applications.
#[derive(Debug, Clone, Deserialize)]
pub struct CoqrstConfig {
    pub notation: NotationConfig,
    pub coqdoc: CoqdocConfig,
    pub coqtop: CoqtopConfig,
}

/// Options for each notation renderer.
#[derive(Debug, Clone, Deserialize)]
pub struct NotationConfig {
    pub html: HtmlOptions,
    pub regexp: RegexpOptions,
    pub ellipsis: EllipsisOptions,
    pub doctree: DoctreeOptions,
}

/// External highlighter invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct CoqdocConfig {
    pub binary: String,
    pub timeout_ms: u64,
}

impl CoqdocConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Interactive prover session.
#[derive(Debug, Clone, Deserialize)]
pub struct CoqtopConfig {
    pub binary: String,
    pub args: Vec<String>,
    pub color: bool,
    /// Regular expression for the prover's prompt
    pub prompt: String,
    pub timeout_ms: u64,
}

impl CoqtopConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<CoqrstConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<CoqrstConfig, ConfigError> {
    Loader::new().build()
}
