//! Named color themes, persisted to a [`ConfigStore`].
//!
//! A theme is an ordered palette shown left to right in a theme bar. The
//! store always holds at least one theme and rewrites its whole config
//! section after every mutation:
//!
//! ```text
//! [ColorThemes]
//! Theme0 = "Warm"
//! Theme0Color0 = "1 0.5 0 1"
//! Theme0Color1 = "0.8 0.2 0.1 1"
//! CurrentTheme = "Warm"
//! ```
//!
//! Loading probes `ThemeN` and `ThemeNColorM` keys in order and stops at the
//! first gap.

use tracing::{debug, warn};

use crate::color::LinearColor;
use crate::config::{self, ConfigStore};

pub const DEFAULT_THEME_NAME: &str = "New Theme";

/// Colors closer than this per component are duplicates when loading.
pub const LOAD_TOLERANCE: f64 = 1e-4;

const SECTION: &str = "ColorThemes";
const CURRENT_KEY: &str = "CurrentTheme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThemeId(u64);

/// Identity of one stored color, independent of its value or position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SwatchId(u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swatch {
    pub id: SwatchId,
    pub color: LinearColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorTheme {
    id: ThemeId,
    name: String,
    swatches: Vec<Swatch>,
}

impl ColorTheme {
    pub fn id(&self) -> ThemeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    pub fn colors(&self) -> impl Iterator<Item = LinearColor> + '_ {
        self.swatches.iter().map(|s| s.color)
    }

    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }

    /// Index of the first color equal to `color` within `tolerance`.
    pub fn find_approx_color(&self, color: &LinearColor, tolerance: f64) -> Option<usize> {
        self.swatches
            .iter()
            .position(|s| s.color.equals_within(color, tolerance))
    }
}

/// Rejected theme operations. The `Display` text is shown next to the
/// offending input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThemeError {
    #[error("Theme name cannot be empty")]
    EmptyName,
    #[error("A theme named \"{0}\" already exists")]
    DuplicateName(String),
    #[error("Theme no longer exists")]
    UnknownTheme,
}

#[derive(Debug)]
pub struct ColorThemeStore<C: ConfigStore> {
    themes: Vec<ColorTheme>,
    current: Option<ThemeId>,
    next_id: u64,
    config: C,
}

impl<C: ConfigStore> ColorThemeStore<C> {
    /// Rehydrate from `config`. When nothing is persisted yet the read is
    /// skipped; either way a store that ends up empty gets one default theme.
    pub fn load(config: C) -> Self {
        let mut store = Self {
            themes: Vec::new(),
            current: None,
            next_id: 0,
            config,
        };
        if store.config.exists() {
            store.read_themes();
        } else {
            debug!("no persisted color themes, starting fresh");
        }
        if store.themes.is_empty() {
            store.create_theme(DEFAULT_THEME_NAME, []);
        }
        store
    }

    pub fn themes(&self) -> &[ColorTheme] {
        &self.themes
    }

    pub fn theme(&self, id: ThemeId) -> Option<&ColorTheme> {
        self.themes.iter().find(|t| t.id == id)
    }

    pub fn theme_by_name(&self, name: &str) -> Option<&ColorTheme> {
        self.themes.iter().find(|t| t.name == name)
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// Direct access for components that share the backing store. Theme
    /// keys written here are overwritten by the next mutation.
    pub fn config_mut(&mut self) -> &mut C {
        &mut self.config
    }

    /// The selected theme; falls back to the first one.
    pub fn current_theme(&self) -> &ColorTheme {
        self.current
            .and_then(|id| self.theme(id))
            .unwrap_or(&self.themes[0])
    }

    pub fn set_current_theme(&mut self, id: ThemeId) -> Result<(), ThemeError> {
        self.index_of(id)?;
        self.current = Some(id);
        self.save();
        Ok(())
    }

    /// Add a theme. The name gets a `" N"` suffix if it is taken.
    pub fn create_theme(
        &mut self,
        name: &str,
        colors: impl IntoIterator<Item = LinearColor>,
    ) -> ThemeId {
        let id = self.push_theme(name, colors);
        debug!(theme = %self.themes[self.themes.len() - 1].name, "created color theme");
        self.save();
        id
    }

    /// Copy a theme's colors into a new theme named `"<name> Copy"`.
    pub fn duplicate_theme(&mut self, id: ThemeId) -> Result<ThemeId, ThemeError> {
        let source = &self.themes[self.index_of(id)?];
        let name = format!("{} Copy", source.name);
        let colors: Vec<LinearColor> = source.colors().collect();
        Ok(self.create_theme(&name, colors))
    }

    /// Check a candidate name for `id` without applying it.
    pub fn validate_theme_name(&self, id: ThemeId, name: &str) -> Result<(), ThemeError> {
        if name.is_empty() {
            return Err(ThemeError::EmptyName);
        }
        if self.themes.iter().any(|t| t.id != id && t.name == name) {
            return Err(ThemeError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    pub fn rename_theme(&mut self, id: ThemeId, new_name: &str) -> Result<(), ThemeError> {
        let index = self.index_of(id)?;
        self.validate_theme_name(id, new_name)?;
        let name = self.unique_name(new_name, Some(id));
        debug!(from = %self.themes[index].name, to = %name, "renamed color theme");
        self.themes[index].name = name;
        self.save();
        Ok(())
    }

    /// Remove a theme. Deleting the last one leaves a fresh default theme,
    /// and deleting the current one selects the first remaining.
    pub fn delete_theme(&mut self, id: ThemeId) -> Result<(), ThemeError> {
        let index = self.index_of(id)?;
        let removed = self.themes.remove(index);
        debug!(theme = %removed.name, "deleted color theme");
        if self.themes.is_empty() {
            self.push_theme(DEFAULT_THEME_NAME, []);
        }
        if self.current == Some(id) || self.current.is_none() {
            self.current = Some(self.themes[0].id);
        }
        self.save();
        Ok(())
    }

    /// Insert at `position`, clamped to the theme length.
    pub fn insert_color(
        &mut self,
        id: ThemeId,
        color: LinearColor,
        position: usize,
    ) -> Result<SwatchId, ThemeError> {
        let index = self.index_of(id)?;
        let swatch = Swatch {
            id: self.next_swatch_id(),
            color,
        };
        let theme = &mut self.themes[index];
        let position = position.min(theme.swatches.len());
        theme.swatches.insert(position, swatch);
        debug!(theme = %theme.name, position, "inserted theme color");
        self.save();
        Ok(swatch.id)
    }

    pub fn remove_color_at(&mut self, id: ThemeId, position: usize) -> Option<Swatch> {
        let index = self.index_of(id).ok()?;
        let theme = &mut self.themes[index];
        if position >= theme.swatches.len() {
            return None;
        }
        let swatch = theme.swatches.remove(position);
        debug!(theme = %theme.name, position, "removed theme color");
        self.save();
        Some(swatch)
    }

    /// Remove by identity. Another swatch holding the same value is left
    /// alone. Returns the index it was removed from.
    pub fn remove_color(&mut self, id: ThemeId, swatch: SwatchId) -> Option<usize> {
        let theme = self.theme(id)?;
        let position = theme.swatches.iter().position(|s| s.id == swatch)?;
        self.remove_color_at(id, position).map(|_| position)
    }

    pub fn find_approx_color(
        &self,
        id: ThemeId,
        color: &LinearColor,
        tolerance: f64,
    ) -> Option<usize> {
        self.theme(id)?.find_approx_color(color, tolerance)
    }

    fn index_of(&self, id: ThemeId) -> Result<usize, ThemeError> {
        self.themes
            .iter()
            .position(|t| t.id == id)
            .ok_or(ThemeError::UnknownTheme)
    }

    fn name_taken(&self, name: &str, ignore: Option<ThemeId>) -> bool {
        self.themes
            .iter()
            .any(|t| Some(t.id) != ignore && t.name == name)
    }

    fn unique_name(&self, base: &str, ignore: Option<ThemeId>) -> String {
        if !self.name_taken(base, ignore) {
            return base.to_string();
        }
        let mut n = 1;
        loop {
            let candidate = format!("{base} {n}");
            if !self.name_taken(&candidate, ignore) {
                return candidate;
            }
            n += 1;
        }
    }

    fn next_theme_id(&mut self) -> ThemeId {
        self.next_id += 1;
        ThemeId(self.next_id)
    }

    fn next_swatch_id(&mut self) -> SwatchId {
        self.next_id += 1;
        SwatchId(self.next_id)
    }

    /// Append without persisting.
    fn push_theme(&mut self, name: &str, colors: impl IntoIterator<Item = LinearColor>) -> ThemeId {
        let name = self.unique_name(name, None);
        let id = self.next_theme_id();
        let swatches = colors
            .into_iter()
            .map(|color| Swatch {
                id: self.next_swatch_id(),
                color,
            })
            .collect();
        self.themes.push(ColorTheme { id, name, swatches });
        id
    }

    fn read_themes(&mut self) {
        for n in 0.. {
            let Some(name) = self.config.get(SECTION, &format!("Theme{n}")) else {
                break;
            };
            let id = self.push_theme(&name, []);
            let index = self.themes.len() - 1;
            for m in 0.. {
                let key = format!("Theme{n}Color{m}");
                let Some(raw) = self.config.get(SECTION, &key) else {
                    break;
                };
                let color = match raw.parse::<LinearColor>() {
                    Ok(color) => color,
                    Err(e) => {
                        warn!(key = %key, error = %e, "skipping malformed theme color");
                        continue;
                    }
                };
                if self.themes[index]
                    .find_approx_color(&color, LOAD_TOLERANCE)
                    .is_some()
                {
                    continue;
                }
                let swatch = Swatch {
                    id: self.next_swatch_id(),
                    color,
                };
                self.themes[index].swatches.push(swatch);
            }
            debug!(theme = %self.themes[index].name, colors = self.themes[index].len(), ?id, "loaded color theme");
        }
        self.current = self
            .config
            .get(SECTION, CURRENT_KEY)
            .and_then(|name| self.theme_by_name(&name).map(|t| t.id));
    }

    fn save(&mut self) {
        self.config.clear_section(SECTION);
        for (n, theme) in self.themes.iter().enumerate() {
            self.config.set(SECTION, &format!("Theme{n}"), &theme.name);
            for (m, swatch) in theme.swatches.iter().enumerate() {
                self.config.set(
                    SECTION,
                    &format!("Theme{n}Color{m}"),
                    &swatch.color.to_string(),
                );
            }
        }
        let current = self
            .current
            .and_then(|id| self.theme(id))
            .map(|t| t.name.clone());
        if let Some(name) = current {
            self.config.set(SECTION, CURRENT_KEY, &name);
        }
        config::flush_logged(&mut self.config);
    }
}
