use std::rc::Rc;

use kuchiki::NodeRef;

use crate::env::{ColorSchemeProbe, ThemeStore};
use crate::page::{self, Page};

/// Attribute on the root element that the site stylesheet keys its palettes
/// off.
pub const THEME_ATTR: &str = "data-theme";

/// Optional theme-switch control in the page header.
pub const SWITCH_ID: &str = "theme-toggle";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Unrecognized values are treated as nothing persisted.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

pub struct ThemeController {
    root: NodeRef,
    switch: Option<NodeRef>,
    store: Rc<dyn ThemeStore>,
    scheme: Rc<dyn ColorSchemeProbe>,
}

impl ThemeController {
    pub fn new(
        page: &Page,
        store: Rc<dyn ThemeStore>,
        scheme: Rc<dyn ColorSchemeProbe>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            root: page.root()?,
            switch: page.element_by_id(SWITCH_ID),
            store,
            scheme,
        })
    }

    /// The persisted choice if one exists, else the ambient preference.
    pub fn preferred(&self) -> Theme {
        let saved = match self.store.load() {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!("theme store read failed: {err:#}");
                None
            }
        };
        if let Some(theme) = saved.as_deref().and_then(Theme::parse) {
            return theme;
        }
        if self.scheme.prefers_dark() {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Theme currently carried by the document's presentation attribute.
    pub fn active(&self) -> Option<Theme> {
        page::attr(&self.root, THEME_ATTR)
            .as_deref()
            .and_then(Theme::parse)
    }

    /// Restyle the whole page (the stylesheet reacts to the root attribute)
    /// and persist the choice, overwriting any prior value.
    pub fn apply(&self, theme: Theme) {
        page::set_attr(&self.root, THEME_ATTR, theme.as_str());
        if let Err(err) = self.store.save(theme.as_str()) {
            tracing::debug!("theme store write failed: {err:#}");
        }
        self.refresh_switch(theme);
    }

    /// Flip whatever the document currently shows.
    pub fn toggle(&self) {
        let current = self.active().unwrap_or_else(|| self.preferred());
        self.apply(current.opposite());
    }

    pub fn switch(&self) -> Option<&NodeRef> {
        self.switch.as_ref()
    }

    // The control names the theme it will switch to.
    fn refresh_switch(&self, active: Theme) {
        let Some(button) = &self.switch else {
            return;
        };
        let next = active.opposite();
        page::set_text(
            button,
            match next {
                Theme::Dark => "Dark",
                Theme::Light => "Light",
            },
        );
        let label = format!("Switch to {} theme", next.as_str());
        page::set_attr(button, "aria-label", &label);
        page::set_attr(button, "title", &label);
    }
}
