use std::rc::Rc;

use kuchiki::NodeRef;

use crate::copy::{self, CopyBinding};
use crate::env::{Clipboard, ColorSchemeProbe, ThemeStore};
use crate::nav::{self, NavBinding};
use crate::page::{self, Page};
use crate::theme::ThemeController;

/// Capabilities the hosting environment hands to the page behaviors.
#[derive(Clone)]
pub struct Host {
    pub store: Rc<dyn ThemeStore>,
    pub scheme: Rc<dyn ColorSchemeProbe>,
    pub clipboard: Rc<dyn Clipboard>,
}

/// The three page behaviors, wired once per page load. They share the init
/// entry point and the persisted theme store but are otherwise independent.
pub struct Behaviors {
    page: Page,
    theme: ThemeController,
    copy: Vec<CopyBinding>,
    nav: Option<NavBinding>,
    clipboard: Rc<dyn Clipboard>,
}

impl Behaviors {
    /// The once-per-load entry point. The resolved theme is applied
    /// synchronously, before any activation can be dispatched, so the page
    /// never paints in the wrong theme. Consumes the page: enhancement
    /// cannot run a second time on the same document.
    pub fn init(page: Page, host: Host) -> anyhow::Result<Self> {
        let theme = ThemeController::new(&page, host.store, host.scheme)?;
        theme.apply(theme.preferred());

        let copy = copy::enhance_all(&page);
        let nav = nav::bind(&page);
        tracing::debug!(blocks = copy.len(), nav = nav.is_some(), "page behaviors wired");

        Ok(Self {
            page,
            theme,
            copy,
            nav,
            clipboard: host.clipboard,
        })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn theme(&self) -> &ThemeController {
        &self.theme
    }

    pub fn copy_bindings(&self) -> &[CopyBinding] {
        &self.copy
    }

    pub fn nav(&self) -> Option<&NavBinding> {
        self.nav.as_ref()
    }

    pub fn into_page(self) -> Page {
        self.page
    }

    /// Deliver one user activation the way the browser would: the target's
    /// own control handler first, then the document-level listener with the
    /// panel and toggle control excluded, then the suspension point of any
    /// clipboard write.
    pub async fn click(&self, target: &NodeRef) {
        if let Some(switch) = self.theme.switch() {
            if page::contains(switch, target) {
                self.theme.toggle();
            }
        }

        let pending = self
            .copy
            .iter()
            .find(|binding| page::contains(&binding.button, target));

        if let Some(nav) = &self.nav {
            if page::contains(nav.toggle_control(), target) {
                nav.toggle();
            } else {
                nav.close_if_outside(target);
            }
        }

        if let Some(binding) = pending {
            copy::activate(binding, self.clipboard.as_ref()).await;
        }
    }
}
