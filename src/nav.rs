use kuchiki::NodeRef;

use crate::page::{self, Page};

/// Toggle control shown on narrow viewports.
pub const TOGGLE_ID: &str = "mobile-menu-toggle";

/// The off-canvas navigation panel.
pub const PANEL_ID: &str = "sidebar";

/// Marker carried by the panel and the toggle control while open.
pub const OPEN_CLASS: &str = "open";

/// Navigation wiring. Exists only when the markup carries both the toggle
/// control and the panel; otherwise the feature is silently inert.
pub struct NavBinding {
    toggle: NodeRef,
    panel: NodeRef,
}

pub fn bind(page: &Page) -> Option<NavBinding> {
    let toggle = page.element_by_id(TOGGLE_ID)?;
    let panel = page.element_by_id(PANEL_ID)?;
    Some(NavBinding { toggle, panel })
}

impl NavBinding {
    pub fn toggle_control(&self) -> &NodeRef {
        &self.toggle
    }

    pub fn panel(&self) -> &NodeRef {
        &self.panel
    }

    /// Open state resets to closed on every page load; it is never persisted.
    pub fn is_open(&self) -> bool {
        page::has_class(&self.panel, OPEN_CLASS)
    }

    pub fn toggle(&self) {
        self.set_open(!self.is_open());
    }

    /// Document-level activation check: an open panel closes on any
    /// activation outside both the panel and the toggle control. A no-op
    /// while closed.
    pub fn close_if_outside(&self, target: &NodeRef) {
        if !self.is_open() {
            return;
        }
        if page::contains(&self.panel, target) || page::contains(&self.toggle, target) {
            return;
        }
        self.set_open(false);
    }

    // Panel and control markers always move together.
    fn set_open(&self, open: bool) {
        if open {
            page::add_class(&self.panel, OPEN_CLASS);
            page::add_class(&self.toggle, OPEN_CLASS);
        } else {
            page::remove_class(&self.panel, OPEN_CLASS);
            page::remove_class(&self.toggle, OPEN_CLASS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"<html><body>
        <button id="mobile-menu-toggle">Menu</button>
        <nav id="sidebar"><a id="nav-link">Guide</a></nav>
        <main id="content"><p id="prose">text</p></main>
    </body></html>"#;

    #[test]
    fn bind_requires_both_elements() {
        let page = Page::parse(r#"<html><body><nav id="sidebar"></nav></body></html>"#);
        assert!(bind(&page).is_none());

        let page = Page::parse(r#"<html><body><button id="mobile-menu-toggle"></button></body></html>"#);
        assert!(bind(&page).is_none());

        let page = Page::parse(FULL);
        assert!(bind(&page).is_some());
    }

    #[test]
    fn toggle_moves_both_markers_together() {
        let page = Page::parse(FULL);
        let nav = bind(&page).unwrap();
        assert!(!nav.is_open());

        nav.toggle();
        assert!(page::has_class(nav.panel(), OPEN_CLASS));
        assert!(page::has_class(nav.toggle_control(), OPEN_CLASS));

        nav.toggle();
        assert!(!page::has_class(nav.panel(), OPEN_CLASS));
        assert!(!page::has_class(nav.toggle_control(), OPEN_CLASS));
    }

    #[test]
    fn outside_activation_closes_an_open_panel() {
        let page = Page::parse(FULL);
        let nav = bind(&page).unwrap();
        nav.toggle();

        let prose = page.element_by_id("prose").unwrap();
        nav.close_if_outside(&prose);
        assert!(!nav.is_open());
    }

    #[test]
    fn activation_inside_panel_keeps_it_open() {
        let page = Page::parse(FULL);
        let nav = bind(&page).unwrap();
        nav.toggle();

        let link = page.element_by_id("nav-link").unwrap();
        nav.close_if_outside(&link);
        assert!(nav.is_open());
    }

    #[test]
    fn toggle_control_is_excluded_from_the_outside_predicate() {
        let page = Page::parse(FULL);
        let nav = bind(&page).unwrap();
        nav.toggle();

        nav.close_if_outside(nav.toggle_control());
        assert!(nav.is_open());
    }

    #[test]
    fn outside_check_is_a_no_op_while_closed() {
        let page = Page::parse(FULL);
        let nav = bind(&page).unwrap();

        let prose = page.element_by_id("prose").unwrap();
        nav.close_if_outside(&prose);
        assert!(!nav.is_open());
        assert!(!page::has_class(nav.toggle_control(), OPEN_CLASS));
    }
}
