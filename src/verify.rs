use anyhow::Context as _;
use kuchiki::traits::TendrilSink as _;

use crate::copy::{BUTTON_CLASS, WRAPPER_CLASS};
use crate::nav;
use crate::page;
use crate::theme::THEME_ATTR;

/// Check an enhanced page before it is written out: exactly one theme on the
/// root, every code block wrapped exactly once with exactly one copy control,
/// and the navigation markers in agreement.
pub fn assert_enhanced(html: &str) -> anyhow::Result<()> {
    let doc = kuchiki::parse_html().one(html);

    let root = doc
        .select_first("html")
        .ok()
        .context("enhanced check failed: no root element")?;
    match root.attributes.borrow().get(THEME_ATTR) {
        Some("light") | Some("dark") => {}
        other => anyhow::bail!(
            "enhanced check failed: root {} is {:?}, expected \"light\" or \"dark\"",
            THEME_ATTR,
            other
        ),
    }

    if let Ok(nodes) = doc.select("pre") {
        for node in nodes {
            let parent = node
                .as_node()
                .parent()
                .context("enhanced check failed: detached code block")?;
            if !page::has_class(&parent, WRAPPER_CLASS) {
                anyhow::bail!("enhanced check failed: code block without a wrapper");
            }
            let controls = parent
                .select(&format!("button.{}", BUTTON_CLASS))
                .map(|nodes| nodes.count())
                .unwrap_or(0);
            if controls != 1 {
                anyhow::bail!(
                    "enhanced check failed: code block carries {} copy controls",
                    controls
                );
            }
        }
    }

    // A wrapper inside a wrapper means the enhancement pass ran twice.
    if let Ok(nodes) = doc.select(&format!(".{} .{}", WRAPPER_CLASS, WRAPPER_CLASS)) {
        if nodes.count() > 0 {
            anyhow::bail!("enhanced check failed: nested code block wrappers");
        }
    }

    let panel_open = doc
        .select_first(&format!("#{}", nav::PANEL_ID))
        .ok()
        .map(|n| page::has_class(n.as_node(), nav::OPEN_CLASS));
    let toggle_open = doc
        .select_first(&format!("#{}", nav::TOGGLE_ID))
        .ok()
        .map(|n| page::has_class(n.as_node(), nav::OPEN_CLASS));
    if let (Some(panel), Some(toggle)) = (panel_open, toggle_open) {
        if panel != toggle {
            anyhow::bail!(
                "enhanced check failed: navigation markers disagree (panel {}, toggle {})",
                panel,
                toggle
            );
        }
    }

    Ok(())
}
