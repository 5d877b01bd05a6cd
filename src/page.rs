use anyhow::Context as _;
use kuchiki::NodeRef;
use kuchiki::traits::TendrilSink as _;

/// A parsed, rendered documentation page.
///
/// The markup itself is owned by the site templates; this type only gives the
/// behavior modules a handle on it.
pub struct Page {
    document: NodeRef,
}

impl Page {
    pub fn parse(html: &str) -> Self {
        Self {
            document: kuchiki::parse_html().one(html),
        }
    }

    pub fn document(&self) -> &NodeRef {
        &self.document
    }

    pub fn root(&self) -> anyhow::Result<NodeRef> {
        Ok(self
            .document
            .select_first("html")
            .ok()
            .context("page has no root element")?
            .as_node()
            .clone())
    }

    pub fn element_by_id(&self, id: &str) -> Option<NodeRef> {
        self.document
            .select_first(&format!("#{id}"))
            .ok()
            .map(|n| n.as_node().clone())
    }

    pub fn head(&self) -> Option<NodeRef> {
        self.document
            .select_first("head")
            .ok()
            .map(|n| n.as_node().clone())
    }

    pub fn to_html(&self) -> anyhow::Result<String> {
        let mut out = Vec::new();
        self.document
            .serialize(&mut out)
            .context("serialize page")?;
        String::from_utf8(out).context("serialized page not utf-8")
    }
}

/// Inclusive containment: true when `target` is `scope` or a descendant of it.
pub fn contains(scope: &NodeRef, target: &NodeRef) -> bool {
    *target == *scope || target.ancestors().any(|a| a == *scope)
}

pub fn attr(node: &NodeRef, name: &str) -> Option<String> {
    node.as_element()
        .and_then(|el| el.attributes.borrow().get(name).map(|v| v.to_string()))
}

pub fn set_attr(node: &NodeRef, name: &str, value: &str) {
    if let Some(el) = node.as_element() {
        el.attributes.borrow_mut().insert(name, value.to_string());
    }
}

/// Replace the node's children with a single text child.
pub fn set_text(node: &NodeRef, text: &str) {
    let children: Vec<NodeRef> = node.children().collect();
    for child in children {
        child.detach();
    }
    node.append(NodeRef::new_text(text));
}

pub fn has_class(node: &NodeRef, class: &str) -> bool {
    attr(node, "class")
        .map(|v| v.split_whitespace().any(|t| t == class))
        .unwrap_or(false)
}

pub fn add_class(node: &NodeRef, class: &str) {
    if has_class(node, class) {
        return;
    }
    let next = match attr(node, "class") {
        Some(current) if !current.trim().is_empty() => format!("{} {}", current.trim(), class),
        _ => class.to_string(),
    };
    set_attr(node, "class", &next);
}

pub fn remove_class(node: &NodeRef, class: &str) {
    let Some(current) = attr(node, "class") else {
        return;
    };
    let next = current
        .split_whitespace()
        .filter(|t| *t != class)
        .collect::<Vec<_>>()
        .join(" ");
    set_attr(node, "class", &next);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_lookup_and_containment() {
        let page = Page::parse(r#"<nav id="menu"><ul><li><a id="link">x</a></li></ul></nav><p id="p">y</p>"#);
        let menu = page.element_by_id("menu").unwrap();
        let link = page.element_by_id("link").unwrap();
        let para = page.element_by_id("p").unwrap();

        assert!(contains(&menu, &link));
        assert!(contains(&menu, &menu));
        assert!(!contains(&menu, &para));
        assert!(page.element_by_id("missing").is_none());
    }

    #[test]
    fn class_list_edits() {
        let page = Page::parse(r#"<div id="d" class="a  b"></div>"#);
        let node = page.element_by_id("d").unwrap();

        assert!(has_class(&node, "a"));
        assert!(!has_class(&node, "c"));

        add_class(&node, "c");
        add_class(&node, "c");
        assert_eq!(attr(&node, "class").as_deref(), Some("a  b c"));

        remove_class(&node, "b");
        assert!(!has_class(&node, "b"));
        assert!(has_class(&node, "a"));
        assert!(has_class(&node, "c"));
    }

    #[test]
    fn set_text_replaces_children() {
        let page = Page::parse(r#"<button id="b"><span>Old</span> label</button>"#);
        let button = page.element_by_id("b").unwrap();
        set_text(&button, "New");
        assert_eq!(button.text_contents(), "New");
    }
}
