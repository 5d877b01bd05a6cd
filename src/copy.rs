use std::time::Duration;

use kuchiki::NodeRef;
use kuchiki::traits::TendrilSink as _;
use maud::html;

use crate::env::Clipboard;
use crate::page::{self, Page};

/// How long the control shows its outcome before reverting to `Copy`.
pub const REVERT_DELAY: Duration = Duration::from_millis(2000);

pub const WRAPPER_CLASS: &str = "code-wrapper";
pub const BUTTON_CLASS: &str = "copy-button";
pub const COPIED_CLASS: &str = "copied";

/// One enhanced code block: the original `pre`, the wrapper inserted around
/// it, and the copy control appended to the wrapper. Each block gets its own
/// binding.
pub struct CopyBinding {
    pub block: NodeRef,
    pub wrapper: NodeRef,
    pub button: NodeRef,
}

/// Wrap every code block in the document, in document order, and attach a
/// copy control to each. Runs once per page load; blocks inserted later are
/// not picked up.
pub fn enhance_all(page: &Page) -> Vec<CopyBinding> {
    let blocks: Vec<NodeRef> = match page.document().select("pre") {
        Ok(nodes) => nodes.map(|n| n.as_node().clone()).collect(),
        Err(()) => Vec::new(),
    };

    let mut bindings = Vec::with_capacity(blocks.len());
    for block in blocks {
        let wrapper = fragment(&html! { div class=(WRAPPER_CLASS) {} }.into_string(), "div");
        let button = fragment(
            &html! { button type="button" class=(BUTTON_CLASS) { "Copy" } }.into_string(),
            "button",
        );

        // The wrapper takes the block's place, then adopts it.
        block.insert_before(wrapper.clone());
        block.detach();
        wrapper.append(block.clone());
        wrapper.append(button.clone());

        bindings.push(CopyBinding {
            block,
            wrapper,
            button,
        });
    }
    bindings
}

/// Text requested from the clipboard: a nested `code` annotation wins over
/// the block's raw text.
pub fn copy_text(binding: &CopyBinding) -> String {
    match binding.block.select_first("code") {
        Ok(code) => code.as_node().text_contents(),
        Err(()) => binding.block.text_contents(),
    }
}

/// Drive one activation of the copy control to its settled state.
///
/// Every activation schedules its own revert; overlapping activations are
/// left unguarded, so the last-scheduled revert decides the final label.
pub async fn activate(binding: &CopyBinding, clipboard: &dyn Clipboard) {
    let text = copy_text(binding);
    match clipboard.write_text(text).await {
        Ok(()) => {
            page::set_text(&binding.button, "Copied!");
            page::add_class(&binding.button, COPIED_CLASS);
        }
        Err(_) => {
            page::set_text(&binding.button, "Error");
        }
    }

    tokio::time::sleep(REVERT_DELAY).await;
    page::set_text(&binding.button, "Copy");
    page::remove_class(&binding.button, COPIED_CLASS);
}

fn fragment(html: &str, selector: &str) -> NodeRef {
    let doc = kuchiki::parse_html().one(html);
    doc.select_first(selector).unwrap().as_node().clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_block_gets_exactly_one_control() {
        let page = Page::parse(
            "<html><body>\
             <pre><code>first</code></pre>\
             <p>prose</p>\
             <pre>second</pre>\
             </body></html>",
        );
        let bindings = enhance_all(&page);
        assert_eq!(bindings.len(), 2);

        for binding in &bindings {
            assert!(page::has_class(&binding.wrapper, WRAPPER_CLASS));
            assert!(page::has_class(&binding.button, BUTTON_CLASS));
            assert_eq!(binding.button.text_contents(), "Copy");
            // The wrapper owns both the block and the control.
            assert!(binding.block.parent().unwrap() == binding.wrapper);
            assert!(binding.button.parent().unwrap() == binding.wrapper);
        }

        // Document order is preserved.
        assert_eq!(bindings[0].block.text_contents(), "first");
        assert_eq!(bindings[1].block.text_contents(), "second");
    }

    #[test]
    fn block_content_and_position_are_unchanged() {
        let page = Page::parse(
            "<html><body><section><h2>t</h2><pre><code>let x = 1;</code></pre><p>after</p></section></body></html>",
        );
        let bindings = enhance_all(&page);
        assert_eq!(bindings.len(), 1);

        let html = page.to_html().unwrap();
        assert!(html.contains("<pre><code>let x = 1;</code></pre>"));

        // Wrapper sits where the block was: between the heading and the
        // trailing paragraph.
        let section = page.document().select_first("section").unwrap();
        let children: Vec<String> = section
            .as_node()
            .children()
            .filter(|c| c.as_element().is_some())
            .map(|c| c.as_element().unwrap().name.local.as_ref().to_string())
            .collect();
        assert_eq!(children, vec!["h2", "div", "p"]);
    }

    #[test]
    fn nested_annotation_text_is_preferred() {
        let page = Page::parse(
            "<html><body><pre>  \n  <code>fn main() {}</code>\n  </pre></body></html>",
        );
        let bindings = enhance_all(&page);
        assert_eq!(copy_text(&bindings[0]), "fn main() {}");
    }

    #[test]
    fn raw_block_text_is_used_without_annotation() {
        let page = Page::parse("<html><body><pre>plain text</pre></body></html>");
        let bindings = enhance_all(&page);
        assert_eq!(copy_text(&bindings[0]), "plain text");
    }

    #[test]
    fn page_without_blocks_enhances_to_nothing() {
        let page = Page::parse("<html><body><p>no code here</p></body></html>");
        assert!(enhance_all(&page).is_empty());
    }
}
