//! Turning container elements into word nodes.

use ego_tree::NodeId;
use tracing::debug;
use wordflip_core::{MarkerSet, SwitcherOptions, WordCycler, split_words};

use crate::document::{Document, ElementData};
use crate::error::Result;

/// A container element bound to its cycler.
#[derive(Debug, Clone)]
pub struct ContainerBinding {
    /// The host element.
    pub element: NodeId,
    /// Generated word elements, index-aligned with the cycler's nodes.
    pub words: Vec<NodeId>,
    pub cycler: WordCycler,
}

impl ContainerBinding {
    /// Text of every word, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.cycler.words().collect()
    }
}

/// Rewrite every container in `document` and bind a cycler to each.
///
/// Containers are processed in document order. Without any container this
/// does nothing and returns an empty list.
pub fn initialize(
    document: &mut Document,
    options: &SwitcherOptions,
    markers: &MarkerSet,
) -> Result<Vec<ContainerBinding>> {
    let containers = document.find_by_class(&options.container_class);
    if containers.is_empty() {
        debug!(class = %options.container_class, "no containers found");
        return Ok(Vec::new());
    }

    let mut bindings = Vec::with_capacity(containers.len());
    for element in containers {
        let content = document.text_content(element).unwrap_or_default();
        let words = split_words(&content, &options.delimiter);
        let cycler = WordCycler::new(words, options.cycle);

        document.clear_children(element)?;
        let mut word_ids = Vec::with_capacity(cycler.len());
        for (index, node) in cycler.nodes().iter().enumerate() {
            let class = cycler.class_attr(index, markers).unwrap_or_default();
            let word = ElementData::new(options.word_tag.as_str()).with_attr("class", class);
            word_ids.push(document.append_element(element, word, Some(&node.text))?);
        }
        debug!(words = word_ids.len(), "container initialized");

        bindings.push(ContainerBinding {
            element,
            words: word_ids,
            cycler,
        });
    }
    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(html: &str) -> (Document, Vec<ContainerBinding>) {
        let mut doc = Document::parse_fragment(html);
        let options = SwitcherOptions::default();
        let bindings = initialize(&mut doc, &options, &options.markers()).unwrap();
        (doc, bindings)
    }

    #[test]
    fn test_builds_one_span_per_word() {
        let (doc, bindings) = setup(r#"<span class="words-switcher">a|b|c</span>"#);
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].texts(), vec!["a", "b", "c"]);
        assert_eq!(
            doc.to_html(),
            concat!(
                r#"<span class="words-switcher">"#,
                r#"<span class="ws-show ws-flip-in">a</span>"#,
                r#"<span class="ws-hide">b</span>"#,
                r#"<span class="ws-hide">c</span>"#,
                "</span>"
            )
        );
    }

    #[test]
    fn test_no_containers_is_noop() {
        let (doc, bindings) = setup("<p>a|b</p>");
        assert!(bindings.is_empty());
        assert_eq!(doc.to_html(), "<p>a|b</p>");
    }

    #[test]
    fn test_empty_container_has_no_words() {
        let (doc, bindings) = setup(r#"<span class="words-switcher"></span>"#);
        assert_eq!(bindings.len(), 1);
        assert!(bindings[0].words.is_empty());
        assert!(bindings[0].cycler.is_finished());
        assert_eq!(doc.to_html(), r#"<span class="words-switcher"></span>"#);
    }

    #[test]
    fn test_trailing_empty_segment() {
        let (doc, bindings) = setup(r#"<span class="words-switcher">a|</span>"#);
        assert_eq!(bindings[0].words.len(), 2);
        assert_eq!(doc.text_content(bindings[0].words[1]).unwrap(), "");
    }

    #[test]
    fn test_whitespace_is_preserved() {
        let (doc, bindings) = setup(r#"<span class="words-switcher"> word 1 | word 2 </span>"#);
        let texts: Vec<_> = bindings[0]
            .words
            .iter()
            .map(|id| doc.text_content(*id).unwrap())
            .collect();
        assert_eq!(texts, vec![" word 1 ", " word 2 "]);
    }
}
