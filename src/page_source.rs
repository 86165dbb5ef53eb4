//! Turns the automation driver's page source (the XML view hierarchy) into
//! the text set and element descriptors of a [`ScreenSnapshot`].

use crate::error::Result;
use crate::types::{ElementDescriptor, ScreenSnapshot, dedup_texts};

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use tracing::debug;

/// Attributes copied onto element descriptors when present
const KEPT_ATTRIBUTES: &[&str] = &["resource-id", "content-desc", "clickable", "bounds"];

pub struct PageSourceParser {
    text_attr: Regex,
    node: Regex,
    attr: Regex,
    entity: Regex,
}

impl PageSourceParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            text_attr: Regex::new(r#"\btext="([^"]*)""#)?,
            node: Regex::new(r#"<([A-Za-z_][\w.$-]*)\s([^<>]*?)/?>"#)?,
            attr: Regex::new(r#"([\w:.-]+)="([^"]*)""#)?,
            entity: Regex::new(r"&(?:#x([0-9A-Fa-f]+)|#([0-9]+)|(quot|apos|lt|gt|amp));")?,
        })
    }

    /// Non-blank `text` attribute values, deduplicated in document order
    pub fn extract_texts(&self, page_source: &str) -> Vec<String> {
        let texts = dedup_texts(
            self.text_attr
                .captures_iter(page_source)
                .map(|c| self.unescape(&c[1])),
        );
        debug!("Extracted {} text elements from screen", texts.len());
        texts
    }

    /// One descriptor per node with a non-blank `text`. The role is the node's
    /// `class` (or tag name). `content-desc` is an accessibility hint, not
    /// on-screen text, so it is only kept as an attribute.
    pub fn extract_elements(&self, page_source: &str) -> Vec<ElementDescriptor> {
        let mut elements = Vec::new();

        for node in self.node.captures_iter(page_source) {
            let attrs: BTreeMap<String, String> = self
                .attr
                .captures_iter(&node[2])
                .map(|c| (c[1].to_string(), self.unescape(&c[2])))
                .collect();

            let Some(label) = attrs.get("text").filter(|t| !t.trim().is_empty()) else {
                continue;
            };

            let role = attrs
                .get("class")
                .cloned()
                .unwrap_or_else(|| node[1].to_string());

            let mut element = ElementDescriptor::new(role, label.clone());
            for key in KEPT_ATTRIBUTES {
                if let Some(value) = attrs.get(*key).filter(|v| !v.is_empty()) {
                    element = element.with_attribute(*key, value.clone());
                }
            }
            elements.push(element);
        }

        elements
    }

    /// Text set and elements of one page source; no image attached
    pub fn parse(&self, page_source: &str) -> ScreenSnapshot {
        ScreenSnapshot::new(
            self.extract_texts(page_source),
            self.extract_elements(page_source),
        )
    }

    /// Decodes the five XML named entities and numeric character references
    /// in one pass. Unknown or invalid references are left as written.
    fn unescape(&self, raw: &str) -> String {
        if !raw.contains('&') {
            return raw.to_string();
        }
        self.entity
            .replace_all(raw, |c: &Captures<'_>| {
                let decoded = if let Some(hex) = c.get(1) {
                    u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
                } else if let Some(dec) = c.get(2) {
                    dec.as_str().parse().ok().and_then(char::from_u32)
                } else {
                    match &c[3] {
                        "quot" => Some('"'),
                        "apos" => Some('\''),
                        "lt" => Some('<'),
                        "gt" => Some('>'),
                        _ => Some('&'),
                    }
                };
                decoded.map_or_else(|| c[0].to_string(), String::from)
            })
            .into_owned()
    }
}
