use crate::error::LookupError;
use crate::types::{ElementCollection, ElementDescriptor, UiCategory};

use tracing::debug;

/// Role and label constraints for one UI check
#[derive(Debug, Clone, Copy)]
pub struct ElementFilter<'a> {
    /// Accepted roles. A role matches when it equals the element's role, or
    /// the last dotted segment of it, ignoring case. Empty accepts any role.
    pub roles: &'a [String],
    /// Label words, matched case-sensitively as substrings
    pub words: &'a [String],
}

impl ElementFilter<'_> {
    pub fn matches(&self, element: &ElementDescriptor) -> bool {
        let role_ok = self.roles.is_empty() || {
            let short = element.role.rsplit('.').next().unwrap_or_default();
            self.roles.iter().any(|r| {
                !r.is_empty()
                    && (r.eq_ignore_ascii_case(&element.role) || r.eq_ignore_ascii_case(short))
            })
        };
        role_ok
            && self
                .words
                .iter()
                .any(|w| !w.is_empty() && element.label.contains(w.as_str()))
    }
}

/// Query seam over an element collection.
///
/// Implementations may fail per query; the UI strategy treats a failed query
/// as "no match" for that check only.
pub trait ElementLookup {
    /// Matching elements in collection order
    fn find_elements(
        &self,
        filter: &ElementFilter<'_>,
    ) -> Result<Vec<ElementDescriptor>, LookupError>;
}

impl ElementLookup for [ElementDescriptor] {
    fn find_elements(
        &self,
        filter: &ElementFilter<'_>,
    ) -> Result<Vec<ElementDescriptor>, LookupError> {
        Ok(self.iter().filter(|e| filter.matches(e)).cloned().collect())
    }
}

impl ElementLookup for Vec<ElementDescriptor> {
    fn find_elements(
        &self,
        filter: &ElementFilter<'_>,
    ) -> Result<Vec<ElementDescriptor>, LookupError> {
        self.as_slice().find_elements(filter)
    }
}

impl ElementLookup for ElementCollection {
    fn find_elements(
        &self,
        filter: &ElementFilter<'_>,
    ) -> Result<Vec<ElementDescriptor>, LookupError> {
        self.elements()?.find_elements(filter)
    }
}

/// A UI element hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiMatch {
    pub category: UiCategory,
    pub element: ElementDescriptor,
}

/// Looks for ad shaped affordances: call-to-action buttons first, then
/// disclosure labels.
#[derive(Debug, Clone)]
pub struct UiElementStrategy {
    cta_words: Vec<String>,
    cta_roles: Vec<String>,
    disclosure_words: Vec<String>,
    disclosure_roles: Vec<String>,
}

impl UiElementStrategy {
    pub fn new(
        cta_words: &[String],
        cta_roles: &[String],
        disclosure_words: &[String],
        disclosure_roles: &[String],
    ) -> Self {
        Self {
            cta_words: cta_words.to_vec(),
            cta_roles: cta_roles.to_vec(),
            disclosure_words: disclosure_words.to_vec(),
            disclosure_roles: disclosure_roles.to_vec(),
        }
    }

    pub fn evaluate<L>(&self, lookup: &L) -> Option<UiMatch>
    where
        L: ElementLookup + ?Sized,
    {
        let checks = [
            (
                UiCategory::Button,
                ElementFilter {
                    roles: &self.cta_roles,
                    words: &self.cta_words,
                },
            ),
            (
                UiCategory::Label,
                ElementFilter {
                    roles: &self.disclosure_roles,
                    words: &self.disclosure_words,
                },
            ),
        ];

        for (category, filter) in checks {
            match lookup.find_elements(&filter) {
                Ok(found) => {
                    if let Some(element) = found.into_iter().next() {
                        debug!("Ad {:?} found: '{}'", category, element.label);
                        return Some(UiMatch { category, element });
                    }
                }
                Err(e) => {
                    debug!("Error checking ad {:?} elements: {}", category, e);
                }
            }
        }

        None
    }
}
