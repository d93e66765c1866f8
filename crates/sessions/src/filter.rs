//! Denylist content filter.

/// Case-insensitive substring denylist.
#[derive(Debug, Clone)]
pub struct ContentFilter {
    terms: Vec<String>,
}

impl ContentFilter {
    /// Build a filter from raw terms.  Terms are lowercased once here; blank
    /// terms are dropped since they would match every input.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { terms }
    }

    /// `true` when `text` contains any denylisted term.
    pub fn is_prohibited(&self, text: &str) -> bool {
        self.matched_term(text).is_some()
    }

    /// The first denylisted term found in `text`, if any.
    pub fn matched_term(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        self.terms
            .iter()
            .find(|t| lowered.contains(t.as_str()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aun_domain::config::PolicyConfig;

    fn default_filter() -> ContentFilter {
        ContentFilter::new(&PolicyConfig::default().denylist)
    }

    #[test]
    fn matches_any_case() {
        let f = default_filter();
        assert!(f.is_prohibited("PORN"));
        assert!(f.is_prohibited("some Porn site"));
        assert_eq!(f.matched_term("PoRn"), Some("porn"));
    }

    #[test]
    fn matches_arabic_substring() {
        let f = default_filter();
        assert!(f.is_prohibited("أريد التحدث عن الخمور"));
        assert!(f.is_prohibited("عندي مشكلة مع عادة سرية"));
        // Matching is on the exact term, so the definite-article form slips through.
        assert!(!f.is_prohibited("عندي مشكلة مع العادة السرية"));
    }

    #[test]
    fn clean_text_passes() {
        let f = default_filter();
        assert!(!f.is_prohibited("أشعر بالقلق"));
        assert!(!f.is_prohibited(""));
    }

    #[test]
    fn configured_terms_are_lowercased() {
        let f = ContentFilter::new(["Forbidden"]);
        assert!(f.is_prohibited("this is forbidden"));
    }

    #[test]
    fn blank_terms_are_dropped() {
        let f = ContentFilter::new(["", "  "]);
        assert!(f.is_empty());
        assert!(!f.is_prohibited("anything"));
    }
}
