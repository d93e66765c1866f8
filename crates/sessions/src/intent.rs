//! Keyword intent classifier.
//!
//! Rules are evaluated top-down and the first rule with a matching keyword
//! wins.  The default order is [`INTENT_PRIORITY`]: an input carrying both
//! an education cue and a support cue is Education.

use aun_domain::config::{IntentRuleConfig, PolicyConfig};
use aun_domain::conversation::Intent;

/// Default evaluation order of the keyword rules.
pub const INTENT_PRIORITY: [Intent; 3] = [Intent::Education, Intent::Support, Intent::Booking];

/// One row of the ordered rule table.
#[derive(Debug, Clone)]
pub struct IntentRule {
    pub intent: Intent,
    keywords: Vec<String>,
}

impl IntentRule {
    pub fn new<I, S>(intent: Intent, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { intent, keywords }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

/// Deterministic, stateless classifier.  Never fails; unmatched input is
/// [`Intent::Casual`].
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
}

impl IntentClassifier {
    pub fn new(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    pub fn from_config(rules: &[IntentRuleConfig]) -> Self {
        Self::new(
            rules
                .iter()
                .map(|r| IntentRule::new(r.intent, &r.keywords))
                .collect(),
        )
    }

    pub fn classify(&self, text: &str) -> Intent {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::Casual)
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::from_config(&PolicyConfig::default().intent_rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_order_is_the_priority_constant() {
        let order: Vec<Intent> = IntentClassifier::default()
            .rules()
            .iter()
            .map(|r| r.intent)
            .collect();
        assert_eq!(order, INTENT_PRIORITY.to_vec());
    }

    #[test]
    fn what_is_anxiety_is_education() {
        // Carries both "ما هو" (education) and "قلق" (support).
        assert_eq!(IntentClassifier::default().classify("ما هو القلق؟"), Intent::Education);
    }

    #[test]
    fn i_feel_anxious_is_support() {
        assert_eq!(IntentClassifier::default().classify("أشعر بالقلق"), Intent::Support);
    }

    #[test]
    fn booking_keywords() {
        let c = IntentClassifier::default();
        assert_eq!(c.classify("أريد أن احجز موعد"), Intent::Booking);
        assert_eq!(c.classify("هل توجد جلسة غداً؟"), Intent::Booking);
    }

    #[test]
    fn support_beats_booking() {
        assert_eq!(
            IntentClassifier::default().classify("أنا حزين وأريد جلسة"),
            Intent::Support
        );
    }

    #[test]
    fn no_match_is_casual() {
        let c = IntentClassifier::default();
        assert_eq!(c.classify("السلام عليكم"), Intent::Casual);
        assert_eq!(c.classify(""), Intent::Casual);
    }

    #[test]
    fn custom_order_changes_priority() {
        let c = IntentClassifier::new(vec![
            IntentRule::new(Intent::Support, ["anxious"]),
            IntentRule::new(Intent::Education, ["What Is"]),
        ]);
        assert_eq!(c.classify("what is it to be ANXIOUS"), Intent::Support);
        assert_eq!(c.classify("WHAT IS cbt"), Intent::Education);
    }
}
