use serde::{Deserialize, Serialize};

use crate::conversation::Intent;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Conversation policy: preamble, filter terms, intent rules, fixed texts
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Content policy and the fixed user-facing texts of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Pinned at position 0 of every memory window.
    #[serde(default = "d_system_prompt")]
    pub system_prompt: String,

    /// Case-insensitive substrings that redirect a turn before it reaches
    /// the model.
    #[serde(default = "d_denylist")]
    pub denylist: Vec<String>,

    /// Evaluated top-down; the first rule with a matching keyword wins.
    #[serde(default = "d_intent_rules")]
    pub intent_rules: Vec<IntentRuleConfig>,

    /// Returned for a filtered turn.  Never stored in memory.
    #[serde(default = "d_redirect_message")]
    pub redirect_message: String,

    /// Returned (and remembered) when the direct completion fails.
    #[serde(default = "d_transient_error_message")]
    pub transient_error_message: String,

    /// Returned (and remembered) when the tool-augmented agent fails.
    #[serde(default = "d_agent_error_message")]
    pub agent_error_message: String,

    /// Synthetic instruction appended for tool-augmented replies.
    /// `{state}` is replaced with the discourse state name.
    #[serde(default = "d_state_instruction")]
    pub state_instruction: String,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            system_prompt: d_system_prompt(),
            denylist: d_denylist(),
            intent_rules: d_intent_rules(),
            redirect_message: d_redirect_message(),
            transient_error_message: d_transient_error_message(),
            agent_error_message: d_agent_error_message(),
            state_instruction: d_state_instruction(),
        }
    }
}

/// One row of the ordered intent table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentRuleConfig {
    pub intent: Intent,
    pub keywords: Vec<String>,
}

// ── serde default helpers ───────────────────────────────────────────

fn d_system_prompt() -> String {
    "\
أنت مساعد متخصص في الدعم النفسي تم تطويرك ضمن منصة \"عون\".

الهوية:
- التطبيق من تطوير فريق منصة عون.
- المطور التقني: المهندس عبدالقادر الشنبور.
- تقدم دعماً نفسياً متوافقاً مع القيم الإسلامية والأخلاق السليمة.

المبادئ:
- عزز الطمأنينة، الصبر، ضبط النفس، والعفة.
- لا تشجع أو تبرر أي سلوك محرم أو ضار مثل الإباحية، الزنا، الخمور، أو الإدمان.
- إذا طُلب أمر مخالف، وجّه بلطف نحو بديل صحي ونقي.
- لا تكن واعظاً قاسياً، بل موجهاً رحيماً.
- لا تقدم تشخيصات طبية.
- استخدم لغة هادئة متزنة.

آلية التفاعل:
- افهم السياق أولاً.
- اسأل أسئلة استكشافية.
- يمكن إدماج بعد روحي عند الحاجة بشكل طبيعي وغير مباشر.
"
    .into()
}

fn d_denylist() -> Vec<String> {
    [
        "اباحية",
        "اباحي",
        "porn",
        "زنا",
        "علاقة محرمة",
        "خمور",
        "كحول",
        "سكر",
        "عادة سرية",
        "استمناء",
    ]
    .iter()
    .map(|s| (*s).to_owned())
    .collect()
}

fn d_intent_rules() -> Vec<IntentRuleConfig> {
    let rule = |intent, words: &[&str]| IntentRuleConfig {
        intent,
        keywords: words.iter().map(|s| (*s).to_owned()).collect(),
    };
    vec![
        rule(Intent::Education, &["اشرح", "ما هو", "تعريف"]),
        rule(Intent::Support, &["متوتر", "قلق", "حزين", "ضيق"]),
        rule(Intent::Booking, &["احجز", "جلسة", "موعد"]),
    ]
}

fn d_redirect_message() -> String {
    "أفهم أن هناك أموراً قد تشغل بالك، لكن من المهم أن نحافظ على نقاء النفس وسلامتها.\n\n\
     إذا كنت تواجه صراعاً داخلياً، يمكننا الحديث عن طرق صحية ونقية \
     للتعامل مع الضغوط والرغبات.\n\n\
     ما الذي تشعر به تحديداً؟"
        .into()
}

fn d_transient_error_message() -> String {
    "حدث خطأ مؤقت في المعالجة، حاول مرة أخرى.".into()
}

fn d_agent_error_message() -> String {
    "حدث خطأ مؤقت، حاول مرة أخرى.".into()
}

fn d_state_instruction() -> String {
    "الحالة الحالية: {state}. استخدم الأدوات فقط إذا لزم الأمر.".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_are_education_support_booking() {
        let order: Vec<Intent> = PolicyConfig::default()
            .intent_rules
            .iter()
            .map(|r| r.intent)
            .collect();
        assert_eq!(order, vec![Intent::Education, Intent::Support, Intent::Booking]);
    }

    #[test]
    fn system_prompt_keeps_identity_lines() {
        let prompt = PolicyConfig::default().system_prompt;
        assert!(prompt.contains("فريق منصة عون"));
        assert!(prompt.contains("المطور التقني: المهندس عبدالقادر الشنبور."));
    }

    #[test]
    fn state_instruction_has_placeholder() {
        assert!(PolicyConfig::default().state_instruction.contains("{state}"));
    }

    #[test]
    fn intent_rules_parse_from_toml() {
        let toml_str = r#"
            [[intent_rules]]
            intent = "support"
            keywords = ["anxious", "sad"]

            [[intent_rules]]
            intent = "education"
            keywords = ["what is"]
        "#;
        let cfg: PolicyConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.intent_rules.len(), 2);
        assert_eq!(cfg.intent_rules[0].intent, Intent::Support);
        assert_eq!(cfg.denylist, d_denylist());
    }
}
