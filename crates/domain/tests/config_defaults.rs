use aun_domain::config::{Config, ConfigSeverity, EvictionPolicy};

#[test]
fn default_window_and_registry_bounds() {
    let config = Config::default();
    assert_eq!(config.sessions.window_size, 12);
    assert_eq!(config.sessions.max_sessions, 500);
    assert_eq!(config.sessions.eviction, EvictionPolicy::ClearAll);
}

#[test]
fn default_provider_is_openrouter_deepseek() {
    let config = Config::default();
    assert_eq!(config.llm.provider.base_url, "https://openrouter.ai/api/v1");
    assert_eq!(config.llm.provider.default_model, "deepseek/deepseek-chat");
    assert_eq!(config.llm.provider.auth.env.as_deref(), Some("OPENROUTER_API_KEY"));
    assert!((config.llm.temperature - 0.3).abs() < f32::EPSILON);
}

#[test]
fn default_config_validates_clean() {
    assert!(Config::default().validate().is_empty());
}

#[test]
fn partial_toml_keeps_other_defaults() {
    let toml_str = r#"
[sessions]
window_size = 4
eviction = "least_recent"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.sessions.window_size, 4);
    assert_eq!(config.sessions.eviction, EvictionPolicy::LeastRecent);
    assert_eq!(config.sessions.max_sessions, 500);
    assert_eq!(config.agent.max_tool_loops, 8);
}

#[test]
fn zero_window_is_an_error() {
    let toml_str = r#"
[sessions]
window_size = 0
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    let issues = config.validate();
    assert!(issues
        .iter()
        .any(|e| e.field == "sessions.window_size" && e.severity == ConfigSeverity::Error));
}

#[test]
fn instruction_without_placeholder_is_an_error() {
    let toml_str = r#"
[policy]
state_instruction = "use tools sparingly"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert!(config
        .validate()
        .iter()
        .any(|e| e.field == "policy.state_instruction"));
}

#[test]
fn unknown_tool_is_a_warning() {
    let toml_str = r#"
[agent]
enabled_tools = ["breathing_exercise", "teleport"]
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    let issues = config.validate();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].severity, ConfigSeverity::Warning);
    assert!(issues[0].message.contains("teleport"));
}
