use notesafe_cloud::CloudConfig;

#[test]
fn default_api_base_url() {
    let config = CloudConfig::default();
    assert_eq!(config.api_base_url, "https://api.notesafe.app");
}

#[test]
fn default_request_timeout() {
    let config = CloudConfig::default();
    assert_eq!(config.request_timeout_secs, 30);
}

#[test]
fn base_url_without_trailing_slash_is_unchanged() {
    let config = CloudConfig::default();
    assert_eq!(config.base_url(), "https://api.notesafe.app");
}

#[test]
fn serialization_roundtrip() {
    let config = CloudConfig {
        api_base_url: "https://staging.notesafe.app".into(),
        request_timeout_secs: 10,
    };
    let json = serde_json::to_string(&config).unwrap();
    let deserialized: CloudConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized.api_base_url, config.api_base_url);
    assert_eq!(deserialized.request_timeout_secs, config.request_timeout_secs);
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let config: CloudConfig =
        serde_json::from_str(r#"{"api_base_url":"http://localhost:9000"}"#).unwrap();
    assert_eq!(config.api_base_url, "http://localhost:9000");
    assert_eq!(config.request_timeout_secs, 30);
}
