use passcore_keys::KeyManagerConfig;

#[test]
fn item_keys_cached_by_default() {
    assert!(KeyManagerConfig::default().cache_item_keys);
}

#[test]
fn serialization_roundtrip() {
    let config = KeyManagerConfig {
        cache_item_keys: false,
    };
    let json = serde_json::to_string(&config).unwrap();
    let parsed: KeyManagerConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn missing_fields_use_defaults() {
    let parsed: KeyManagerConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(parsed, KeyManagerConfig::default());
}
