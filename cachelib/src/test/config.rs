use std::error::Error;
use std::io::Write;
use crate::config::{load_config, parse_json, parse_text, CacheConfig, ReplacementPolicyConfig, WritePolicyConfig};
use crate::error::ConfigError;

const TEXT_CONFIG: &str = "\
# L1 data cache
blockSize = 64
cacheSize = 0x400
assoc = 2

replacementPolicy = LRU
writePolicy = WRITE_BACK
";

#[test]
fn parses_the_text_format() -> Result<(), Box<dyn Error>> {
    let config = parse_text(TEXT_CONFIG)?.validate()?;
    assert_eq!(config.block_size(), 64);
    assert_eq!(config.cache_size(), 1024);
    assert_eq!(config.associativity(), 2);
    assert_eq!(config.num_sets(), 8);
    assert_eq!(config.num_lines(), 16);
    assert_eq!(config.replacement_policy(), ReplacementPolicyConfig::Lru);
    assert_eq!(config.write_policy(), WritePolicyConfig::WriteBack);
    Ok(())
}

#[test]
fn parses_the_json_format() -> Result<(), Box<dyn Error>> {
    let json = r#"{"blockSize": 32, "cacheSize": 4096, "assoc": 4, "replacementPolicy": "FIFO", "writePolicy": "WRITE_THROUGH"}"#;
    let config = parse_json(json)?.validate()?;
    assert_eq!(config.num_sets(), 32);
    assert_eq!(config.replacement_policy(), ReplacementPolicyConfig::Fifo);
    assert_eq!(config.write_policy(), WritePolicyConfig::WriteThrough);
    Ok(())
}

#[test]
fn later_text_values_override_earlier_ones() -> Result<(), Box<dyn Error>> {
    let config = parse_text(&format!("{TEXT_CONFIG}assoc = 4\n"))?.validate()?;
    assert_eq!(config.associativity(), 4);
    assert_eq!(config.num_sets(), 4);
    Ok(())
}

#[test]
fn rejects_unknown_keys() {
    let text = format!("{TEXT_CONFIG}prefetch = 1\n");
    assert!(matches!(parse_text(&text), Err(ConfigError::UnknownKey(key)) if key == "prefetch"));

    let json = r#"{"blockSize": 32, "cacheSize": 4096, "assoc": 4, "replacementPolicy": "FIFO", "writePolicy": "WRITE_BACK", "levels": 2}"#;
    let result = parse_json(json).and_then(|raw| raw.validate());
    assert!(matches!(result, Err(ConfigError::UnknownKey(key)) if key == "levels"));
}

#[test]
fn rejects_missing_keys() {
    let text = TEXT_CONFIG.replace("writePolicy = WRITE_BACK", "");
    let result = parse_text(&text).and_then(|raw| raw.validate());
    assert!(matches!(result, Err(ConfigError::MissingKey("writePolicy"))));

    let result = parse_json(r#"{"cacheSize": 4096}"#).and_then(|raw| raw.validate());
    assert!(matches!(result, Err(ConfigError::MissingKey("blockSize"))));
}

#[test]
fn rejects_bad_values() {
    let text = TEXT_CONFIG.replace("LRU", "MRU");
    assert!(matches!(parse_text(&text), Err(ConfigError::InvalidValue { key, .. }) if key == "replacementPolicy"));

    let text = TEXT_CONFIG.replace("= 64", "= sixty-four");
    assert!(matches!(parse_text(&text), Err(ConfigError::InvalidValue { key, .. }) if key == "blockSize"));

    let text = TEXT_CONFIG.replace("assoc = 2", "assoc 2");
    assert!(matches!(parse_text(&text), Err(ConfigError::MalformedLine { line: 4, .. })));

    let json = r#"{"blockSize": 32, "cacheSize": 4096, "assoc": 4, "replacementPolicy": "MRU", "writePolicy": "WRITE_BACK"}"#;
    assert!(matches!(parse_json(json), Err(ConfigError::Json(_))));
}

#[test]
fn policy_names_accept_lower_case() -> Result<(), Box<dyn Error>> {
    assert_eq!("lfu".parse::<ReplacementPolicyConfig>()?, ReplacementPolicyConfig::Lfu);
    assert_eq!("write_through".parse::<WritePolicyConfig>()?, WritePolicyConfig::WriteThrough);
    assert_eq!(ReplacementPolicyConfig::Random.to_string(), "RANDOM");
    assert_eq!(WritePolicyConfig::WriteBack.to_string(), "WRITE_BACK");

    // Both formats judge a name the same way
    let text = parse_text("blockSize = 64\ncacheSize = 1024\nassoc = 2\nreplacementPolicy = Lru\nwritePolicy = Write_Back\n")?;
    let json = parse_json(r#"{"blockSize": 64, "cacheSize": 1024, "assoc": 2, "replacementPolicy": "Lru", "writePolicy": "Write_Back"}"#)?;
    let (text, json) = (text.validate()?, json.validate()?);
    assert_eq!(text, json);
    assert_eq!(json.replacement_policy(), ReplacementPolicyConfig::Lru);
    assert_eq!(json.write_policy(), WritePolicyConfig::WriteBack);

    let json = parse_json(r#"{"replacementPolicy": "fifo", "writePolicy": "WRITE_THROUGH"}"#)?;
    assert_eq!(json.replacement_policy, Some(ReplacementPolicyConfig::Fifo));
    assert_eq!(json.write_policy, Some(WritePolicyConfig::WriteThrough));
    Ok(())
}

#[test]
fn ignores_words_after_a_value() -> Result<(), Box<dyn Error>> {
    let text = TEXT_CONFIG
        .replace("blockSize = 64", "blockSize = 64 bytes")
        .replace("assoc = 2", "assoc = 2 way");
    let config = parse_text(&text)?.validate()?;
    assert_eq!(config.block_size(), 64);
    assert_eq!(config.associativity(), 2);
    Ok(())
}

#[test]
fn validates_geometry() {
    let new = |block, cache, assoc| {
        CacheConfig::new(block, cache, assoc, ReplacementPolicyConfig::Lru, WritePolicyConfig::WriteBack)
    };
    assert!(matches!(new(48, 1024, 2), Err(ConfigError::BlockSize(48))));
    assert!(matches!(new(0, 1024, 2), Err(ConfigError::BlockSize(0))));
    assert!(matches!(new(64, 1000, 2), Err(ConfigError::CacheSize(1000))));
    assert!(matches!(new(64, 0, 2), Err(ConfigError::CacheSize(0))));
    assert!(matches!(new(64, 1024, 0), Err(ConfigError::ZeroAssociativity)));
    assert!(matches!(new(64, 1024, 3), Err(ConfigError::Geometry { cache_size: 1024, set_bytes: 192 })));
    assert!(matches!(new(64, 64, 2), Err(ConfigError::Geometry { .. })));
    assert!(new(64, 1024, 16).is_ok_and(|config| config.num_sets() == 1));
    assert!(new(1, 1, 1).is_ok_and(|config| config.num_sets() == 1));
}

#[test]
fn loads_by_extension() -> Result<(), Box<dyn Error>> {
    let mut text = tempfile::Builder::new().suffix(".cfg").tempfile()?;
    text.write_all(TEXT_CONFIG.as_bytes())?;
    assert_eq!(load_config(text.path())?.num_sets(), 8);

    let mut json = tempfile::Builder::new().suffix(".json").tempfile()?;
    json.write_all(br#"{"blockSize": 64, "cacheSize": 1024, "assoc": 2, "replacementPolicy": "LRU", "writePolicy": "WRITE_BACK"}"#)?;
    assert_eq!(load_config(json.path())?, load_config(text.path())?);

    assert!(matches!(load_config("/nonexistent/config"), Err(ConfigError::Io(_))));
    Ok(())
}
