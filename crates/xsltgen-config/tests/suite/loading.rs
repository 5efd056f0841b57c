use std::path::Path;

use xsltgen_config::{ConfigError, LoggingConfig, XsltGenConfig};
use xsltgen_core::TextEncoding;

#[test]
fn loads_full_config_relative_to_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("xsltgen.toml");
    std::fs::write(
        &path,
        r#"
project_root = "proj"
build_dir = "out"
classpath = ["lib/a.jar", "classes"]
source_encoding = "iso-8859-1"
force = true
default_locale = "en_GB"

[filter]
name = "translating"
parameters = { bundle = "i18n/Messages", startToken = "${", endToken = "}" }

[logging]
level = "debug"
json = true
"#,
    )
    .unwrap();

    let config = XsltGenConfig::load(&path).unwrap();
    assert_eq!(config.project_root, tmp.path().join("proj"));
    assert_eq!(config.build_dir(), tmp.path().join("proj").join("out"));
    assert_eq!(config.classpath.len(), 2);
    assert_eq!(config.source_encoding().unwrap(), TextEncoding::Latin1);
    assert!(config.force);
    assert_eq!(config.default_locale().country(), "GB");

    let filter = config.filter.as_ref().unwrap();
    assert_eq!(filter.name, "translating");
    assert_eq!(filter.parameters["startToken"], "${");
    assert_eq!(filter.parameters["bundle"], "i18n/Messages");

    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json);
    assert!(config.logging.stderr);
}

#[test]
fn minimal_config_uses_defaults() {
    let config = XsltGenConfig::from_toml_str("project_root = \"/abs/proj\"\n", Path::new("/ignored")).unwrap();
    assert_eq!(config.project_root, Path::new("/abs/proj"));
    assert_eq!(config.build_dir(), Path::new("/abs/proj/target"));
    assert!(config.classpath.is_empty());
    assert!(!config.force);
    assert!(config.filter.is_none());
    assert_eq!(config.logging, LoggingConfig::default());
}

#[test]
fn unknown_keys_are_rejected() {
    let err = XsltGenConfig::from_toml_str(
        "project_root = \"/p\"\nclass_path = []\n",
        Path::new("/"),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "{err}");
}

#[test]
fn unsupported_encoding_is_a_config_error() {
    let err = XsltGenConfig::from_toml_str(
        "project_root = \"/p\"\nsource_encoding = \"EBCDIC\"\n",
        Path::new("/"),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Encoding(_)), "{err}");
}

#[test]
fn missing_file_reports_its_path() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("absent.toml");
    let err = XsltGenConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("absent.toml"), "{err}");
}
