//! Integration tests for settings loading and validation.

use std::fs;

use unseal::{BulkCipher, CipherMode, KeyAlgorithm, KeyTransport, Settings, UnsealError};

#[test]
fn defaults_match_the_legacy_archive_format() {
    let settings = Settings::default();
    assert_eq!(settings.symmetric_key_bits, 128);
    assert_eq!(settings.key_transport, KeyTransport::Raw);
    assert_eq!(settings.cipher_mode, CipherMode::Ecb);
    assert_eq!(settings.asymmetric_algorithm, KeyAlgorithm::Rsa);
    assert_eq!(settings.symmetric_algorithm, BulkCipher::Aes);
    assert_eq!(settings.chunk_size, 1024);
    assert_eq!(settings.symmetric_key_len().unwrap(), 16);
}

#[test]
fn missing_config_file_yields_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = Settings::load(dir.path()).expect("load should succeed");
    assert_eq!(settings.symmetric_key_bits, 128);
}

#[test]
fn config_file_overrides_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join(".unseal.toml"),
        r#"
symmetric_key_bits = 256
key_transport = "oaep-sha256"
cipher_mode = "cbc"
chunk_size = 4096
"#,
    )
    .expect("write config");

    let settings = Settings::load(dir.path()).expect("load should succeed");
    assert_eq!(settings.symmetric_key_bits, 256);
    assert_eq!(settings.key_transport, KeyTransport::OaepSha256);
    assert_eq!(settings.cipher_mode, CipherMode::Cbc);
    assert_eq!(settings.chunk_size, 4096);
    assert_eq!(settings.symmetric_key_len().unwrap(), 32);
}

#[test]
fn unparsable_config_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join(".unseal.toml"), "key_transport = \"gcm\"").expect("write config");

    let result = Settings::load(dir.path());
    assert!(matches!(result, Err(UnsealError::Config(_))));
}

#[test]
fn invalid_key_size_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join(".unseal.toml"), "symmetric_key_bits = 100").expect("write config");

    let result = Settings::load(dir.path());
    assert!(matches!(result, Err(UnsealError::Config(_))));
}

#[test]
fn invalid_chunk_size_is_rejected() {
    for chunk_size in [0usize, 7, 1000] {
        let settings = Settings {
            chunk_size,
            ..Settings::default()
        };
        assert!(
            matches!(settings.validate(), Err(UnsealError::Config(_))),
            "chunk_size {chunk_size} must be rejected"
        );
    }
}
