use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};
use sporlexport::utils::*;

fn is_url_safe(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // 64 random bytes, unpadded base64url
    assert_eq!(verifier.len(), 86);
    assert!(is_url_safe(&verifier));
    assert_eq!(URL_SAFE_NO_PAD.decode(&verifier).unwrap().len(), VERIFIER_BYTES);

    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge_matches_rfc7636_vector() {
    let challenge = generate_code_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk");
    assert_eq!(challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    assert_eq!(challenge, generate_code_challenge(verifier));
    assert_ne!(challenge, generate_code_challenge("different_verifier"));
    assert_eq!(challenge.len(), 43);
    assert!(is_url_safe(&challenge));
}

#[test]
fn test_pkce_pair_is_consistent() {
    for _ in 0..50 {
        let pair = generate_pkce_pair();
        let expected = URL_SAFE_NO_PAD.encode(Sha256::digest(pair.verifier.as_bytes()));

        assert_eq!(pair.challenge, expected);
        assert!(is_url_safe(&pair.verifier));
        assert!(is_url_safe(&pair.challenge));
        assert!(!pair.verifier.contains('='));
        assert!(!pair.challenge.contains('='));
    }
}

#[test]
fn test_pkce_pair_debug_hides_verifier() {
    let pair = generate_pkce_pair();
    let debug = format!("{:?}", pair);

    assert!(!debug.contains(&pair.verifier));
    assert!(debug.contains(&pair.challenge));
}

#[test]
fn test_sanitize_name_collapses_runs() {
    assert_eq!(sanitize_name("Road Trip!!"), "Road_Trip_");
    assert_eq!(sanitize_name("chill-out_2024"), "chill-out_2024");
    assert_eq!(sanitize_name("a / b \\ c"), "a_b_c");
    assert_eq!(sanitize_name("Ärger über"), "_rger_ber");
    assert_eq!(sanitize_name(""), "");
}

#[test]
fn test_sanitize_name_truncates() {
    let long = "x".repeat(200);
    assert_eq!(sanitize_name(&long).len(), MAX_NAME_LEN);

    let emoji = "🎵".repeat(100);
    assert_eq!(sanitize_name(&emoji), "_");
}

#[tokio::test]
async fn test_write_file_creates_parents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/deeper/file.json");

    write_file(&path, b"{}").await.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
}
