use lumen_api::utils::temp_code::{
    DEFAULT_PASSWORD_LENGTH, TEMP_CODE_PREFIX, generate_code, generate_password, is_temp_code,
    is_valid_code_format,
};

#[test]
fn test_generated_code_has_prefix() {
    let code = generate_code();

    assert!(code.starts_with(TEMP_CODE_PREFIX));
    assert!(is_temp_code(&code));
}

#[test]
fn test_generated_code_passes_format_check() {
    for _ in 0..100 {
        let code = generate_code();
        assert!(is_valid_code_format(&code), "generated code rejected: {}", code);
    }
}

#[test]
fn test_format_check_accepts_uppercase_hex() {
    assert!(is_valid_code_format(
        "lumtempcode-550E8400-E29B-41D4-A716-446655440000"
    ));
}

#[test]
fn test_format_check_rejects_missing_prefix() {
    assert!(!is_valid_code_format(
        "550e8400-e29b-41d4-a716-446655440000"
    ));
    assert!(!is_valid_code_format(
        "lumreg-550e8400-e29b-41d4-a716-446655440000"
    ));
}

#[test]
fn test_format_check_rejects_wrong_version_nibble() {
    // Version nibble (position 14 of the uuid) must be 4.
    assert!(!is_valid_code_format(
        "lumtempcode-550e8400-e29b-11d4-a716-446655440000"
    ));
}

#[test]
fn test_format_check_rejects_wrong_variant_nibble() {
    // Variant nibble (position 19) must be 8, 9, a or b.
    assert!(!is_valid_code_format(
        "lumtempcode-550e8400-e29b-41d4-c716-446655440000"
    ));
}

#[test]
fn test_format_check_rejects_bad_shapes() {
    assert!(!is_valid_code_format("lumtempcode-"));
    assert!(!is_valid_code_format("lumtempcode-not-a-uuid"));
    assert!(!is_valid_code_format(
        "lumtempcode-550e8400e29b41d4a716446655440000"
    ));
    assert!(!is_valid_code_format(
        "lumtempcode-550e8400-e29b-41d4-a716-4466554400000"
    ));
    assert!(!is_valid_code_format(
        "lumtempcode-550e8400-e29b-41d4-a716-44665544000g"
    ));
}

#[test]
fn test_is_temp_code_is_a_prefix_test_only() {
    // Plain usernames never look like temp codes.
    assert!(!is_temp_code("ward_1700000000000_abc123"));
    assert!(!is_temp_code("admin"));
    // A malformed code still routes to temp-code handling by prefix.
    assert!(is_temp_code("lumtempcode-garbage"));
}

#[test]
fn test_password_has_requested_length() {
    assert_eq!(generate_password(DEFAULT_PASSWORD_LENGTH).chars().count(), 12);
    assert_eq!(generate_password(24).chars().count(), 24);
}

#[test]
fn test_password_contains_all_character_classes() {
    for _ in 0..100 {
        let password = generate_password(DEFAULT_PASSWORD_LENGTH);

        assert!(password.chars().any(|c| c.is_ascii_uppercase()));
        assert!(password.chars().any(|c| c.is_ascii_lowercase()));
        assert!(password.chars().any(|c| c.is_ascii_digit()));
        assert!(password.chars().any(|c| "!@#$%^&*".contains(c)));
    }
}

#[test]
fn test_password_draws_only_from_charset() {
    let password = generate_password(64);

    assert!(password.chars().all(|c| {
        c.is_ascii_alphanumeric() || "!@#$%^&*".contains(c)
    }));
}

#[test]
fn test_passwords_are_not_repeated() {
    let a = generate_password(DEFAULT_PASSWORD_LENGTH);
    let b = generate_password(DEFAULT_PASSWORD_LENGTH);

    assert_ne!(a, b);
}
