/// Integration tests for crypto-core JWT functionality
///
/// This test module covers:
/// - Tokens without registered claims
/// - Algorithm pinning
/// - Error handling for malformed and tampered tokens
use crypto_core::jwt::{decode_token, encode_token, JwtKeys};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct SessionClaims {
    id: String,
    email: String,
    role: String,
}

fn keys() -> JwtKeys {
    JwtKeys::from_secret(b"integration-secret").expect("keys should build")
}

fn sample() -> SessionClaims {
    SessionClaims {
        id: "0b6f0e8e-6c52-4c8a-9d61-3c4f1f3c2a10".to_string(),
        email: "buyer@example.com".to_string(),
        role: "customer".to_string(),
    }
}

#[test]
fn test_token_carries_no_expiry_claim() {
    let token = encode_token(&sample(), &keys()).unwrap();
    let raw: serde_json::Value = decode_token(&token, &keys()).unwrap();

    let object = raw.as_object().expect("claims should be an object");
    assert!(!object.contains_key("exp"));
    assert!(!object.contains_key("iat"));
    assert_eq!(object.len(), 3);
}

#[test]
fn test_same_claims_same_token() {
    // HS256 is deterministic and no timestamp is embedded
    let first = encode_token(&sample(), &keys()).unwrap();
    let second = encode_token(&sample(), &keys()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_rejects_token_signed_with_other_algorithm() {
    let token = encode(
        &Header::new(jsonwebtoken::Algorithm::HS512),
        &sample(),
        &EncodingKey::from_secret(b"integration-secret"),
    )
    .unwrap();

    let result = decode_token::<SessionClaims>(&token, &keys());
    assert!(result.is_err(), "HS512 token must not pass HS256 validation");
}

#[test]
fn test_rejects_tampered_payload() {
    let token = encode_token(&sample(), &keys()).unwrap();
    let mut parts: Vec<&str> = token.split('.').collect();
    let forged = encode_token(
        &SessionClaims {
            role: "merchant".to_string(),
            ..sample()
        },
        &keys(),
    )
    .unwrap();
    let forged_payload = forged.split('.').nth(1).unwrap().to_string();
    parts[1] = &forged_payload;
    let tampered = parts.join(".");

    assert!(decode_token::<SessionClaims>(&tampered, &keys()).is_err());
}

#[test]
fn test_rejects_garbage() {
    assert!(decode_token::<SessionClaims>("not-a-token", &keys()).is_err());
    assert!(decode_token::<SessionClaims>("", &keys()).is_err());
}

#[test]
fn test_error_message_marks_validation_failure() {
    let err = decode_token::<SessionClaims>("a.b.c", &keys()).unwrap_err();
    assert!(err.to_string().contains("Token validation failed"));
}
