//! Regression coverage for token issuance and verification.

use std::time::Duration;

use chrono::TimeZone;
use rstest::{fixture, rstest};

use super::*;
use crate::test_support::MutableClock;

#[fixture]
fn clock() -> Arc<MutableClock> {
    let start = Utc
        .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    Arc::new(MutableClock::new(start))
}

#[fixture]
fn identity() -> Identity {
    Identity {
        id: UserId::new(42).expect("id"),
        username: Username::new("dora").expect("name"),
        is_admin: true,
    }
}

fn authority_with(clock: Arc<MutableClock>, secret: &[u8]) -> SessionAuthority {
    SessionAuthority::new(SigningSecret::new(secret.to_vec()).expect("secret"), clock)
}

fn tamper_payload(token: &str) -> String {
    let mut segments: Vec<&str> = token.split('.').collect();
    let forged = URL_SAFE_NO_PAD.encode(
        br#"{"id":1,"username":"mallory","isAdmin":true,"iat":0,"exp":99999999999}"#,
    );
    if let Some(payload) = segments.get_mut(1) {
        *payload = forged.as_str();
    }
    segments.join(".")
}

#[rstest]
fn issued_token_round_trips(clock: Arc<MutableClock>, identity: Identity) {
    let authority = authority_with(clock, &[1_u8; 32]);
    let issued = authority.issue(&identity).expect("issue");
    assert_eq!(authority.verify(issued.as_str()), Ok(identity));
}

#[rstest]
fn token_expires_after_ttl(clock: Arc<MutableClock>, identity: Identity) {
    let authority = authority_with(clock.clone(), &[1_u8; 32]);
    let issued = authority.issue(&identity).expect("issue");

    clock.advance(Duration::from_secs(23 * 3600 + 3599));
    assert!(authority.verify(issued.as_str()).is_ok());

    clock.advance(Duration::from_secs(1));
    assert_eq!(authority.verify(issued.as_str()), Err(TokenError::Expired));
}

#[rstest]
fn expiry_matches_fixed_window(clock: Arc<MutableClock>, identity: Identity) {
    let authority = authority_with(clock.clone(), &[1_u8; 32]);
    let issued = authority.issue(&identity).expect("issue");
    assert_eq!(
        issued.expires_at() - clock.utc(),
        TimeDelta::hours(SESSION_TTL_HOURS)
    );
}

#[rstest]
fn tampered_payload_is_rejected(clock: Arc<MutableClock>, identity: Identity) {
    let authority = authority_with(clock, &[1_u8; 32]);
    let issued = authority.issue(&identity).expect("issue");
    let forged = tamper_payload(issued.as_str());
    assert_eq!(authority.verify(&forged), Err(TokenError::BadSignature));
}

#[rstest]
fn token_from_other_secret_is_rejected(clock: Arc<MutableClock>, identity: Identity) {
    let issuer = authority_with(clock.clone(), &[1_u8; 32]);
    let verifier = authority_with(clock, &[2_u8; 32]);
    let issued = issuer.issue(&identity).expect("issue");
    assert_eq!(verifier.verify(issued.as_str()), Err(TokenError::BadSignature));
}

#[rstest]
#[case("")]
#[case("not-a-token")]
#[case("a.b")]
#[case("a.b.c.d")]
#[case("!!!.???.***")]
fn malformed_tokens_are_rejected(clock: Arc<MutableClock>, #[case] token: &str) {
    let authority = authority_with(clock, &[1_u8; 32]);
    assert_eq!(authority.verify(token), Err(TokenError::Malformed));
}

#[rstest]
fn unsigned_algorithm_is_rejected(clock: Arc<MutableClock>, identity: Identity) {
    let authority = authority_with(clock, &[1_u8; 32]);
    let issued = authority.issue(&identity).expect("issue");
    let none_header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let mut segments: Vec<&str> = issued.as_str().split('.').collect();
    if let Some(header) = segments.get_mut(0) {
        *header = none_header.as_str();
    }
    assert_eq!(
        authority.verify(&segments.join(".")),
        Err(TokenError::Malformed)
    );
}

#[rstest]
fn empty_secret_is_rejected() {
    assert!(matches!(
        SigningSecret::new(Vec::new()),
        Err(SigningSecretError::Empty)
    ));
}

#[rstest]
fn secret_debug_hides_key_material() {
    let secret = SigningSecret::new(b"super-secret-value".to_vec()).expect("secret");
    let rendered = format!("{secret:?}");
    assert!(!rendered.contains("super-secret-value"));
    assert_eq!(secret.fingerprint().len(), 16);
}
