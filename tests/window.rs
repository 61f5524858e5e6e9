use chrono::{DateTime, Utc};
use mfa_totp::{
    AlgorithmPolicy, HashAlgorithm, Match, ShadowWindowValidator, SharedSecret, TotpConfig,
    TotpGenerator,
};

const UPN: &str = "alice@contoso.com";
const NOW: i64 = 1_700_000_000;

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

fn secret() -> SharedSecret {
    SharedSecret::from_display_key("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ").unwrap()
}

fn config(shadows: u32) -> TotpConfig {
    TotpConfig::new().digits(8).shadows(shadows)
}

fn pin_at(config: &TotpConfig, secs: i64) -> String {
    let secret = secret();
    config
        .generator()
        .unwrap()
        .compute(secret.as_bytes(), at(secs))
        .unwrap()
        .to_string()
}

fn validate(config: &TotpConfig, pin: &str) -> bool {
    let secret = secret();
    ShadowWindowValidator::from_config(config)
        .unwrap()
        .validate(secret.as_bytes(), UPN, pin, at(NOW))
        .unwrap()
}

#[test]
fn previous_step_needs_a_shadow() {
    let pin = pin_at(&config(0), NOW - 30);
    assert!(!validate(&config(0), &pin));
    assert!(validate(&config(1), &pin));
}

#[test]
fn next_step_needs_a_shadow() {
    let pin = pin_at(&config(0), NOW + 30);
    assert!(!validate(&config(0), &pin));
    assert!(validate(&config(1), &pin));
}

#[test]
fn outside_the_window() {
    for shadows in 0..=3 {
        let config = config(shadows);
        let offset = 30 * (i64::from(shadows) + 1);
        assert!(!validate(&config, &pin_at(&config, NOW - offset)), "{}", shadows);
        assert!(!validate(&config, &pin_at(&config, NOW + offset)), "{}", shadows);
    }
}

#[test]
fn reports_offset() {
    let config = config(2);
    let secret = secret();
    let validator = ShadowWindowValidator::from_config(&config).unwrap();
    let found = |secs| {
        validator
            .find_match(secret.as_bytes(), UPN, &pin_at(&config, secs), at(NOW))
            .unwrap()
    };
    let matched = |offset| {
        Some(Match {
            algorithm: HashAlgorithm::Sha1,
            offset,
        })
    };
    assert_eq!(found(NOW), matched(0));
    assert_eq!(found(NOW - 60), matched(-2));
    assert_eq!(found(NOW + 30), matched(1));
}

#[test]
fn pinned_rejects_other_algorithms() {
    let sha1 = config(1);
    let sha256 = config(1).algorithm(HashAlgorithm::Sha256);
    let pin = pin_at(&sha1, NOW);
    assert!(validate(&sha1, &pin));
    assert!(!validate(&sha256, &pin));
}

#[test]
fn accept_weaker_allows_legacy_codes() {
    let legacy = config(1);
    let current = config(1)
        .algorithm(HashAlgorithm::Sha512)
        .algorithm_policy(AlgorithmPolicy::AcceptWeaker);
    let pin = pin_at(&legacy, NOW - 30);
    assert!(validate(&current, &pin));

    let secret = secret();
    let found = ShadowWindowValidator::from_config(&current)
        .unwrap()
        .find_match(secret.as_bytes(), UPN, &pin, at(NOW))
        .unwrap();
    assert_eq!(
        found,
        Some(Match {
            algorithm: HashAlgorithm::Sha1,
            offset: -1,
        })
    );
}

#[test]
fn accept_weaker_never_accepts_stronger() {
    let weak = config(1).algorithm_policy(AlgorithmPolicy::AcceptWeaker);
    let strong = config(1).algorithm(HashAlgorithm::Sha256);
    assert!(!validate(&weak, &pin_at(&strong, NOW)));
}

#[test]
fn validators_are_shareable() {
    let validator = ShadowWindowValidator::from_config(&config(1)).unwrap();
    let pin = pin_at(&config(1), NOW);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pin = pin.clone();
            std::thread::spawn(move || {
                let secret = secret();
                validator
                    .validate(secret.as_bytes(), UPN, &pin, at(NOW))
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

#[test]
fn four_digit_provider() {
    let config = TotpConfig::new().digits(4);
    let generator = TotpGenerator::new(HashAlgorithm::Sha1, 30, 4).unwrap();
    let secret = secret();
    let pin = generator.compute(secret.as_bytes(), at(NOW)).unwrap().to_string();
    assert_eq!(pin.len(), 4);
    assert!(validate(&config, &pin));
}
