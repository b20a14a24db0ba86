//! End-to-end checks of issued tokens against an independent decryptor.

mod support;

use std::collections::HashSet;
use std::num::NonZeroU32;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::protocol::ApiType;
use common::IssuerError;
use issuer::{TokenIssuer, TokenOptions};

use support::{client_config, decrypt_token, is_url_safe, open_token, token_bytes, KEY_128};

#[test]
fn worked_example_produces_decryptable_token() {
    let issuer = TokenIssuer::new(&client_config(KEY_128, "seed")).unwrap();
    let options = TokenOptions::new("k1")
        .with_max_calls(10)
        .with_expire_seconds(NonZeroU32::new(60).unwrap())
        .with_provider("p");

    let claims = issuer.build_claims(&options);
    let token = issuer.encrypt(&claims).unwrap();

    assert!(is_url_safe(&token));
    let raw = token_bytes(&token);
    assert!(raw.len() >= 32);
    assert_eq!((raw.len() - 16) % 16, 0);

    assert_eq!(open_token(&token, KEY_128), claims);
}

#[test]
fn decrypted_bytes_are_the_canonical_encoding() {
    let issuer = TokenIssuer::new(&client_config(KEY_128, "seed")).unwrap();
    let options = TokenOptions::new("sk-abc").with_ext_info(r#"{"rep_m":"qwen-max"}"#);
    let claims = issuer.build_claims(&options);
    let token = issuer.encrypt(&claims).unwrap();

    let plaintext = decrypt_token(&token, KEY_128);
    assert_eq!(plaintext, claims.to_canonical_bytes().unwrap());

    let text = String::from_utf8(plaintext).unwrap();
    let order = [
        "\"id\"",
        "\"api_key\"",
        "\"max_calls\"",
        "\"expire_time\"",
        "\"created_at\"",
        "\"provider\"",
        "\"ext_info\"",
    ];
    let positions: Vec<usize> = order.iter().map(|k| text.find(k).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "field order changed: {text}");
}

#[test]
fn token_matches_remapped_standard_base64() {
    let issuer = TokenIssuer::new(&client_config(KEY_128, "seed")).unwrap();
    let token = issuer.issue(&TokenOptions::new("k1")).unwrap();

    let standard = STANDARD.encode(token_bytes(&token));
    let remapped: String = standard
        .chars()
        .filter(|&c| c != '=')
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    assert_eq!(remapped, token);
}

#[test]
fn every_key_size_round_trips() {
    for bytes in [16usize, 24, 32] {
        let key_hex = "5a".repeat(bytes);
        let cfg = client_config(&key_hex, "a-long-iv-seed-over-16-bytes");
        let issuer = TokenIssuer::new(&cfg).unwrap();
        let options = TokenOptions::new("sk-upstream").with_provider("openai");
        let claims = issuer.build_claims(&options);
        let token = issuer.encrypt(&claims).unwrap();
        assert_eq!(open_token(&token, &key_hex), claims);
    }
}

#[test]
fn wrong_key_does_not_recover_claims() {
    let issuer = TokenIssuer::new(&client_config(KEY_128, "seed")).unwrap();
    let token = issuer.issue(&TokenOptions::new("k1")).unwrap();
    let other_key = "ff".repeat(16);

    let raw = token_bytes(&token);
    let (iv, ciphertext) = raw.split_at(16);
    use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, KeyIvInit};
    let key = hex::decode(other_key).unwrap();
    let result = cbc::Decryptor::<aes::Aes128>::new_from_slices(&key, iv)
        .unwrap()
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext);
    match result {
        Err(_) => {}
        Ok(plaintext) => {
            assert!(serde_json::from_slice::<common::protocol::TokenClaims>(&plaintext).is_err())
        }
    }
}

#[test]
fn issuing_from_many_threads_yields_distinct_valid_tokens() {
    let issuer = TokenIssuer::new(&client_config(KEY_128, "seed")).unwrap();
    let options = TokenOptions::new("shared-key");

    let tokens: Vec<String> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|| {
                    (0..16)
                        .map(|_| issuer.issue(&options).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
    });

    let unique: HashSet<&String> = tokens.iter().collect();
    assert_eq!(unique.len(), tokens.len());
    for token in &tokens {
        assert_eq!(open_token(token, KEY_128).api_key, "shared-key");
    }
}

#[test]
fn api_url_carries_a_valid_token() {
    let issuer = TokenIssuer::new(&client_config(KEY_128, "seed")).unwrap();
    let url = issuer
        .api_url(&TokenOptions::new("k1"), ApiType::Embeddings)
        .unwrap();
    let (base, token) = url.split_once("?token=").unwrap();
    assert_eq!(base, "http://localhost:8840/relayapi/embeddings");
    assert_eq!(open_token(token, KEY_128).api_key, "k1");
}

#[test]
fn construction_fails_before_fingerprinting() {
    let mut cfg = client_config(KEY_128, "seed");
    cfg.crypto.as_mut().unwrap().method = "rsa".into();
    assert!(matches!(
        TokenIssuer::new(&cfg),
        Err(IssuerError::Configuration(_))
    ));

    let mut cfg = client_config(KEY_128, "seed");
    cfg.crypto = None;
    assert!(matches!(
        TokenIssuer::new(&cfg),
        Err(IssuerError::Configuration(_))
    ));
}
