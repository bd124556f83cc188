//! End-to-end key-exchange flow between two participants.

#![allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]

use parley_core::{ExchangeOrchestrator, ExchangeState, SessionKeyStore};
use parley_crypto::{AeadCipher, random_nonce};

const CONVERSATION: u64 = 42;

fn orchestrator_at(path: &std::path::Path) -> ExchangeOrchestrator<AeadCipher> {
    parley_core::tracing_init::init_tracing("parley_core=info", false);
    ExchangeOrchestrator::new(SessionKeyStore::open(path).unwrap(), AeadCipher)
}

#[test]
fn alice_and_bob_derive_identical_secrets() {
    let dir = tempfile::tempdir().unwrap();
    let mut alice = orchestrator_at(&dir.path().join("alice.json"));
    let mut bob = orchestrator_at(&dir.path().join("bob.json"));

    // Alice creates conversation 42, Bob joins; each exposes a public value
    let alice_public = alice.begin_exchange(CONVERSATION).unwrap();
    let bob_public = bob.begin_exchange(CONVERSATION).unwrap();

    // The relay delivers the peer's public value to each side
    alice.complete_exchange(CONVERSATION, &bob_public).unwrap();
    bob.complete_exchange(CONVERSATION, &alice_public).unwrap();

    assert_eq!(alice.state(CONVERSATION), ExchangeState::SecretDerived);
    assert_eq!(bob.state(CONVERSATION), ExchangeState::SecretDerived);

    let alice_secret = alice
        .store()
        .get(CONVERSATION)
        .unwrap()
        .shared_secret
        .clone()
        .unwrap();
    let bob_secret = bob
        .store()
        .get(CONVERSATION)
        .unwrap()
        .shared_secret
        .clone()
        .unwrap();
    assert_eq!(alice_secret.as_bytes(), bob_secret.as_bytes());
}

#[test]
fn messages_flow_both_directions() {
    let dir = tempfile::tempdir().unwrap();
    let mut alice = orchestrator_at(&dir.path().join("alice.json"));
    let mut bob = orchestrator_at(&dir.path().join("bob.json"));

    let alice_public = alice.begin_exchange(CONVERSATION).unwrap();
    let bob_public = bob.begin_exchange(CONVERSATION).unwrap();
    alice.complete_exchange(CONVERSATION, &bob_public).unwrap();
    bob.complete_exchange(CONVERSATION, &alice_public).unwrap();

    let nonce = random_nonce().unwrap();
    let ciphertext = alice
        .encrypt_message(CONVERSATION, b"hi bob", &nonce)
        .unwrap();
    assert_eq!(
        bob.decrypt_message(CONVERSATION, &ciphertext, &nonce)
            .unwrap(),
        b"hi bob"
    );

    let nonce = random_nonce().unwrap();
    let reply = bob
        .encrypt_message(CONVERSATION, b"hi alice", &nonce)
        .unwrap();
    assert_eq!(
        alice
            .decrypt_message(CONVERSATION, &reply, &nonce)
            .unwrap(),
        b"hi alice"
    );
}

#[test]
fn decryption_failure_is_per_message() {
    let dir = tempfile::tempdir().unwrap();
    let mut alice = orchestrator_at(&dir.path().join("alice.json"));
    let mut bob = orchestrator_at(&dir.path().join("bob.json"));

    let alice_public = alice.begin_exchange(CONVERSATION).unwrap();
    let bob_public = bob.begin_exchange(CONVERSATION).unwrap();
    alice.complete_exchange(CONVERSATION, &bob_public).unwrap();
    bob.complete_exchange(CONVERSATION, &alice_public).unwrap();

    let nonce = random_nonce().unwrap();
    let mut ciphertext = alice
        .encrypt_message(CONVERSATION, b"tampered in transit", &nonce)
        .unwrap();
    ciphertext[0] ^= 0xFF;
    assert!(
        bob.decrypt_message(CONVERSATION, &ciphertext, &nonce)
            .is_err()
    );

    // The conversation keeps working for the next message
    let nonce = random_nonce().unwrap();
    let ciphertext = alice
        .encrypt_message(CONVERSATION, b"still here", &nonce)
        .unwrap();
    assert_eq!(
        bob.decrypt_message(CONVERSATION, &ciphertext, &nonce)
            .unwrap(),
        b"still here"
    );
}

#[test]
fn exchange_survives_restart_before_peer_reply() {
    let dir = tempfile::tempdir().unwrap();
    let alice_path = dir.path().join("alice.json");
    let mut bob = orchestrator_at(&dir.path().join("bob.json"));
    let bob_public = bob.begin_exchange(CONVERSATION).unwrap();

    // Alice begins the exchange, then her client restarts before Bob's
    // public value arrives
    let alice_public = {
        let mut alice = orchestrator_at(&alice_path);
        alice.begin_exchange(CONVERSATION).unwrap()
    };

    let mut alice = orchestrator_at(&alice_path);
    assert_eq!(alice.state(CONVERSATION), ExchangeState::LocalKeyGenerated);

    // Resuming exposes the same public value Bob already received
    assert_eq!(alice.begin_exchange(CONVERSATION).unwrap(), alice_public);

    alice.complete_exchange(CONVERSATION, &bob_public).unwrap();
    bob.complete_exchange(CONVERSATION, &alice_public).unwrap();

    let nonce = random_nonce().unwrap();
    let ciphertext = alice
        .encrypt_message(CONVERSATION, b"after restart", &nonce)
        .unwrap();
    assert_eq!(
        bob.decrypt_message(CONVERSATION, &ciphertext, &nonce)
            .unwrap(),
        b"after restart"
    );
}

#[test]
fn derived_secret_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let alice_path = dir.path().join("alice.json");
    let mut bob = orchestrator_at(&dir.path().join("bob.json"));
    let bob_public = bob.begin_exchange(CONVERSATION).unwrap();

    {
        let mut alice = orchestrator_at(&alice_path);
        alice.begin_exchange(CONVERSATION).unwrap();
        alice.complete_exchange(CONVERSATION, &bob_public).unwrap();
    }

    let alice = orchestrator_at(&alice_path);
    assert_eq!(alice.state(CONVERSATION), ExchangeState::SecretDerived);

    let nonce = random_nonce().unwrap();
    assert!(
        alice
            .encrypt_message(CONVERSATION, b"ready immediately", &nonce)
            .is_ok()
    );
}

#[test]
fn logout_clears_both_pending_and_derived_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let mut alice = orchestrator_at(&dir.path().join("alice.json"));
    let mut bob = orchestrator_at(&dir.path().join("bob.json"));

    alice.begin_exchange(1).unwrap();
    let bob_public = bob.begin_exchange(1).unwrap();
    alice.complete_exchange(1, &bob_public).unwrap();
    alice.begin_exchange(2).unwrap();

    alice.end_all_sessions().unwrap();
    assert_eq!(alice.state(1), ExchangeState::NoKey);
    assert_eq!(alice.state(2), ExchangeState::NoKey);
}
