//! Key-exchange orchestration.
//!
//! Drives the per-conversation state machine
//! `NoKey -> LocalKeyGenerated -> SecretDerived` over an injected
//! [`SessionKeyStore`] and a pluggable [`MessageCipher`]. The external
//! transport (out of scope here) carries public values between peers; this
//! component only ever sees them as untrusted hex strings.

use parley_crypto::{KeyPair, MessageCipher, SharedSecret, derive_shared_secret, group};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::keystore::SessionKeyStore;

/// Key-exchange progress for one conversation.
///
/// Derived from the stored session record; `SecretDerived` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    /// No local key material exists yet.
    NoKey,
    /// A local keypair is stored; waiting for the peer's public value.
    LocalKeyGenerated,
    /// The shared secret is derived; messages can be encrypted/decrypted.
    SecretDerived,
}

/// Coordinates key generation, secret derivation, and the cipher boundary
/// for every conversation of the local user.
pub struct ExchangeOrchestrator<C: MessageCipher> {
    store: SessionKeyStore,
    cipher: C,
}

impl<C: MessageCipher> std::fmt::Debug for ExchangeOrchestrator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeOrchestrator")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl<C: MessageCipher> ExchangeOrchestrator<C> {
    /// Create an orchestrator over an opened store and a cipher.
    pub const fn new(store: SessionKeyStore, cipher: C) -> Self {
        Self { store, cipher }
    }

    /// Current exchange state for a conversation.
    pub fn state(&self, conversation_id: u64) -> ExchangeState {
        match self.store.get(conversation_id) {
            None => ExchangeState::NoKey,
            Some(record) if record.shared_secret.is_some() => ExchangeState::SecretDerived,
            Some(_) => ExchangeState::LocalKeyGenerated,
        }
    }

    /// Start the exchange for a conversation (create/join time).
    ///
    /// Generates a keypair and durably records the private half, then
    /// returns the public value hex for the transport. The store write
    /// completes before the public value is ever exposed, so a restart
    /// cannot lose the private key while the peer believes the exchange is
    /// underway. If a session already exists (client reloaded mid-exchange),
    /// the stored key's public value is returned unchanged.
    pub fn begin_exchange(&mut self, conversation_id: u64) -> Result<String> {
        if let Some(record) = self.store.get(conversation_id) {
            let key_pair = KeyPair::from_private_key(record.private_key.clone());
            info!(conversation_id, "Resuming exchange with stored key");
            return Ok(key_pair.public_hex());
        }

        let key_pair = KeyPair::generate()?;
        self.store.create_session(conversation_id, &key_pair)?;
        info!(conversation_id, "Local keypair generated and stored");
        Ok(key_pair.public_hex())
    }

    /// Complete the exchange once the peer's public value is retrievable.
    ///
    /// Parses and validates the untrusted hex, derives the shared secret,
    /// and persists it. Idempotent when called again with the same peer
    /// value; a conflicting value surfaces as `SecretMismatch`. Terminal:
    /// a conversation never leaves `SecretDerived`.
    pub fn complete_exchange(&mut self, conversation_id: u64, peer_public_hex: &str) -> Result<()> {
        let record = self
            .store
            .get(conversation_id)
            .ok_or(Error::UnknownSession { conversation_id })?;

        let peer_public = group::parse_hex(peer_public_hex).inspect_err(|_| {
            warn!(conversation_id, "Rejected malformed peer public value");
        })?;
        let secret = derive_shared_secret(&record.private_key, &peer_public).inspect_err(|_| {
            warn!(conversation_id, "Rejected out-of-range peer public value");
        })?;

        self.store.record_shared_secret(conversation_id, secret)?;
        info!(conversation_id, "Shared secret derived and stored");
        Ok(())
    }

    /// Encrypt a message payload for a conversation.
    ///
    /// Only valid in `SecretDerived`; earlier states refuse rather than
    /// misencrypt.
    pub fn encrypt_message(
        &self,
        conversation_id: u64,
        plaintext: &[u8],
        nonce: &[u8],
    ) -> Result<Vec<u8>> {
        let secret = self.ready_secret(conversation_id)?;
        Ok(self.cipher.encrypt(plaintext, secret, nonce)?)
    }

    /// Decrypt a message payload for a conversation.
    ///
    /// `DecryptionFailed` is per-message and recoverable: report the message
    /// as undecryptable without tearing down the conversation.
    pub fn decrypt_message(
        &self,
        conversation_id: u64,
        ciphertext: &[u8],
        nonce: &[u8],
    ) -> Result<Vec<u8>> {
        let secret = self.ready_secret(conversation_id)?;
        Ok(self.cipher.decrypt(ciphertext, secret, nonce)?)
    }

    /// Explicit teardown of every session (logout).
    pub fn end_all_sessions(&mut self) -> Result<()> {
        let count = self.store.len();
        self.store.clear()?;
        info!(count, "All session records cleared");
        Ok(())
    }

    /// The underlying session key store.
    pub const fn store(&self) -> &SessionKeyStore {
        &self.store
    }

    fn ready_secret(&self, conversation_id: u64) -> Result<&SharedSecret> {
        let record = self
            .store
            .get(conversation_id)
            .ok_or(Error::SessionNotReady { conversation_id })?;
        record
            .shared_secret
            .as_ref()
            .ok_or(Error::SecretNotReady { conversation_id })
    }
}
