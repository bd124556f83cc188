//! Durable per-conversation session key store.
//!
//! Persists each conversation's private key and, once derived, the shared
//! secret, so an in-progress exchange survives a client restart. Every
//! mutation is written through to disk before returning; in particular a
//! private key is durable before the matching public value is ever
//! transmitted.
//!
//! On-disk format is a JSON map from conversation id to
//! `{ "privateKey": "<hex>", "sharedSecret": "<hex>" | absent }`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use num_bigint::BigUint;
use parley_crypto::{KeyPair, SharedSecret};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Key-exchange state for one (local user, conversation) pair.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Back-reference to the externally-owned conversation.
    pub conversation_id: u64,
    /// Our private DH scalar, hex-encoded on disk.
    #[serde(with = "hex_scalar")]
    pub private_key: BigUint,
    /// The derived shared secret, absent until the peer's public value
    /// arrives. Written exactly once per conversation.
    #[serde(
        with = "hex_secret",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub shared_secret: Option<SharedSecret>,
}

impl std::fmt::Debug for SessionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRecord")
            .field("conversation_id", &self.conversation_id)
            .field("private_key", &"[REDACTED]")
            .field("shared_secret", &self.shared_secret)
            .finish()
    }
}

/// Durable store of session records, keyed by conversation id.
pub struct SessionKeyStore {
    path: PathBuf,
    sessions: BTreeMap<u64, SessionRecord>,
}

impl std::fmt::Debug for SessionKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeyStore")
            .field("path", &self.path)
            .field("sessions", &self.sessions.len())
            .finish()
    }
}

impl SessionKeyStore {
    /// Open the store at `path`, loading existing records if the file
    /// exists. A missing file starts an empty store; corrupt JSON is an
    /// error, not silently discarded key material.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let sessions = if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            serde_json::from_str(&data)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, sessions })
    }

    /// Insert a new session record with no shared secret yet, and persist
    /// it before returning.
    ///
    /// Re-issuing with the same private key is a no-op (a reloaded client
    /// re-creating its session). A different private key for an existing
    /// conversation is `DuplicateSession`: key material mid-exchange is
    /// never silently replaced.
    pub fn create_session(&mut self, conversation_id: u64, key_pair: &KeyPair) -> Result<()> {
        match self.sessions.get(&conversation_id) {
            Some(existing) if existing.private_key == *key_pair.private_key() => return Ok(()),
            Some(_) => return Err(Error::DuplicateSession { conversation_id }),
            None => {}
        }
        self.sessions.insert(
            conversation_id,
            SessionRecord {
                conversation_id,
                private_key: key_pair.private_key().clone(),
                shared_secret: None,
            },
        );
        self.save()
    }

    /// Record the derived shared secret for a conversation and persist it.
    ///
    /// Idempotent when the same secret is recorded again (constant-time
    /// comparison). A different value is `SecretMismatch` — an upstream
    /// protocol bug, never overwritten.
    pub fn record_shared_secret(
        &mut self,
        conversation_id: u64,
        secret: SharedSecret,
    ) -> Result<()> {
        let record = self
            .sessions
            .get_mut(&conversation_id)
            .ok_or(Error::UnknownSession { conversation_id })?;
        match &record.shared_secret {
            Some(existing) if *existing == secret => Ok(()),
            Some(_) => Err(Error::SecretMismatch { conversation_id }),
            None => {
                record.shared_secret = Some(secret);
                self.save()
            }
        }
    }

    /// Look up the session record for a conversation.
    pub fn get(&self, conversation_id: u64) -> Option<&SessionRecord> {
        self.sessions.get(&conversation_id)
    }

    /// Number of stored sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store holds no sessions.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Explicit teardown: remove every record and persist the empty store.
    /// Session records are never expired implicitly.
    pub fn clear(&mut self) -> Result<()> {
        self.sessions.clear();
        self.save()
    }

    /// Path this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the store to a temp file and rename it over the previous one,
    /// so a crash mid-write never leaves a truncated file holding every
    /// conversation's private key.
    fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&self.sessions)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

mod hex_scalar {
    use num_bigint::BigUint;
    use parley_crypto::group;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&group::to_hex(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let s = String::deserialize(deserializer)?;
        group::parse_hex(&s).map_err(de::Error::custom)
    }
}

mod hex_secret {
    use parley_crypto::SharedSecret;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(
        value: &Option<SharedSecret>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(secret) => serializer.serialize_some(&secret.to_hex()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<SharedSecret>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| SharedSecret::from_hex(&s).map_err(de::Error::custom))
            .transpose()
    }
}
