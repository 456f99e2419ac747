//! Resolution of the API credential from embedded config, the persisted
//! store, or an interactive prompt, in that order.

use std::{fmt, sync::Arc};

use tracing::{info, warn};

use crate::{config::DashboardConfig, store::KeyValueStore};

/// Store key the credential is persisted under.
pub const CREDENTIAL_KEY: &str = "weatherApiKey";

/// Opaque API token. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Trim `candidate` and accept it only if it is at least `min_len` long.
    pub fn parse(candidate: &str, min_len: usize) -> Option<Self> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() || trimmed.chars().count() < min_len {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Interactive source of a credential. `None` means the user cancelled.
pub trait CredentialPrompt: Send + Sync {
    fn prompt(&self) -> Option<String>;
}

pub struct CredentialResolver {
    embedded: Option<String>,
    store: Arc<dyn KeyValueStore>,
    prompt: Option<Box<dyn CredentialPrompt>>,
    allow_prompt: bool,
    min_len: usize,
}

impl fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("has_embedded", &self.embedded.is_some())
            .field("store", &self.store)
            .field("has_prompt", &self.prompt.is_some())
            .field("allow_prompt", &self.allow_prompt)
            .field("min_len", &self.min_len)
            .finish()
    }
}

impl CredentialResolver {
    pub fn new(config: &DashboardConfig, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            embedded: config.api_key.clone(),
            store,
            prompt: None,
            allow_prompt: config.is_local,
            min_len: config.min_credential_len,
        }
    }

    pub fn with_prompt(mut self, prompt: Box<dyn CredentialPrompt>) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// `None` is a supported steady state: the caller runs in demo mode.
    pub fn resolve(&self) -> Option<Credential> {
        if let Some(credential) =
            self.embedded.as_deref().and_then(|key| Credential::parse(key, self.min_len))
        {
            info!("Using API key from embedded configuration");
            return Some(credential);
        }

        if let Some(credential) = self.persisted() {
            info!("Using API key from persisted store");
            return Some(credential);
        }

        if !self.allow_prompt {
            info!("No API key found, running in demo mode");
            return None;
        }

        let entered = self.prompt.as_ref().and_then(|prompt| prompt.prompt());
        match entered {
            Some(candidate) => self.accept(&candidate),
            None => {
                info!("API key prompt cancelled, running in demo mode");
                None
            }
        }
    }

    /// Validate an interactively entered key and persist it on success.
    pub fn accept(&self, candidate: &str) -> Option<Credential> {
        let Some(credential) = Credential::parse(candidate, self.min_len) else {
            warn!(min_len = self.min_len, "Rejected API key: too short");
            return None;
        };

        match self.store.set(CREDENTIAL_KEY, credential.as_str()) {
            Ok(()) => info!("API key saved"),
            Err(e) => warn!(error = %e, "Failed to persist API key"),
        }

        Some(credential)
    }

    fn persisted(&self) -> Option<Credential> {
        match self.store.get(CREDENTIAL_KEY) {
            Ok(saved) => saved.and_then(|key| Credential::parse(&key, self.min_len)),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted API key");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const KEY_32: &str = "0123456789abcdef0123456789abcdef";

    #[derive(Debug, Default)]
    struct CountingPrompt {
        answer: Option<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    impl CredentialPrompt for CountingPrompt {
        fn prompt(&self) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.map(str::to_string)
        }
    }

    #[derive(Debug)]
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
            Err(anyhow!("disk on fire"))
        }
        fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
            Err(anyhow!("disk on fire"))
        }
    }

    fn config(api_key: Option<&str>, is_local: bool) -> DashboardConfig {
        DashboardConfig {
            api_key: api_key.map(str::to_string),
            is_local,
            ..Default::default()
        }
    }

    #[test]
    fn parse_enforces_minimum_length() {
        assert!(Credential::parse("short", 21).is_none());
        assert!(Credential::parse("   ", 21).is_none());
        assert!(Credential::parse(&"x".repeat(20), 21).is_none());
        assert!(Credential::parse(&"x".repeat(21), 21).is_some());
    }

    #[test]
    fn parse_trims_whitespace() {
        let credential = Credential::parse(&format!("  {KEY_32}\n"), 21).unwrap();
        assert_eq!(credential.as_str(), KEY_32);
    }

    #[test]
    fn debug_output_is_redacted() {
        let credential = Credential::parse(KEY_32, 21).unwrap();
        assert!(!format!("{credential:?}").contains(KEY_32));
    }

    #[test]
    fn embedded_key_wins_over_store() {
        let store = Arc::new(MemoryStore::new());
        store.set(CREDENTIAL_KEY, "ffffffffffffffffffffffffffffffff").unwrap();

        let resolver = CredentialResolver::new(&config(Some(KEY_32), true), store);
        assert_eq!(resolver.resolve().unwrap().as_str(), KEY_32);
    }

    #[test]
    fn short_embedded_key_falls_through_to_store() {
        let store = Arc::new(MemoryStore::new());
        store.set(CREDENTIAL_KEY, KEY_32).unwrap();

        let resolver = CredentialResolver::new(&config(Some("YOUR_KEY"), false), store);
        assert_eq!(resolver.resolve().unwrap().as_str(), KEY_32);
    }

    #[test]
    fn prompt_is_skipped_outside_local_context() {
        let calls = Arc::new(AtomicUsize::new(0));
        let prompt = CountingPrompt {
            answer: Some(KEY_32),
            calls: calls.clone(),
        };

        let resolver = CredentialResolver::new(&config(None, false), Arc::new(MemoryStore::new()))
            .with_prompt(Box::new(prompt));

        assert!(resolver.resolve().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn prompted_key_is_persisted_and_reused_without_prompting() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let prompt = CountingPrompt {
            answer: Some(KEY_32),
            calls: calls.clone(),
        };

        let first = CredentialResolver::new(&config(None, true), store.clone())
            .with_prompt(Box::new(prompt));
        assert_eq!(first.resolve().unwrap().as_str(), KEY_32);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let second = CredentialResolver::new(&config(None, true), store.clone())
            .with_prompt(Box::new(CountingPrompt {
                answer: None,
                calls: calls.clone(),
            }));
        assert_eq!(second.resolve().unwrap().as_str(), KEY_32);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cancelled_or_short_prompt_means_demo_mode() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

        let cancelled = CredentialResolver::new(&config(None, true), store.clone())
            .with_prompt(Box::new(CountingPrompt::default()));
        assert!(cancelled.resolve().is_none());

        let short = CredentialResolver::new(&config(None, true), store.clone())
            .with_prompt(Box::new(CountingPrompt {
                answer: Some("abc"),
                ..Default::default()
            }));
        assert!(short.resolve().is_none());
        assert_eq!(store.get(CREDENTIAL_KEY).unwrap(), None);
    }

    #[test]
    fn store_failures_are_not_fatal() {
        let resolver = CredentialResolver::new(&config(None, true), Arc::new(BrokenStore))
            .with_prompt(Box::new(CountingPrompt {
                answer: Some(KEY_32),
                ..Default::default()
            }));

        assert_eq!(resolver.resolve().unwrap().as_str(), KEY_32);
    }
}
