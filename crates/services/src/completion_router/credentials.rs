use inference_providers::Credential;

/// Ordered, immutable set of usable credentials for one provider
///
/// Built once at startup. An empty pool is a valid state: the router reports
/// "no credentials configured" at call time instead of failing construction.
#[derive(Debug, Clone, Default)]
pub struct CredentialPool {
    credentials: Vec<Credential>,
}

impl CredentialPool {
    /// Build from raw configuration entries, dropping unset and blank ones
    pub fn build<I, S>(raw_entries: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let credentials = raw_entries
            .into_iter()
            .flatten()
            .map(Into::into)
            .map(|entry: String| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .map(Credential::new)
            .collect();

        Self { credentials }
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Credential> {
        self.credentials.get(index)
    }

    /// Index of the credential used for `retry_offset` within a request drawn at `base`
    pub fn index_for(&self, base: usize, retry_offset: usize) -> Option<usize> {
        if self.credentials.is_empty() {
            return None;
        }
        Some((base + retry_offset) % self.credentials.len())
    }

    /// Credential for one attempt: `pool[(base + retry_offset) mod len]`
    ///
    /// Offsets `0..len` visit every credential exactly once, so a retry never
    /// reuses the credential that just failed as long as the caller stops at
    /// `len` attempts per model.
    pub fn credential_for(&self, base: usize, retry_offset: usize) -> Option<(usize, &Credential)> {
        let index = self.index_for(base, retry_offset)?;
        Some((index, &self.credentials[index]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn pool_of(keys: &[&str]) -> CredentialPool {
        CredentialPool::build(keys.iter().map(|k| Some(k.to_string())))
    }

    #[test]
    fn test_build_filters_unset_and_empty_entries() {
        let pool = CredentialPool::build(vec![
            Some("key-a"),
            None,
            Some(""),
            Some("   "),
            Some(" key-b\n"),
            None,
        ]);

        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get(0).unwrap().expose(), "key-a");
        assert_eq!(pool.get(1).unwrap().expose(), "key-b");
    }

    #[test]
    fn test_empty_pool_is_constructible() {
        let pool = CredentialPool::build(Vec::<Option<String>>::new());

        assert!(pool.is_empty());
        assert_eq!(pool.credential_for(0, 0), None);
        assert_eq!(pool.credential_for(3, 1), None);
    }

    #[test]
    fn test_retry_offsets_are_pairwise_distinct() {
        let pool = pool_of(&["k0", "k1", "k2", "k3"]);

        for base in 0..pool.len() {
            let seen: HashSet<usize> = (0..pool.len())
                .map(|offset| pool.credential_for(base, offset).unwrap().0)
                .collect();
            assert_eq!(seen.len(), pool.len(), "base {base} repeated a credential");
        }
    }

    #[test]
    fn test_retry_offset_wraps_at_pool_size() {
        let pool = pool_of(&["k0", "k1", "k2"]);

        let first = pool.credential_for(1, 0).unwrap();
        let wrapped = pool.credential_for(1, pool.len()).unwrap();

        assert_eq!(first, wrapped);
        assert_eq!(first.1.expose(), "k1");
        assert_eq!(pool.credential_for(1, 2).unwrap().1.expose(), "k0");
    }
}
