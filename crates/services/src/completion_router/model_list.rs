use config::DEFAULT_MODEL;
use std::collections::HashMap;

/// Misconfigured model ids seen in practice, mapped to the id the provider serves
const BUILTIN_ALIASES: [(&str, &str); 2] = [
    (
        "meta-llama/llama-3.3-70b-instruct-turbo",
        "meta-llama/Llama-3.3-70B-Instruct-Turbo",
    ),
    (
        "meta-llama/llama-3.1-8b-instruct-turbo",
        "meta-llama/Meta-Llama-3.1-8B-Instruct-Turbo",
    ),
];

/// Known-alias corrections applied to every configured model id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelAliases {
    aliases: HashMap<String, String>,
}

impl ModelAliases {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in corrections
    pub fn builtin() -> Self {
        Self::empty().with_aliases(
            BUILTIN_ALIASES
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string())),
        )
    }

    pub fn with_alias(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.aliases.insert(from.into(), to.into());
        self
    }

    pub fn with_aliases<I>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.aliases.extend(aliases);
        self
    }

    pub fn resolve<'a>(&'a self, model: &'a str) -> &'a str {
        self.aliases.get(model).map(String::as_str).unwrap_or(model)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Ordered, de-duplicated candidate models for one logical request
///
/// Never empty: the known default model is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFallbackList {
    models: Vec<String>,
}

impl ModelFallbackList {
    /// Build `[primary, fallbacks..., known_default]`
    ///
    /// Blank entries are dropped, aliases are resolved before
    /// de-duplication, and the default is appended only if missing.
    pub fn build(
        primary: &str,
        fallbacks_csv: &str,
        known_default: &str,
        aliases: &ModelAliases,
    ) -> Self {
        let known_default = match known_default.trim() {
            "" => DEFAULT_MODEL,
            model => model,
        };

        let candidates = std::iter::once(primary)
            .chain(fallbacks_csv.split(','))
            .chain(std::iter::once(known_default))
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .map(|model| aliases.resolve(model));

        let mut models: Vec<String> = Vec::new();
        for model in candidates {
            if !models.iter().any(|seen| seen == model) {
                models.push(model.to_string());
            }
        }

        Self { models }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.models.iter()
    }

    pub fn primary(&self) -> &str {
        self.models.first().map(String::as_str).unwrap_or(DEFAULT_MODEL)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl<'a> IntoIterator for &'a ModelFallbackList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
