use anyhow::{Result, bail};
use seasonsim_game::hash_phrase;
use std::collections::HashSet;

/// Phrase used when no seeds are given.
pub const DEFAULT_PHRASE: &str = "seasonsim";

/// A seed phrase and the stream seed it hashes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub phrase: String,
    pub seed: u32,
}

impl SeedInfo {
    #[must_use]
    pub fn from_phrase(phrase: &str) -> Self {
        Self {
            phrase: phrase.to_string(),
            seed: hash_phrase(phrase),
        }
    }

    /// Phrase for the given iteration; iteration 0 is the phrase itself.
    #[must_use]
    pub fn iteration_phrase(&self, iteration: usize) -> String {
        if iteration == 0 {
            self.phrase.clone()
        } else {
            format!("{}#{iteration}", self.phrase)
        }
    }
}

/// Resolve CLI seed tokens into phrases.
///
/// Tokens are used verbatim except `range:N`, which expands to the phrases
/// `season-1` through `season-N`. Duplicates keep their first position.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut phrases: Vec<String> = Vec::new();
    for token in tokens {
        if token.is_empty() {
            continue;
        }
        if let Some(count) = token.strip_prefix("range:") {
            let Ok(count) = count.parse::<usize>() else {
                bail!("Unrecognized seed range: {token}");
            };
            phrases.extend((1..=count).map(|n| format!("season-{n}")));
            continue;
        }
        phrases.push(token.clone());
    }

    let mut seen = HashSet::new();
    let mut resolved: Vec<SeedInfo> = phrases
        .iter()
        .filter(|phrase| seen.insert(phrase.as_str()))
        .map(|phrase| SeedInfo::from_phrase(phrase))
        .collect();

    if resolved.is_empty() {
        resolved.push(SeedInfo::from_phrase(DEFAULT_PHRASE));
    }
    Ok(resolved)
}
