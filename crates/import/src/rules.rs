use bankfeed_core::AccountName;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A configured `(pattern, account)` pair, before compilation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRuleSpec {
    pub pattern: String,
    pub account: AccountName,
}

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: regex::Error,
    },
}

/// Internal pairing of a rule's account with its case-insensitive regex.
#[derive(Debug, Clone)]
struct CompiledRule {
    pattern: Regex,
    account: AccountName,
}

/// Assigns an offsetting account to a decoded transaction.
///
/// Rules are tried in list order and the first one whose pattern is found in
/// any candidate text wins. Candidates are the payee and, when there is a
/// narration, the narration and `payee + narration` joined with no separator.
/// The joined candidate lets a pattern like `Credit CRD.*Autopay` match text
/// split across both fields; it can also match across the seam by accident
/// (payee `Pay`, narration `Pal Refund` matches `PayPal`).
#[derive(Debug, Clone, Default)]
pub struct AccountClassifier {
    rules: Vec<CompiledRule>,
}

impl AccountClassifier {
    pub fn new(rules: Vec<AccountRuleSpec>) -> Result<Self, RuleError> {
        let rules = rules
            .into_iter()
            .map(|spec| {
                let pattern = RegexBuilder::new(&spec.pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| RuleError::Pattern {
                        pattern: spec.pattern.clone(),
                        source,
                    })?;
                Ok(CompiledRule {
                    pattern,
                    account: spec.account,
                })
            })
            .collect::<Result<Vec<_>, RuleError>>()?;
        Ok(Self { rules })
    }

    pub fn classify(&self, payee: &str, narration: &str) -> Option<&AccountName> {
        let joined = (!narration.is_empty()).then(|| format!("{payee}{narration}"));
        let mut candidates = vec![payee];
        if let Some(joined) = &joined {
            candidates.push(narration);
            candidates.push(joined);
        }

        let rule = self
            .rules
            .iter()
            .find(|rule| candidates.iter().any(|c| rule.pattern.is_match(c)))?;
        tracing::debug!(
            pattern = rule.pattern.as_str(),
            account = %rule.account,
            "account rule matched"
        );
        Some(&rule.account)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
