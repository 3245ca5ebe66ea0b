use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{Labels, ModelError, ModelResult};

/// Label predicates used to narrow an instance listing.
///
/// Two independent sets of conditions, all of which must hold:
/// - `keys`: the label key must be present (any value);
/// - `key_values`: the label key must be present with exactly this value.
///
/// An empty filter matches every instance.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelFilter {
    pub keys: BTreeSet<String>,
    pub key_values: BTreeMap<String, String>,
}

impl LabelFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the label `key` to be present.
    pub fn has_key(mut self, key: impl Into<String>) -> Self {
        self.keys.insert(key.into());
        self
    }

    /// Require the label `key` to be present with value `value`.
    pub fn has_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.key_values.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.key_values.is_empty()
    }

    /// Returns `true` if `labels` satisfy every key and every key=value condition.
    pub fn matches(&self, labels: &Labels) -> bool {
        self.keys.iter().all(|k| labels.contains_key(k))
            && self
                .key_values
                .iter()
                .all(|(k, v)| labels.get(k) == Some(v.as_str()))
    }

    /// Reject conditions that cannot be rendered unambiguously.
    ///
    /// A key-present condition whose key is empty or contains `=` would be read
    /// by a runtime as a key=value filter.
    pub fn validate(&self) -> ModelResult<()> {
        let bad_key = self
            .keys
            .iter()
            .chain(self.key_values.keys())
            .find(|k| k.trim().is_empty() || k.contains('='));
        match bad_key {
            Some(k) => Err(ModelError::InvalidLabelExpr(k.clone())),
            None => Ok(()),
        }
    }

    /// Render the filter as runtime label expressions.
    ///
    /// Key filters come first as `key`, then value filters as `key=value`,
    /// each group in key order.
    pub fn expressions(&self) -> Vec<String> {
        self.keys
            .iter()
            .cloned()
            .chain(self.key_values.iter().map(|(k, v)| format!("{k}={v}")))
            .collect()
    }

    /// Add a single `key` or `key=value` expression to the filter.
    ///
    /// The value may be empty (`key=`), which requires the label to exist with an empty value.
    pub fn with_expr(self, expr: &str) -> ModelResult<Self> {
        match expr.split_once('=') {
            Some((k, v)) if !k.trim().is_empty() => Ok(self.has_value(k.trim(), v)),
            None if !expr.trim().is_empty() => Ok(self.has_key(expr.trim())),
            _ => Err(ModelError::InvalidLabelExpr(expr.to_string())),
        }
    }

    /// Build a filter from a list of `key` / `key=value` expressions.
    pub fn parse_exprs<I, S>(exprs: I) -> ModelResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        exprs
            .into_iter()
            .try_fold(Self::new(), |f, e| f.with_expr(e.as_ref()))
    }
}
