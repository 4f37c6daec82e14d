// SPDX-License-Identifier: MIT OR Apache-2.0

//! `${name}` placeholder substitution from prefixed environment variables.
//!
//! The substitution map is a snapshot of the process environment taken when the
//! substitutor is built: only variables named `<PREFIX>_<NAME>` are kept, and the
//! `<PREFIX>_` part is stripped so that `${NAME}` resolves to their value.
//! The snapshot never changes afterwards, so a substitutor can be shared freely
//! between threads.

use std::collections::HashMap;
use std::env;

const PLACEHOLDER_START: &str = "${";
const PLACEHOLDER_END: char = '}';

/// Replaces `${name}` placeholders using an immutable, prefix-filtered map.
///
/// Substitution is a single pass: a replacement value containing `${...}` is
/// copied verbatim and not expanded again. Placeholders without a mapping are
/// left untouched.
///
/// # Examples
///
/// ```
/// use layercfg::domain::EnvironmentSubstitutor;
///
/// let vars = vec![
///     ("APP_DB_HOST".to_string(), "db.internal".to_string()),
///     ("OTHER_DB_HOST".to_string(), "ignored".to_string()),
/// ];
/// let substitutor = EnvironmentSubstitutor::from_vars("APP", vars);
///
/// assert_eq!(
///     substitutor.substitute("jdbc://${DB_HOST}/${DB_NAME}"),
///     "jdbc://db.internal/${DB_NAME}"
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvironmentSubstitutor {
    prefix: String,
    mapping: HashMap<String, String>,
}

impl EnvironmentSubstitutor {
    /// Builds a substitutor from the current process environment.
    ///
    /// An empty `prefix` disables substitution entirely.
    pub fn from_env(prefix: impl Into<String>) -> Self {
        Self::from_vars(prefix, env::vars())
    }

    /// Builds a substitutor from an explicit list of variables.
    pub fn from_vars<I>(prefix: impl Into<String>, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let prefix = prefix.into();
        let mut mapping = HashMap::new();

        if !prefix.is_empty() {
            let env_prefix = format!("{}_", prefix);
            for (name, value) in vars {
                if let Some(stripped) = name.strip_prefix(&env_prefix) {
                    mapping.insert(stripped.to_string(), value);
                }
            }
        }

        tracing::debug!(
            prefix = %prefix,
            entries = mapping.len(),
            "Built environment substitution map"
        );

        Self { prefix, mapping }
    }

    /// Creates a substitutor that never replaces anything.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// The environment prefix this substitutor was built with (without `_`).
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns `true` if no placeholder can ever be resolved.
    pub fn is_disabled(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Looks up the value a `${name}` placeholder resolves to.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.mapping.get(name).map(String::as_str)
    }

    /// Applies one substitution pass to `template`.
    pub fn substitute(&self, template: &str) -> String {
        if self.mapping.is_empty() || !template.contains(PLACEHOLDER_START) {
            return template.to_string();
        }

        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find(PLACEHOLDER_START) {
            out.push_str(&rest[..start]);
            let after = &rest[start + PLACEHOLDER_START.len()..];

            let Some(end) = after.find(PLACEHOLDER_END) else {
                // Unterminated placeholder, keep the remainder as-is.
                out.push_str(&rest[start..]);
                return out;
            };

            let name = &after[..end];
            match self.mapping.get(name) {
                Some(value) => out.push_str(value),
                None => out.push_str(&rest[start..start + PLACEHOLDER_START.len() + end + 1]),
            }
            rest = &after[end + 1..];
        }

        out.push_str(rest);
        out
    }
}
