//! Model aliases as published by the inference server's registry.
//!
//! The registry names aliases with a fixed prefix (for example `backtest_`). The
//! dashboard shows the name without that prefix but must send the full name back
//! to the server, so both forms are kept side by side.

use std::fmt;

/// A registry alias with both its wire and display forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelAlias {
    wire: String,
    display: String,
}

impl ModelAlias {
    /// Builds an alias from the name the server uses, stripping `prefix` from
    /// the start only.
    pub fn from_wire(wire: impl Into<String>, prefix: &str) -> Self {
        let wire = wire.into();
        let display = if prefix.is_empty() {
            wire.clone()
        } else {
            wire.strip_prefix(prefix).unwrap_or(&wire).to_string()
        };
        Self { wire, display }
    }

    /// Name sent to `/reload` and `/predict`.
    pub fn wire(&self) -> &str {
        &self.wire
    }

    /// Name shown in the selector and the chart legend.
    pub fn display(&self) -> &str {
        &self.display
    }
}

impl fmt::Display for ModelAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// Aliases available for this session, in server order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasCatalog {
    aliases: Vec<ModelAlias>,
    warning: Option<String>,
}

impl AliasCatalog {
    pub fn from_wire_names<I, S>(names: I, prefix: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            aliases: names
                .into_iter()
                .map(|name| ModelAlias::from_wire(name, prefix))
                .collect(),
            warning: None,
        }
    }

    /// Attaches the reason the catalog had to fall back to the default alias.
    pub fn with_warning(mut self, warning: Option<String>) -> Self {
        self.warning = warning;
        self
    }

    pub fn aliases(&self) -> &[ModelAlias] {
        &self.aliases
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn first(&self) -> Option<&ModelAlias> {
        self.aliases.first()
    }

    pub fn find_by_display(&self, display: &str) -> Option<&ModelAlias> {
        self.aliases.iter().find(|alias| alias.display() == display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_is_stripped_for_display_only() {
        let alias = ModelAlias::from_wire("backtest_20250531", "backtest_");
        assert_eq!(alias.display(), "20250531");
        assert_eq!(alias.wire(), "backtest_20250531");
    }

    #[test]
    fn test_prefix_only_stripped_at_start() {
        let alias = ModelAlias::from_wire("champion_backtest_v2", "backtest_");
        assert_eq!(alias.display(), "champion_backtest_v2");

        let doubled = ModelAlias::from_wire("backtest_backtest_1", "backtest_");
        assert_eq!(doubled.display(), "backtest_1");
        assert_eq!(doubled.wire(), "backtest_backtest_1");
    }

    #[test]
    fn test_catalog_lookup_by_display_returns_wire_name() {
        let catalog =
            AliasCatalog::from_wire_names(vec!["backtest_20250531", "backtest_20250615"], "backtest_");
        let found = catalog.find_by_display("20250615").unwrap();
        assert_eq!(found.wire(), "backtest_20250615");
        assert!(catalog.find_by_display("backtest_20250615").is_none());
        assert_eq!(catalog.first().map(|a| a.display()), Some("20250531"));
    }
}
