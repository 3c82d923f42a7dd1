//! `axioschat keys` subcommands.

use crate::credentials::{mask, CredentialKind, CredentialStore};
use crate::error::Result;
use colored::Colorize;

/// Store a credential. A key with an unexpected format is saved anyway, with
/// a warning.
pub fn handle_set(store: &dyn CredentialStore, provider: &str, value: &str) -> Result<CredentialKind> {
    let kind: CredentialKind = provider.parse()?;
    let value = value.trim();

    if let Err(e) = kind.validate(value) {
        println!("{} {}", "⚠".yellow().bold(), e.to_string().yellow());
    }

    store.set(kind, value)?;
    println!("{} {} saved", "✓".green().bold(), kind.display_name());
    Ok(kind)
}

/// Print each credential masked, or how to provide it.
pub fn handle_show(store: &dyn CredentialStore) -> Result<()> {
    println!("{}", "Credentials:".bold());
    for kind in CredentialKind::all() {
        match store.get(kind) {
            Some(value) => println!("  {:<10} {}", kind.as_str(), mask(&value).green()),
            None => println!(
                "  {:<10} {} {}",
                kind.as_str(),
                "(not set)".dimmed(),
                format!("- use `axioschat keys set {} <key>` or ${}", kind, kind.env_var()).dimmed()
            ),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::MemoryCredentialStore;
    use crate::error::ChatError;

    #[test]
    fn test_set_accepts_legacy_provider_names() {
        let store = MemoryCredentialStore::new();
        let kind = handle_set(&store, "flock", "  r8_token  ").unwrap();
        assert_eq!(kind, CredentialKind::Replicate);
        assert_eq!(store.get(CredentialKind::Replicate).as_deref(), Some("r8_token"));
    }

    #[test]
    fn test_set_keeps_malformed_key() {
        let store = MemoryCredentialStore::new();
        handle_set(&store, "gaia", "sk-not-gaia").unwrap();
        assert_eq!(store.get(CredentialKind::Gaia).as_deref(), Some("sk-not-gaia"));
    }

    #[test]
    fn test_set_unknown_provider() {
        let store = MemoryCredentialStore::new();
        assert!(matches!(
            handle_set(&store, "anthropic", "x"),
            Err(ChatError::Config(_))
        ));
    }
}
