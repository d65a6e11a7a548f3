//! Environment entry parsing.

use crate::cluster::EnvVar;
use crate::error::ConvertError;

/// Parses one raw environment entry into a name/value pair.
///
/// `NAME=value` is tried first, splitting on the first `=`. Otherwise
/// `NAME: value` splits on the first `:`, and a value wrapped in single
/// quotes loses exactly one pair of them. Both sides are trimmed.
///
/// # Errors
///
/// Returns [`ConvertError::InvalidEnvironment`] if the entry has neither
/// delimiter or the name is empty.
pub fn parse_env(service: &str, entry: &str) -> Result<EnvVar, ConvertError> {
    let invalid = || ConvertError::InvalidEnvironment {
        service: service.to_string(),
        entry: entry.to_string(),
    };

    let (name, value) = if let Some((name, value)) = entry.split_once('=') {
        (name.trim(), value.trim())
    } else if let Some((name, value)) = entry.split_once(':') {
        (name.trim(), strip_single_quotes(value.trim()))
    } else {
        return Err(invalid());
    };

    if name.is_empty() {
        return Err(invalid());
    }

    Ok(EnvVar::new(name, value))
}

fn strip_single_quotes(value: &str) -> &str {
    value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(entry: &str) -> Result<EnvVar, ConvertError> {
        parse_env("web", entry)
    }

    #[test]
    fn test_equals_and_colon_forms_agree() {
        let expected = EnvVar::new("A", "b");
        assert_eq!(env("A=b").unwrap(), expected);
        assert_eq!(env("A: b").unwrap(), expected);
        assert_eq!(env("A:'b'").unwrap(), expected);
    }

    #[test]
    fn test_split_on_first_delimiter() {
        assert_eq!(env("URL=http://x?a=b").unwrap(), EnvVar::new("URL", "http://x?a=b"));
        assert_eq!(env("HOST: db:5432").unwrap(), EnvVar::new("HOST", "db:5432"));
    }

    #[test]
    fn test_equals_wins_over_colon() {
        assert_eq!(env("A:B=c").unwrap(), EnvVar::new("A:B", "c"));
    }

    #[test]
    fn test_quotes_stripped_once_and_only_for_colon_form() {
        assert_eq!(env("A: ''b''").unwrap(), EnvVar::new("A", "'b'"));
        assert_eq!(env("A='b'").unwrap(), EnvVar::new("A", "'b'"));
        assert_eq!(env("A: 'b").unwrap(), EnvVar::new("A", "'b"));
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(env("  NAME =  value  ").unwrap(), EnvVar::new("NAME", "value"));
        assert_eq!(env("EMPTY=").unwrap(), EnvVar::new("EMPTY", ""));
    }

    #[test]
    fn test_invalid_entries() {
        assert_eq!(
            env("noequalsnocolon"),
            Err(ConvertError::InvalidEnvironment {
                service: String::from("web"),
                entry: String::from("noequalsnocolon"),
            })
        );
        assert!(env("=value").is_err());
        assert!(env("  : value").is_err());
    }
}
