use std::borrow::Cow;

/// Longest record key accepted from clients.
const MAX_KEY_LEN: usize = 64;

#[encore_derive::encore_error]
pub enum ResourceGuardError {
    #[error("Resource validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Utilities for safe resource handling and ID validation.
#[derive(Debug)]
pub struct ResourceGuard;

impl ResourceGuard {
    /// Normalizes a client-supplied record id to its bare key.
    ///
    /// Accepts either `table:key` or `key`. A `table:` prefix naming a different table is
    /// rejected, which keeps an id of one model from being used against another model's endpoint.
    /// Keys must be 1..=64 ASCII alphanumerics, `-` or `_`.
    ///
    /// # Errors
    /// Returns an error on a table mismatch or a malformed key.
    pub fn verify<I, T>(id: I, expected_table: T) -> Result<String, ResourceGuardError>
    where
        I: AsRef<str>,
        T: AsRef<str>,
    {
        let id_ref = id.as_ref().trim();
        let table_ref = expected_table.as_ref();

        let key = match id_ref.split_once(':') {
            Some((table, _)) if table != table_ref => {
                return Err(ResourceGuardError::Validation {
                    message: format!("Expected '{table_ref}', got '{table}'").into(),
                    context: Some("ID table mismatch".into()),
                });
            },
            Some((_, key)) => key,
            None => id_ref,
        };

        if key.is_empty()
            || key.len() > MAX_KEY_LEN
            || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ResourceGuardError::Validation {
                message: format!("Malformed key '{key}'").into(),
                context: Some(format!("Verifying {table_ref} id").into()),
            });
        }

        Ok(key.to_owned())
    }

    /// Renders a key as a fully qualified `table:key` id.
    #[must_use]
    pub fn qualify(key: &str, table: &str) -> String {
        format!("{table}:{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_verification() {
        assert_eq!(ResourceGuard::verify("product:AB12cd", "product").unwrap(), "AB12cd");
        assert_eq!(ResourceGuard::verify("AB12cd", "product").unwrap(), "AB12cd");
        assert!(ResourceGuard::verify("category:AB12cd", "product").is_err());
    }

    #[test]
    fn test_malformed_keys() {
        assert!(ResourceGuard::verify("", "product").is_err());
        assert!(ResourceGuard::verify("product:", "product").is_err());
        assert!(ResourceGuard::verify("a b", "product").is_err());
        assert!(ResourceGuard::verify("x;DELETE", "product").is_err());
        assert!(ResourceGuard::verify("k".repeat(65), "product").is_err());
    }

    #[test]
    fn test_qualify() {
        assert_eq!(ResourceGuard::qualify("AB12cd", "category"), "category:AB12cd");
    }
}
