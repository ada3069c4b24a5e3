//! Result type alias
//!
//! This module provides a convenient Result type alias that uses
//! [`RosterError`] as the error type.

use super::errors::RosterError;

/// Result type alias for OneRoster client operations
///
/// # Examples
///
/// ```
/// use oneroster::domain::result::Result;
/// use oneroster::domain::errors::RosterError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(RosterError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, RosterError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::RosterError;

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(RosterError::Validation("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
