//! Result type alias for skulabel

use super::errors::SkuLabelError;

/// Result type alias for skulabel operations
///
/// # Examples
///
/// ```
/// use skulabel::domain::result::Result;
/// use skulabel::domain::errors::SkuLabelError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SkuLabelError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SkuLabelError>;
