//! Configuration validation support.

use crate::error::ValidationError;

/// Trait for startup validation.
///
/// Anything read from the environment implements this so that bad input is
/// rejected before the watch loop starts, never inside it.
///
/// # Examples
///
/// ```rust
/// use padel_watch::core::Validate;
/// use padel_watch::error::ValidationError;
///
/// struct Interval(i64);
///
/// impl Validate for Interval {
///     fn validate(&self) -> Result<(), ValidationError> {
///         if self.0 <= 0 {
///             return Err(ValidationError::invalid_field(
///                 "CHECK_INTERVAL",
///                 "must be a positive number of seconds",
///             ));
///         }
///         Ok(())
///     }
/// }
///
/// assert!(Interval(10).validate().is_ok());
/// assert!(Interval(0).validate().is_err());
/// ```
pub trait Validate {
    /// Validate the value.
    ///
    /// # Errors
    ///
    /// Should return a `ValidationError` naming every offending variable.
    fn validate(&self) -> Result<(), ValidationError>;
}
