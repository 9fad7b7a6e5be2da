//! Error context wrapping and named callables

use std::error::Error as StdError;
use std::fmt;

/// Boxed error accepted by the `*_if` helpers.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// An error annotated with a context message.
///
/// Displays as `"<context>: <source>"`, so nested wrapping reads outermost
/// context first.
#[derive(Debug, thiserror::Error)]
#[error("{context}: {source}")]
pub struct ContextError {
    context: String,
    #[source]
    source: BoxError,
}

impl ContextError {
    pub fn new(source: impl Into<BoxError>, context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            source: source.into(),
        }
    }

    pub fn context(&self) -> &str {
        &self.context
    }
}

/// Wrap `err` with `context`.
pub fn wrap(err: impl Into<BoxError>, context: impl Into<String>) -> ContextError {
    ContextError::new(err, context)
}

/// A zero-argument fallible callable that carries its own name.
///
/// The name is attached to the error when the callable fails, which is how
/// [`error_if_calling`](crate::Logger::error_if_calling) attributes a
/// failure to the callback that produced it.
///
/// ```
/// use node_logger::{named_fn, NamedFn};
///
/// fn close_db() -> Result<(), std::io::Error> {
///     Ok(())
/// }
///
/// let explicit = NamedFn::new("close_db", close_db);
/// let from_macro = named_fn!(close_db);
/// assert_eq!(explicit.name(), from_macro.name());
/// ```
pub struct NamedFn<F> {
    name: String,
    f: F,
}

impl<F> NamedFn<F> {
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Name the callable after its type path.
    ///
    /// For function items this is the full path (`my_crate::db::close`); for
    /// closures it is the enclosing function followed by `{{closure}}`.
    pub fn from_fn(f: F) -> Self {
        Self {
            name: std::any::type_name::<F>().to_string(),
            f,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Call the function, wrapping a failure with the function's name.
    pub fn call<E>(self) -> Result<(), ContextError>
    where
        F: FnOnce() -> Result<(), E>,
        E: Into<BoxError>,
    {
        let name = self.name;
        (self.f)().map_err(|e| wrap(e, name))
    }
}

impl<F> fmt::Debug for NamedFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedFn").field("name", &self.name).finish()
    }
}
