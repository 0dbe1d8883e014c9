//! Error types for fan-out operations.
//!
//! Every item dispatched by a [`FanOut`](crate::FanOut) yields an [`Outcome`]: either the
//! operation's value, or an [`ItemError`] describing why that slot holds no value.

/// Why a single fan-out item produced no value.
///
/// The error is scoped to one slot of the result set. Sibling items are never affected by it.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ItemError<E> {
    /// The operation returned an error
    Failed { index: usize, error: E },
    /// The operation panicked
    Panicked { index: usize, panic_message: String },
    /// The unit of work was dropped by the spawner before reporting back
    Abandoned { index: usize },
}

impl<E> ItemError<E> {
    /// Position of the failed item in the request set.
    pub fn index(&self) -> usize {
        match self {
            ItemError::Failed { index, .. }
            | ItemError::Panicked { index, .. }
            | ItemError::Abandoned { index } => *index,
        }
    }

    /// The operation's own error, if it returned one.
    pub fn into_inner(self) -> Option<E> {
        match self {
            ItemError::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_panic(&self) -> bool {
        matches!(self, ItemError::Panicked { .. })
    }
}

impl<E: std::fmt::Display> std::fmt::Display for ItemError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemError::Failed { index, error } => {
                write!(f, "Item #{} failed: {}", index, error)
            }
            ItemError::Panicked {
                index,
                panic_message,
            } => {
                write!(
                    f,
                    "Item #{} panicked during execution: {}\n\
                     \n\
                     Only this item is affected; the rest of the batch ran to completion.",
                    index, panic_message
                )
            }
            ItemError::Abandoned { index } => {
                write!(
                    f,
                    "Item #{} was abandoned before reporting a result\n\
                     \n\
                     The spawner dropped the unit of work without running it to completion.",
                    index
                )
            }
        }
    }
}

impl<E> std::error::Error for ItemError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ItemError::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Tagged result of one fan-out item
pub type Outcome<R, E> = Result<R, ItemError<E>>;

/// Extract a readable message from a panic payload.
pub(crate) fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
