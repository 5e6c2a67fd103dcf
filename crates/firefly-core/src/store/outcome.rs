use serde::Serialize;

/// How a store operation resolved.
///
/// Gateway absence and transport failures are not errors at the store
/// boundary; they resolve to `NotConnected` and `Failed` and leave the store at
/// its last consistent snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum Outcome<T> {
    /// The gateway call completed and its result was applied.
    Done(T),
    /// No gateway attached yet; nothing was sent.
    NotConnected,
    /// Another operation holds the store's slot.
    Busy,
    /// Input rejected locally; nothing was sent.
    Rejected,
    /// The gateway call failed.
    Failed,
}

impl<T> Outcome<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    /// Returns the value of a completed operation.
    pub fn done(self) -> Option<T> {
        match self {
            Self::Done(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Self::Done(value) => Outcome::Done(f(value)),
            Self::NotConnected => Outcome::NotConnected,
            Self::Busy => Outcome::Busy,
            Self::Rejected => Outcome::Rejected,
            Self::Failed => Outcome::Failed,
        }
    }
}
