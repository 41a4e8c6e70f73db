//! Page load state.
//!
//! Every catalog view starts out loading and settles exactly once, based on
//! the outcome of the single fetch it performs.

/// `Loading -> {Ready | NotFound | Error}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState<T> {
    #[default]
    Loading,
    Ready(T),
    NotFound,
    /// The fetch failed; carries a message fit for display.
    Error(String),
}

impl<T> LoadState<T> {
    /// Settle from a fetch that distinguishes "missing" from "failed".
    pub fn settle<E: core::fmt::Display>(result: Result<Option<T>, E>) -> Self {
        match result {
            Ok(Some(value)) => Self::Ready(value),
            Ok(None) => Self::NotFound,
            Err(err) => Self::Error(err.to_string()),
        }
    }

    /// Transform the ready value, keeping every other state.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadState<U> {
        match self {
            Self::Loading => LoadState::Loading,
            Self::Ready(value) => LoadState::Ready(f(value)),
            Self::NotFound => LoadState::NotFound,
            Self::Error(message) => LoadState::Error(message),
        }
    }

    #[must_use]
    pub const fn is_settled(&self) -> bool {
        !matches!(self, Self::Loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_loading() {
        let state: LoadState<u8> = LoadState::default();
        assert!(!state.is_settled());
    }

    #[test]
    fn test_settle() {
        assert_eq!(LoadState::settle::<&str>(Ok(Some(1))), LoadState::Ready(1));
        assert_eq!(LoadState::<u8>::settle::<&str>(Ok(None)), LoadState::NotFound);
        assert_eq!(
            LoadState::<u8>::settle(Err("boom")),
            LoadState::Error("boom".to_string())
        );
    }

    #[test]
    fn test_map_keeps_terminal_states() {
        assert_eq!(LoadState::Ready(2).map(|n| n * 2), LoadState::Ready(4));
        assert_eq!(LoadState::<u8>::NotFound.map(|n| n * 2), LoadState::NotFound);
        assert!(LoadState::<u8>::Error("x".into()).map(|n| n * 2).is_settled());
    }
}
