//! Lifecycle shared by the payment and receipt forms.

use serde::Serialize;

/// `Empty -> Loading -> Ready -> Validating -> Valid -> Submitted`, with
/// `Invalid` reachable from any step and left again by the next edit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "camelCase")]
pub enum FormState {
    #[default]
    Empty,
    Loading,
    Ready,
    Validating,
    Valid,
    Submitted,
    Invalid(String),
}

/// Shown when the backend rejects or never answers a submission.
pub const SUBMIT_FAILED_MESSAGE: &str = "Failed to save. Please try again.";

/// Shown when reference data cannot be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load data. Please try again.";

impl FormState {
    pub fn begin_loading(&mut self) {
        *self = FormState::Loading;
    }

    pub fn loaded(&mut self) {
        *self = FormState::Ready;
    }

    /// A successful edit clears any error and invalidates a prior validation.
    pub fn edited(&mut self) {
        if !matches!(self, FormState::Empty | FormState::Loading) {
            *self = FormState::Ready;
        }
    }

    pub fn begin_validation(&mut self) {
        *self = FormState::Validating;
    }

    pub fn validated(&mut self) {
        *self = FormState::Valid;
    }

    pub fn submitted(&mut self) {
        *self = FormState::Submitted;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        *self = FormState::Invalid(message.into());
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, FormState::Valid)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FormState::Invalid(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_recovers_from_invalid() {
        let mut state = FormState::Ready;
        state.fail("No invoices selected.");
        assert_eq!(state.error(), Some("No invoices selected."));

        state.edited();
        assert_eq!(state, FormState::Ready);
    }

    #[test]
    fn edit_invalidates_prior_validation() {
        let mut state = FormState::Valid;
        state.edited();
        assert!(!state.is_valid());
    }

    #[test]
    fn edit_does_not_skip_loading() {
        let mut state = FormState::Loading;
        state.edited();
        assert_eq!(state, FormState::Loading);
    }

    #[test]
    fn serialises_with_message() {
        let state = FormState::Invalid("boom".to_string());
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["state"], "invalid");
        assert_eq!(json["message"], "boom");
    }
}
