//! Loading/ready/failed overlay for cached data.

/// Phase of a cached view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    /// Last call failed with a human-readable message.
    Failed(String),
}

/// Cached data plus its load phase.
///
/// `data` is always present, so consumers can render it while a call is in
/// flight or after one failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState<T> {
    data: T,
    status: LoadStatus,
}

impl<T> ViewState<T> {
    pub fn loading(data: T) -> Self {
        Self {
            data,
            status: LoadStatus::Loading,
        }
    }

    pub fn ready(data: T) -> Self {
        Self {
            data,
            status: LoadStatus::Ready,
        }
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            LoadStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Drops a recorded failure. No-op in other phases.
    pub fn clear_error(&mut self) {
        if matches!(self.status, LoadStatus::Failed(_)) {
            self.status = LoadStatus::Ready;
        }
    }

    pub(crate) fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    pub(crate) fn begin_loading(&mut self) {
        self.status = LoadStatus::Loading;
    }

    /// Marks the current data as fresh.
    pub(crate) fn settle(&mut self) {
        self.status = LoadStatus::Ready;
    }

    pub(crate) fn resolve(&mut self, data: T) {
        self.data = data;
        self.status = LoadStatus::Ready;
    }

    /// Records a failure and keeps the stale data visible.
    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.status = LoadStatus::Failed(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::{LoadStatus, ViewState};

    #[test]
    fn failure_keeps_data() {
        let mut state = ViewState::ready(vec![1, 2]);
        state.begin_loading();
        assert!(state.is_loading());

        state.fail("disk full");
        assert_eq!(state.data(), &vec![1, 2]);
        assert_eq!(state.error(), Some("disk full"));

        state.clear_error();
        assert_eq!(state.status(), &LoadStatus::Ready);
    }

    #[test]
    fn clear_error_does_not_finish_loading() {
        let mut state = ViewState::loading(0);
        state.clear_error();
        assert!(state.is_loading());

        state.resolve(7);
        assert_eq!(*state.data(), 7);
        assert_eq!(state.error(), None);
    }
}
