//! The carrier info screen.

use tokio::sync::watch;

use crate::domain::{CarrierDetails, LoadingState};
use crate::rasp::ScheduleApi;

use super::list::{ListController, LoadHandle, Snapshot};
use super::sources::CarrierInfoSource;

/// Loads one carrier's profile.
///
/// Unlike the list screens, a connectivity failure is not retried: the
/// state stays NoConnectivity until the next `load`.
pub struct CarrierInfoController<A: ScheduleApi + 'static> {
    controller: ListController<CarrierInfoSource<A>>,
}

impl<A: ScheduleApi + 'static> CarrierInfoController<A> {
    pub fn new(api: A, code: impl Into<String>) -> Self {
        Self {
            controller: ListController::with_retry(CarrierInfoSource::new(api, code), None),
        }
    }

    pub fn load(&self) -> LoadHandle {
        self.controller.load()
    }

    pub fn cancel(&self) {
        self.controller.cancel();
    }

    pub fn state(&self) -> LoadingState {
        self.controller.state()
    }

    /// The loaded profile, once available.
    pub fn details(&self) -> Option<CarrierDetails> {
        self.controller.snapshot().rows.into_iter().next()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<CarrierDetails>> {
        self.controller.subscribe()
    }
}
