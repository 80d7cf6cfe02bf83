//! State

use std::sync::Arc;

use storefront_app::context::AppContext;

/// Shared handler state, injected into the depot once per router.
#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
}

impl State {
    #[must_use]
    pub(crate) fn from_app_context(app: AppContext) -> Arc<Self> {
        Arc::new(Self { app })
    }
}
