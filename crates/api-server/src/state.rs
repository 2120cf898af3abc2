use application::StoreApp;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StoreApp>,
}

impl AppState {
    pub fn new(store: Arc<StoreApp>) -> Self {
        Self { store }
    }
}
