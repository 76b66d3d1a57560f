use std::sync::Arc;

use crate::{db::Db, service::TransactionService};

pub struct AppState {
    service: TransactionService,
}

impl AppState {
    pub fn new(db: Db) -> AppState {
        AppState {
            service: TransactionService::new(Arc::new(db)),
        }
    }

    pub fn get_service(&self) -> &TransactionService {
        &self.service
    }
}
