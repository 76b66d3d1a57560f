pub mod health;
pub mod path_not_found;
pub mod transactions;
