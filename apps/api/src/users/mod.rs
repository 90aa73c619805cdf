// Sign-in bookkeeping: one profile record per identity-provider user.

pub mod handlers;
pub mod manager;
pub mod models;
