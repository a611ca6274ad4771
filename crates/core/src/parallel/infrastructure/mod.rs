pub mod inline_executor;
pub mod worker_pool;
