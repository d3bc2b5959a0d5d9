pub mod worker_ctx;
pub mod worker_loop;

pub use worker_ctx::WorkerCtx;
pub use worker_loop::{run_worker, WorkerReport};
