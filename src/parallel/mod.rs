pub mod batch;
pub mod pool;

pub use batch::{read_batch_file, run_batch, split_batch_text, BatchInputError, BatchItem};
pub use pool::WorkerPool;
