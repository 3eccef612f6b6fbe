//! Library side of the `nutri` command: logging setup and the batch pipeline.

pub mod logging;
pub mod pipeline;
pub mod types;
