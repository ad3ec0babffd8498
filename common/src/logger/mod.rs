mod init;
mod macros;
mod timing;
mod trace_id;

pub use init::{LogFormat, init_logger};
pub use macros::{root_span, scenario_span};
pub use timing::warn_if_slow;
pub use trace_id::TraceId;
