pub mod analyze;
pub mod batch;
pub mod models;
pub mod present;
pub mod shared;
pub mod transport;
pub mod validation;

#[cfg(test)]
pub(crate) mod fixtures;

pub mod prelude {
    pub use crate::analyze::prelude::*;
    pub use crate::batch::prelude::*;
    pub use crate::models::prelude::*;
    pub use crate::present::prelude::*;
    pub use crate::shared::prelude::*;
    pub use crate::transport::prelude::*;
    pub use crate::validation::prelude::*;
}

/// Preferred way to output data to users. This macro will write the output to tracing for debugging
/// and to stdout using the global stdout writer. Because we use the stdout writer, the calls
/// will all be async.
#[macro_export]
macro_rules! report_stdout {
    ($($arg:tt)*) => {
        tracing::info!(target="stdout", $($arg)*);
        writeln!($crate::prelude::STDOUT_WRITER.write().await, $($arg)*).ok()
    };
}
