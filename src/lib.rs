pub mod config;
pub mod errors;
pub mod output;

pub mod core {
    pub mod cancel;
    pub mod dispatcher;
    pub mod result;
    pub mod stats;
    pub mod target;
}

pub mod transport {
    pub mod http;
    pub mod traits;
}

pub mod feeders {
    pub mod lines;
    pub mod list;
    pub mod traits;
}

pub use config::{ConfigOverrides, DispatcherConfig, ResultOrder};
pub use crate::core::cancel::{CancelHandle, CancelSignal};
pub use crate::core::dispatcher::Dispatcher;
pub use crate::core::result::{DispatchReport, FetchResult};
pub use crate::core::stats::{DispatchStats, StatsSnapshot};
pub use crate::core::target::Target;
pub use errors::{DispatchError, FetchError};
pub use feeders::lines::LineFeeder;
pub use feeders::list::ListFeeder;
pub use feeders::traits::Feeder;
pub use output::OutputFormat;
pub use transport::http::HttpTransport;
pub use transport::traits::Transport;
