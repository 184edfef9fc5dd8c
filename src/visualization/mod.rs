pub mod feed;
pub mod format;
pub mod observer;

pub use feed::ChartFeed;
pub use format::format_elapsed;
pub use observer::{LoggingObserver, NullObserver, SessionObserver};
