use crate::Status;
use tracing::{level_filters::LevelFilter, Level};
use tracing_subscriber::{
    fmt::writer::MakeWriterExt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

pub struct Tracing;

impl Tracing {
    /// Installs the global subscriber for binary `name`.
    ///
    /// Logs go to stderr. Stdout belongs to program output, which for the
    /// sanitizer filter is the data stream itself.
    pub fn setup(name: &str, debug: bool) -> Result<(), Status> {
        let (level, filter) = match debug {
            true => (Level::DEBUG, LevelFilter::DEBUG),
            false => (Level::INFO, LevelFilter::INFO),
        };

        match tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::Layer::new()
                    .with_writer(std::io::stderr.with_max_level(level))
                    .with_filter(filter),
            )
            .try_init()
        {
            Ok(()) => {
                tracing::debug!("tracing enabled for {name}");
                Ok(())
            }
            Err(e) => {
                eprintln!("{e}");
                return Err(Status::new("Failed to setup tracing", e));
            }
        }
    }
}
