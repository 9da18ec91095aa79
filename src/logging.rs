use time::UtcOffset;
use tracing_subscriber::{
    fmt::time::OffsetTime, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

use crate::{errors::InitializationError, ServiceConfig, ServiceError};

pub fn setup_logging(config: &ServiceConfig) -> Result<(), ServiceError> {
    let timer = OffsetTime::new(
        UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
        time::format_description::well_known::Rfc3339,
    );

    // Determine base level filter
    let base_level = config.log.get_level_filter();

    let env_filter = EnvFilter::default().add_directive(base_level.into());

    // Build and initialize the subscriber
    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(config.log.thread_ids)
        .with_thread_names(config.log.thread_names)
        .with_file(config.log.include_location)
        .with_line_number(config.log.include_location)
        .with_level(true)
        .with_timer(timer)
        .with_filter(env_filter);

    Registry::default().with(layer).try_init().map_err(|e| {
        ServiceError::Init(InitializationError::logging(format!(
            "Failed to initialize logging: {}",
            e
        )))
    })?;

    Ok(())
}
