//! Process-level glue for the `weather-forecast` and `clear-forecasts`
//! binaries: logging bootstrap, directory clearing and the
//! fetch/aggregate/persist run.

pub mod bootstrap;
pub mod cleanup;
pub mod pipeline;
