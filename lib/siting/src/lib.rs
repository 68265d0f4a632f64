use std::path::Path;
use fnv::FnvHashSet;

pub mod error;
pub mod model;
pub mod solver;
pub mod decode;
pub mod route;
pub mod cost;
pub mod output;
mod pipeline;

pub use error::{Error, Result};
pub use pipeline::{optimize, Outcome};
pub use model::{ModelOptions, SubtourElimination};
pub use decode::{DecodeOptions, SitingSolution};
pub use instances::{SitingInstance, Weights};

pub type Set<T> = FnvHashSet<T>;


mod logging_setup {
    use super::*;
    use anyhow::Context;
    use tracing_subscriber::{EnvFilter, fmt, registry, prelude::*};
    use tracing_appender::{non_blocking, non_blocking::WorkerGuard};
    use std::fs::OpenOptions;

    fn build_and_set_global_subscriber<P>(logfile: Option<P>, is_test : bool) -> anyhow::Result<Option<WorkerGuard>> where
        P : AsRef<Path>
    {
        let stderr_log = fmt::layer().with_writer(std::io::stderr);
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let r = registry().with(stderr_log).with(env_filter);

        let flush_guard = match logfile {
            Some(p) => {
                let p = p.as_ref();
                let logfile = OpenOptions::new()
                    .create(true)
                    .write(true)
                    .truncate(true)
                    .open(p)
                    .with_context(|| format!("failed to open log file {:?}", p))?;
                let (writer, _guard) = non_blocking::NonBlockingBuilder::default()
                    .lossy(false)
                    .finish(logfile);
                let json = fmt::layer()
                    .json()
                    .with_span_list(true)
                    .with_current_span(false)
                    .with_writer(writer);

                let r = r.with(json);
                if is_test { r.try_init().ok(); }
                else { r.try_init().context("global logger already set")?; }
                Some(_guard)
            },
            None => {
                if is_test { r.try_init().ok(); }
                else { r.try_init().context("global logger already set")?; }
                None
            }
        };
        return Ok(flush_guard)
    }

    /// Installs the global subscriber: human readable events on stderr filtered by `RUST_LOG`
    /// (default `warn`), plus ndjson events in `logfile` if given.  Keep the guard alive until exit.
    pub fn init_logging(logfile: Option<impl AsRef<Path>>) -> anyhow::Result<Option<WorkerGuard>> {
        return build_and_set_global_subscriber(logfile, false);
    }

    #[allow(dead_code)]
    pub(crate) fn init_test_logging(logfile: Option<impl AsRef<Path>>) -> Option<WorkerGuard> {
        return build_and_set_global_subscriber(logfile, true).ok().flatten();
    }
}
pub use logging_setup::*;
