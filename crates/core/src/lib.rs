// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! skein-core: shared domain model for the skein orchestration engine

pub mod clock;
pub mod event;
pub mod id;
pub mod run;
pub mod schema;
pub mod toposort;

pub use clock::{Clock, FakeClock, SystemClock};
pub use event::{EventLevel, RunEvent, RunEventRecord};
pub use run::{PipelineRun, RunId, RunStatus};
pub use schema::{builtin_config_types, ConfigField, ConfigScheme, ConfigType, ScalarKind, Shape};
pub use toposort::{toposort, CycleError};
