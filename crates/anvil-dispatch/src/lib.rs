//! Task scheduling and construction-agent dispatch.
//!
//! A [`TaskScheduler`] fixes the order of construction phases. A
//! [`Dispatcher`] binds [`ConstructionAgent`]s to those phases and, in
//! [`Dispatcher::execute`], walks them in order, handing each agent a
//! [`ConstructionContext`] through which it validates parameters, builds
//! objects, and deposits one replica per thread into the object store.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod agent;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod scheduler;

pub use agent::ConstructionAgent;
pub use context::ConstructionContext;
pub use dispatcher::{Dispatcher, ExecutionReport, Invocation};
pub use error::{AgentError, DispatchError, SchedulerError};
pub use scheduler::TaskScheduler;
