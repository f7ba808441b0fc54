//! yaolog Core
//!
//! Call interception with adaptive method logging.
//! Every intercepted call is narrated (entry with parameters, exit with the
//! return value or a classified error, elapsed time) without the call site
//! writing any logging code. The crate is backend agnostic: loggers come from
//! a pluggable factory (`tracing`, console, file, in-memory).
//!
//! ## Interception
//!
//! ```rust,ignore
//! use yaolog_core::{call_site, Interceptor, Target};
//!
//! struct OrderController;
//! impl Target for OrderController {}
//!
//! let interceptor = Interceptor::with_defaults();
//! let controller = OrderController;
//! let (customer, quantity) = (7u64, 2u32);
//!
//! // INFO: "Method entry: place_order; parameter names- [customer, quantity]; parameters- [7, 2]"
//! let order_id = interceptor.around(call_site!(&controller, place_order(customer, quantity)), || {
//!     repo.insert(customer, quantity)
//! })?;
//! ```
//!
//! ## What decides the verbosity
//!
//! - Level floor: nothing below it is logged, whatever the backend allows
//! - `*Controller` / `*Client` receivers and INFO markers: narrated at INFO,
//!   everything else at DEBUG
//! - Hide markers: parameters or return values replaced with a placeholder
//! - Exception lists: error types logged at INFO or WARN instead of ERROR,
//!   optionally as a one-line digest
//! - Sequences longer than the collection limit are summarised

pub mod call;
pub mod config;
pub mod direct;
pub mod error;
pub mod interceptor;
pub mod logging;
pub mod policy;
pub mod safety;
pub mod sites;
pub mod target;
pub mod throwable;
pub mod types;
pub mod value;

// Re-export commonly used types
pub use call::CallDescriptor;

pub use config::{
    ConfigError, ConfigProvider, ConfigResult, FileConfigProvider, LoggingConfig,
    MemoryConfigProvider,
};

pub use direct::{WrapError, WrappedError};

pub use error::{YaologError, YaologResult};

pub use interceptor::{Intercepted, Interceptor, NOT_LOGGED};

pub use logging::{
    init_tracing, LogLevel, Logger, LoggerFactory, LoggerRegistry, MemorySink, SharedLogger,
    Subject, TracingLogger,
};

pub use policy::{Classification, LevelFloor, LoggingPolicy};

pub use sites::{HideLogElements, SiteRegistry};

pub use target::{resolve_real_target, Target, MAX_PROXY_DEPTH};

pub use throwable::Throwable;

pub use types::{TypeIdentity, TypeRegistry};

pub use value::{LogValue, ToLogValue};
