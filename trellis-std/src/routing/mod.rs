//! # Routing
//!
//! The [`Router`] keeps an ordered list of [`Layer`]s and walks it for every
//! request.
//!
//! ## Registration
//!
//! | Method                       | Layer kind  | Matches                    |
//! |------------------------------|-------------|----------------------------|
//! | `get`, `post`, ... `method`  | route       | whole path, one method     |
//! | `all`                        | route       | whole path, any method     |
//! | `use_handler`, `use_at`      | middleware  | path prefix, any method    |
//!
//! Registration arguments flatten through [`IntoStack`], so a handler, a
//! tuple of handlers, a `Vec`, or a whole router can be passed anywhere a
//! stack is expected. Routers passed to `use_at` are copied in through
//! [`Mountable`].
//!
//! ## Dispatch
//!
//! [`Router::dispatch`] runs one request and reports a [`DispatchOutcome`].
//! [`Router::handle`] wraps it for `http` requests and responses.

mod dispatch;
mod export;
mod layer;
mod methods;
mod options;
mod params;
mod route;
mod router;
mod stack;

pub use dispatch::DispatchOutcome;
pub use layer::Layer;
pub use methods::{METHODS, is_known};
pub use options::RouterOptions;
pub use params::ParamTable;
pub use route::Route;
pub use router::Router;
pub use stack::{IntoStack, Mountable, Stage, flatten};
#[doc(hidden)]
pub use stack::{HandlerStage, MountStage, OptionalStage, SeqStage};
