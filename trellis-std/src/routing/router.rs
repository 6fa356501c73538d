//! Router registration.

use super::{
    layer::Layer,
    methods::for_each_verb,
    options::RouterOptions,
    params::ParamTable,
    route::Route,
    stack::{IntoStack, Stage, flatten},
};
use crate::{error::RouterError, path::PathPattern};
use http::Method;
use std::{future::Future, sync::Arc};
use trellis_core::{IntoOutcome, Next, ParamCallback, Request, Response};

/// An ordered list of layers plus the param callbacks that go with them.
///
/// Registration happens up front through `&mut self`; dispatch only needs
/// `&self`, so a finished router can be shared behind an [`Arc`] by any
/// number of concurrent requests.
///
/// # Example
///
/// ```rust,ignore
/// let mut router = Router::new();
/// router
///     .use_handler(logger())
///     .get("/users/:id", |req: Request, res: Response| {
///         res.send(req.param("id").unwrap_or_default());
///     });
/// ```
#[derive(Debug, Clone, Default)]
pub struct Router {
    pub(crate) layers: Vec<Layer>,
    pub(crate) params: Arc<ParamTable>,
    pub(crate) options: RouterOptions,
}

impl Router {
    /// Create an empty router with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty router with the given options.
    pub fn with_options(options: RouterOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// The options this router matches with.
    pub fn router_options(&self) -> RouterOptions {
        self.options
    }

    /// Register a layer. Every other registration method funnels into this.
    ///
    /// Middleware gets one layer per handler, and mounted routers are spliced
    /// in place. A route gets a single layer holding all of its handlers.
    ///
    /// # Panics
    ///
    /// If a route (`middleware == false`) is given a router to mount.
    #[track_caller]
    pub fn add_layer<M>(
        &mut self,
        method: Option<&str>,
        middleware: bool,
        pattern: impl Into<PathPattern>,
        stack: impl IntoStack<M>,
    ) -> &mut Self {
        let pattern = pattern.into();
        let stages = flatten(stack, &pattern);

        #[cfg(feature = "tracing")]
        tracing::trace!(%pattern, ?method, middleware, stages = stages.len(), "registering");

        if middleware {
            for stage in stages {
                match stage {
                    Stage::Handler(handler) => {
                        let layer = Layer::new(pattern.clone(), None, true, vec![handler]);
                        self.layers.push(layer);
                    }
                    Stage::Mount(layers) => self.layers.extend(layers),
                }
            }
            return self;
        }

        let handlers: Vec<_> = stages
            .into_iter()
            .map(|stage| match stage {
                Stage::Handler(handler) => handler,
                Stage::Mount(_) => {
                    panic!("a router cannot be a route handler; mount it with `use_at` instead")
                }
            })
            .collect();
        self.layers.push(Layer::new(pattern, method, false, handlers));
        self
    }

    /// Register a route that answers every method.
    #[track_caller]
    pub fn all<M>(
        &mut self,
        pattern: impl Into<PathPattern>,
        stack: impl IntoStack<M>,
    ) -> &mut Self {
        self.add_layer(None, false, pattern, stack)
    }

    /// Register a route for an arbitrary method name.
    ///
    /// The name is trimmed and upper-cased; it must be a valid HTTP token.
    #[track_caller]
    pub fn method<M>(
        &mut self,
        name: &str,
        pattern: impl Into<PathPattern>,
        stack: impl IntoStack<M>,
    ) -> Result<&mut Self, RouterError> {
        let method = normalize_method(name)?;
        Ok(self.add_layer(Some(&method), false, pattern, stack))
    }

    /// Register middleware on every path.
    pub fn use_handler<M>(&mut self, stack: impl IntoStack<M>) -> &mut Self {
        self.add_layer(None, true, "/", stack)
    }

    /// Register middleware, or mount routers, under `pattern`.
    pub fn use_at<M>(
        &mut self,
        pattern: impl Into<PathPattern>,
        stack: impl IntoStack<M>,
    ) -> &mut Self {
        self.add_layer(None, true, pattern, stack)
    }

    /// Register a callback for the route parameter `name`.
    ///
    /// Within one request it runs at most once per distinct value.
    pub fn param<F, Fut, R>(&mut self, name: impl Into<String>, callback: F) -> &mut Self
    where
        F: Fn(Request, Response, Next, String, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoOutcome,
    {
        Arc::make_mut(&mut self.params).push(name, ParamCallback::new(callback));
        self
    }

    /// Register the same callback under several parameter names.
    pub fn params<I, F, Fut, R>(&mut self, names: I, callback: F) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        F: Fn(Request, Response, Next, String, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoOutcome,
    {
        let callback = ParamCallback::new(callback);
        let table = Arc::make_mut(&mut self.params);
        for name in names {
            table.push(name, callback.clone());
        }
        self
    }

    /// A facade for registering several methods on one pattern.
    pub fn route(&mut self, pattern: impl Into<PathPattern>) -> Route<'_> {
        Route::new(self, pattern.into())
    }

    /// All layers, in registration order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// The param callbacks registered on this router.
    pub fn param_table(&self) -> &ParamTable {
        &self.params
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if no layers are registered.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

fn normalize_method(name: &str) -> Result<String, RouterError> {
    let upper = name.trim().to_ascii_uppercase();
    match Method::from_bytes(upper.as_bytes()) {
        Ok(_) if !upper.is_empty() => Ok(upper),
        _ => Err(RouterError::InvalidMethod(name.to_string())),
    }
}

macro_rules! router_verbs {
    ($($name:ident => $verb:literal),* $(,)?) => {
        impl Router {
            $(
                #[doc = concat!("Register a `", $verb, "` route.")]
                #[track_caller]
                pub fn $name<M>(
                    &mut self,
                    pattern: impl Into<PathPattern>,
                    stack: impl IntoStack<M>,
                ) -> &mut Self {
                    self.add_layer(Some($verb), false, pattern, stack)
                }
            )*
        }
    };
}

for_each_verb!(router_verbs);
