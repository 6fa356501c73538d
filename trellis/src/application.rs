//! The top-level application object.

use crate::settings::Settings;
use serde_json::{Map, Value};
use std::{
    fmt,
    ops::{Deref, DerefMut},
    sync::Arc,
};
use trellis_std::{Layer, Mountable, Router, RouterOptions, path::PathPattern};

type MountListener = dyn Fn(&Application) + Send + Sync;

/// A [`Router`] plus the application-level state that goes with it.
///
/// Every registration method of [`Router`] is available through `Deref`, so
/// an application is built the same way a router is. On top of that it owns
/// a [`Settings`] map, free-form `locals`, and the path it was mounted at.
///
/// # Example
///
/// ```rust,ignore
/// let mut admin = Application::new();
/// admin.on_mount(|parent| tracing::info!(parent = %parent.path(), "admin mounted"));
/// admin.get("/", |req: Request, res: Response| res.send(req.base_url()));
///
/// let mut app = Application::new();
/// app.mount("/admin", &mut admin);
/// assert_eq!(admin.path(), "/admin");
/// ```
#[derive(Clone)]
pub struct Application {
    router: Router,
    settings: Settings,
    locals: Map<String, Value>,
    mountpath: PathPattern,
    mount_listeners: Vec<Arc<MountListener>>,
}

impl Default for Application {
    fn default() -> Self {
        Self::with_options(RouterOptions::default())
    }
}

impl Application {
    /// Create an application with default router options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an application whose router matches with `options`.
    pub fn with_options(options: RouterOptions) -> Self {
        Self {
            router: Router::with_options(options),
            settings: Settings::new(),
            locals: Map::new(),
            mountpath: PathPattern::default(),
            mount_listeners: Vec::new(),
        }
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// The settings map.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable access to the settings map.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Set a setting.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        self.settings.set(name, value);
        self
    }

    /// Look up a setting.
    pub fn setting(&self, name: &str) -> Option<&Value> {
        self.settings.get(name)
    }

    /// Set a setting to `true`.
    pub fn enable(&mut self, name: &str) -> &mut Self {
        self.settings.enable(name);
        self
    }

    /// Set a setting to `false`.
    pub fn disable(&mut self, name: &str) -> &mut Self {
        self.settings.disable(name);
        self
    }

    /// Returns `true` if the setting is `true`.
    pub fn enabled(&self, name: &str) -> bool {
        self.settings.enabled(name)
    }

    /// Returns `true` if the setting is `false`.
    pub fn disabled(&self, name: &str) -> bool {
        self.settings.disabled(name)
    }

    /// Application-wide values for templates and handlers.
    pub fn locals(&self) -> &Map<String, Value> {
        &self.locals
    }

    /// Mutable access to the locals.
    pub fn locals_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.locals
    }

    // ========================================================================
    // Mounting
    // ========================================================================

    /// The pattern this application was last mounted at. `/` until mounted.
    pub fn mountpath(&self) -> &PathPattern {
        &self.mountpath
    }

    /// The mount path as a string; several patterns are joined with `,`.
    pub fn path(&self) -> String {
        self.mountpath.to_string()
    }

    /// Register a listener called with the parent whenever this
    /// application is mounted through [`mount`](Self::mount).
    pub fn on_mount<F>(&mut self, listener: F) -> &mut Self
    where
        F: Fn(&Application) + Send + Sync + 'static,
    {
        self.mount_listeners.push(Arc::new(listener));
        self
    }

    /// Mount `child` under `pattern`.
    ///
    /// The child's layers are copied in as with [`Router::use_at`]; the child
    /// then records `pattern` as its mount path and its mount listeners run.
    pub fn mount(
        &mut self,
        pattern: impl Into<PathPattern>,
        child: &mut Application,
    ) -> &mut Self {
        let pattern = pattern.into();

        #[cfg(feature = "tracing")]
        tracing::debug!(%pattern, layers = child.router.len(), "mounting application");

        self.router.use_at(pattern.clone(), &child.router);
        child.mountpath = pattern;
        for listener in &child.mount_listeners {
            listener(&*self);
        }
        self
    }

    /// The underlying router.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Mutable access to the underlying router.
    pub fn router_mut(&mut self) -> &mut Router {
        &mut self.router
    }

    /// Take the router out, dropping the application state.
    pub fn into_router(self) -> Router {
        self.router
    }
}

impl Deref for Application {
    type Target = Router;

    fn deref(&self) -> &Router {
        &self.router
    }
}

impl DerefMut for Application {
    fn deref_mut(&mut self) -> &mut Router {
        &mut self.router
    }
}

impl Mountable for Application {
    fn export(&self, at: &PathPattern) -> Vec<Layer> {
        self.router.export(at.clone())
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("router", &self.router)
            .field("settings", &self.settings)
            .field("locals", &self.locals)
            .field("mountpath", &self.mountpath)
            .field("mount_listeners", &self.mount_listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;
    use trellis_core::{Request, Response};

    #[test]
    fn test_settings_chain() {
        let mut app = Application::new();
        app.set("title", "demo").enable("x-powered-by").disable("etag");
        assert_eq!(app.setting("Title"), Some(&json!("demo")));
        assert!(app.enabled("x-powered-by"));
        assert!(app.disabled("etag"));
    }

    #[test]
    fn test_mount_records_path_and_notifies() {
        let parents = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&parents);

        let mut child = Application::new();
        child.on_mount(move |parent| {
            seen.lock().unwrap().push(parent.setting("name").cloned());
        });
        child.get("/stats", |_req: Request, res: Response| res.send("ok"));

        let mut app = Application::new();
        app.set("name", "root");
        app.mount("/admin", &mut child);

        assert_eq!(child.path(), "/admin");
        assert_eq!(*parents.lock().unwrap(), [Some(json!("root"))]);
        assert_eq!(app.layers()[0].pattern().to_string(), "/admin/stats");
    }

    #[test]
    fn test_path_joins_several_patterns() {
        let mut child = Application::new();
        assert_eq!(child.path(), "/");
        Application::new().mount(["/a", "/b"], &mut child);
        assert_eq!(child.path(), "/a,/b");
    }

    #[test]
    fn test_use_at_accepts_applications() {
        let mut child = Application::new();
        child.get("/x", |_req: Request, res: Response| res.send("x"));
        let mut app = Application::new();
        app.use_at("/c", &child);
        assert_eq!(app.len(), 1);
        assert_eq!(child.path(), "/");
    }

    #[test]
    fn test_locals() {
        let mut app = Application::new();
        app.locals_mut().insert("site".into(), json!("trellis"));
        assert_eq!(app.locals()["site"], "trellis");
    }
}
