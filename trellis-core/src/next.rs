//! The `next` continuation.
//!
//! Handlers that take a [`Next`] decide how dispatch proceeds:
//!
//! | call                 | effect                                        |
//! |----------------------|-----------------------------------------------|
//! | [`Next::proceed`]    | run the following handler or layer            |
//! | [`Next::route`]      | skip the rest of the current layer            |
//! | [`Next::router`]     | leave the current router entirely             |
//! | [`Next::fail`]       | hand an error to the next error handler       |
//!
//! Only the first call on any clone counts. A handler that finishes without
//! calling `next` and without a live clone is treated as having resolved the
//! response.

use crate::{
    error::{BoxError, Error},
    response::Response,
};
use futures::channel::oneshot;
use std::sync::{Arc, Mutex, PoisonError};

/// The signal a handler passes to `next`.
#[derive(Debug, Clone)]
pub enum Control {
    /// `next()`: continue with the following handler.
    Continue,
    /// `next("route")`: skip the remaining handlers of this layer.
    Route,
    /// `next("router")`: exit the current router.
    Router,
    /// `next(err)`: an error is now pending.
    Error(Error),
}

/// A cloneable handle used by a handler to signal the dispatcher.
#[derive(Debug, Clone)]
pub struct Next {
    slot: Arc<Mutex<Option<oneshot::Sender<Control>>>>,
}

impl Next {
    /// Create a connected continuation and the dispatcher's side of it.
    pub fn channel() -> (Next, NextSignal) {
        let (sender, receiver) = oneshot::channel();
        let next = Next {
            slot: Arc::new(Mutex::new(Some(sender))),
        };
        (next, NextSignal { receiver })
    }

    /// Signal `control`. Returns `false` if `next` was already called.
    pub fn call(&self, control: Control) -> bool {
        let sender = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match sender {
            // The receiver is gone only if dispatch was cancelled.
            Some(sender) => sender.send(control).is_ok(),
            None => false,
        }
    }

    /// Continue with the next handler.
    pub fn proceed(&self) {
        self.call(Control::Continue);
    }

    /// Skip to the next layer.
    pub fn route(&self) {
        self.call(Control::Route);
    }

    /// Exit the current router.
    pub fn router(&self) {
        self.call(Control::Router);
    }

    /// Pass an error down the chain.
    pub fn fail(&self, err: impl Into<BoxError>) {
        self.call(Control::Error(Error::new(err)));
    }

    /// Returns `true` once any clone has been called.
    pub fn is_called(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

/// The dispatcher's end of a [`Next`].
#[derive(Debug)]
pub struct NextSignal {
    receiver: oneshot::Receiver<Control>,
}

impl NextSignal {
    /// Resolve what the handler asked for once its future has completed.
    ///
    /// Returns `None` when `next` was never called: either every clone was
    /// dropped, or a clone is still alive but `response` has already ended.
    /// Otherwise waits for the outstanding clone to be called or dropped.
    pub async fn settle(mut self, response: &Response) -> Option<Control> {
        match self.receiver.try_recv() {
            Ok(Some(control)) => Some(control),
            Ok(None) if response.ended() => None,
            Ok(None) => self.receiver.await.ok(),
            Err(oneshot::Canceled) => None,
        }
    }
}
