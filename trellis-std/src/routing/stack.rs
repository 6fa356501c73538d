//! Flattening of registration arguments.
//!
//! Every registration call takes a single "stack" argument that may nest:
//! a handler, a closure, a [`Vec`] or array of stacks, an [`Option`] (where
//! `None` contributes nothing), a tuple of stacks, or a [`Mountable`] such as
//! a [`Router`](super::Router). Flattening walks it depth-first, left to
//! right.

use super::layer::Layer;
use crate::path::PathPattern;
use trellis_core::{Handler, IntoHandler};

/// One element of a flattened stack.
#[derive(Debug)]
pub enum Stage {
    /// A handler to attach to a layer.
    Handler(Handler),
    /// Layers exported from a mounted router, already rebased.
    Mount(Vec<Layer>),
}

/// Something whose layers can be spliced into a parent router.
pub trait Mountable {
    /// Return copies of all layers, rebased under `at`.
    fn export(&self, at: &PathPattern) -> Vec<Layer>;
}

impl<T: Mountable + ?Sized> Mountable for &T {
    fn export(&self, at: &PathPattern) -> Vec<Layer> {
        (**self).export(at)
    }
}

impl<T: Mountable + ?Sized> Mountable for &mut T {
    fn export(&self, at: &PathPattern) -> Vec<Layer> {
        (**self).export(at)
    }
}

/// Conversion of a registration argument into stages.
///
/// `M` is an inferred marker, as with [`IntoHandler`].
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be registered on a router",
    label = "not a handler, list of handlers or router"
)]
pub trait IntoStack<M> {
    /// Append this argument's stages to `out`. `at` is the pattern being
    /// registered, needed to rebase mounted routers.
    fn into_stack(self, at: &PathPattern, out: &mut Vec<Stage>);
}

#[doc(hidden)]
pub struct HandlerStage<M>(M);
#[doc(hidden)]
pub struct MountStage;
#[doc(hidden)]
pub struct SeqStage<M>(M);
#[doc(hidden)]
pub struct OptionalStage<M>(M);

impl<H, M> IntoStack<HandlerStage<M>> for H
where
    H: IntoHandler<M>,
{
    fn into_stack(self, _at: &PathPattern, out: &mut Vec<Stage>) {
        out.push(Stage::Handler(self.into_handler()));
    }
}

impl<T: Mountable> IntoStack<MountStage> for T {
    fn into_stack(self, at: &PathPattern, out: &mut Vec<Stage>) {
        out.push(Stage::Mount(self.export(at)));
    }
}

impl<T, M> IntoStack<SeqStage<M>> for Vec<T>
where
    T: IntoStack<M>,
{
    fn into_stack(self, at: &PathPattern, out: &mut Vec<Stage>) {
        for item in self {
            item.into_stack(at, out);
        }
    }
}

impl<T, M, const N: usize> IntoStack<SeqStage<M>> for [T; N]
where
    T: IntoStack<M>,
{
    fn into_stack(self, at: &PathPattern, out: &mut Vec<Stage>) {
        for item in self {
            item.into_stack(at, out);
        }
    }
}

impl<T, M> IntoStack<OptionalStage<M>> for Option<T>
where
    T: IntoStack<M>,
{
    fn into_stack(self, at: &PathPattern, out: &mut Vec<Stage>) {
        if let Some(item) = self {
            item.into_stack(at, out);
        }
    }
}

macro_rules! tuple_stack {
    ($($ty:ident / $marker:ident),+) => {
        impl<$($ty, $marker),+> IntoStack<($($marker,)+)> for ($($ty,)+)
        where
            $($ty: IntoStack<$marker>),+
        {
            #[allow(non_snake_case)]
            fn into_stack(self, at: &PathPattern, out: &mut Vec<Stage>) {
                let ($($ty,)+) = self;
                $($ty.into_stack(at, out);)+
            }
        }
    };
}

tuple_stack!(A / MA);
tuple_stack!(A / MA, B / MB);
tuple_stack!(A / MA, B / MB, C / MC);
tuple_stack!(A / MA, B / MB, C / MC, D / MD);
tuple_stack!(A / MA, B / MB, C / MC, D / MD, E / ME);
tuple_stack!(A / MA, B / MB, C / MC, D / MD, E / ME, F / MF);
tuple_stack!(A / MA, B / MB, C / MC, D / MD, E / ME, F / MF, G / MG);
tuple_stack!(A / MA, B / MB, C / MC, D / MD, E / ME, F / MF, G / MG, H / MH);

/// Flatten `stack` registered at `at`.
pub fn flatten<M>(stack: impl IntoStack<M>, at: &PathPattern) -> Vec<Stage> {
    let mut out = Vec::new();
    stack.into_stack(at, &mut out);
    out
}
