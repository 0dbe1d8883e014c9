//! Unit-of-work trait and implementations.
//!
//! This module defines the [`Work`] trait that the timing wrapper invokes, along with
//! [`Named`], which turns any closure or function into a named unit of work.

use std::borrow::Cow;

/// An invokable unit of work, identified by a name and called with an argument tuple.
///
/// `Args` is always a tuple: `()` for no arguments, `(A,)` for one, `(A, B)` for two and
/// so on, up to 8 arguments.
///
/// You rarely implement this trait by hand. Wrap a closure or function with [`named`]:
///
/// ```
/// use gatherx::{named, Work};
///
/// let mut add = named("add", |a: i32, b: i32| a + b);
///
/// assert_eq!(add.name(), "add");
/// assert_eq!(add.invoke((2, 3)), 5);
/// ```
///
/// Implement it directly when a type carries its own state:
///
/// ```
/// use gatherx::Work;
///
/// struct Counter(u32);
///
/// impl Work<(u32,)> for Counter {
///     type Output = u32;
///
///     fn name(&self) -> &str {
///         "counter"
///     }
///
///     fn invoke(&mut self, (step,): (u32,)) -> u32 {
///         self.0 += step;
///         self.0
///     }
/// }
/// ```
pub trait Work<Args> {
    type Output;

    /// Identity used when reporting this unit of work.
    fn name(&self) -> &str;

    fn invoke(&mut self, args: Args) -> Self::Output;
}

impl<W, Args> Work<Args> for &mut W
where
    W: Work<Args> + ?Sized,
{
    type Output = W::Output;

    fn name(&self) -> &str {
        (**self).name()
    }

    fn invoke(&mut self, args: Args) -> Self::Output {
        (**self).invoke(args)
    }
}

/// A closure or function paired with the name it reports under.
#[derive(Clone)]
pub struct Named<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> Named<F> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn into_inner(self) -> F {
        self.f
    }
}

impl<F> std::fmt::Debug for Named<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Named").field("name", &self.name).finish()
    }
}

/// Give a closure or function a name so it can be timed.
pub fn named<F>(name: impl Into<Cow<'static, str>>, f: F) -> Named<F> {
    Named {
        name: name.into(),
        f,
    }
}

macro_rules! impl_work_for_named {
    ($($A:ident),*) => {
        impl<F, Out, $($A),*> Work<($($A,)*)> for Named<F>
        where
            F: FnMut($($A),*) -> Out,
        {
            type Output = Out;

            fn name(&self) -> &str {
                &self.name
            }

            #[allow(non_snake_case)]
            fn invoke(&mut self, ($($A,)*): ($($A,)*)) -> Out {
                (self.f)($($A),*)
            }
        }
    };
}

impl_work_for_named!();
impl_work_for_named!(A);
impl_work_for_named!(A, B);
impl_work_for_named!(A, B, C);
impl_work_for_named!(A, B, C, D);
impl_work_for_named!(A, B, C, D, E);
impl_work_for_named!(A, B, C, D, E, G);
impl_work_for_named!(A, B, C, D, E, G, H);
impl_work_for_named!(A, B, C, D, E, G, H, I);
