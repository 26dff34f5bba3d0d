//! Handler contract and registration-time adapters.
//!
//! Every callable is erased into an `Arc<dyn Handler>` that takes the ordered
//! string captures and returns an [`Outcome`]. Plain closures are adapted
//! through [`IntoHandler`]:
//!
//! ```ignore
//! registry.register_handler(descriptor, || "no arguments")?;
//! registry.register_handler(descriptor, |name: String| format!("hi {name}"))?;
//! registry.register_handler(descriptor, |a: String, b: String| -> Result<String, String> {
//!     Ok(a + &b)
//! })?;
//! registry.register_handler(descriptor, |args: Vec<String>| args.join(","))?;
//! ```
//!
//! Fixed-arity closures report their parameter count so the registry can
//! reject a template that captures a different number of arguments.

use std::fmt::Display;
use std::marker::PhantomData;
use std::sync::Arc;

/// Result of invoking a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The handler produced nothing; responds 200 with an empty body.
    Empty,
    /// The handler produced a value; responds 200 with the value as body.
    Value(String),
    /// The handler reported a failure; responds 500 with the description.
    Failure(String),
}

/// Conversion from a handler's return value into an [`Outcome`].
pub trait IntoOutcome {
    fn into_outcome(self) -> Outcome;
}

impl IntoOutcome for Outcome {
    fn into_outcome(self) -> Outcome {
        self
    }
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Outcome {
        Outcome::Empty
    }
}

impl IntoOutcome for String {
    fn into_outcome(self) -> Outcome {
        Outcome::Value(self)
    }
}

impl IntoOutcome for &'static str {
    fn into_outcome(self) -> Outcome {
        Outcome::Value(self.to_string())
    }
}

impl<T, E> IntoOutcome for Result<T, E>
where
    T: IntoOutcome,
    E: Display,
{
    fn into_outcome(self) -> Outcome {
        match self {
            Ok(value) => value.into_outcome(),
            Err(e) => Outcome::Failure(e.to_string()),
        }
    }
}

/// Uniform calling convention for registered handlers.
pub trait Handler: Send + Sync {
    /// Number of positional arguments, or `None` if any count is accepted.
    fn arity(&self) -> Option<usize>;

    /// Invoke with the ordered captures (path captures, then body captures).
    fn call(&self, args: Vec<String>) -> Outcome;
}

pub type BoxedHandler = Arc<dyn Handler>;

/// Marker for handlers taking the whole argument list.
#[derive(Debug, Clone, Copy)]
pub struct Variadic;

/// Adapts a callable into a [`BoxedHandler`].
///
/// `Args` only disambiguates the implementations; callers never name it.
pub trait IntoHandler<Args>: Send + Sync + 'static {
    fn into_handler(self) -> BoxedHandler;
}

impl IntoHandler<BoxedHandler> for BoxedHandler {
    fn into_handler(self) -> BoxedHandler {
        self
    }
}

/// A closure together with the argument shape it was adapted from.
struct FnHandler<F, Args> {
    f: F,
    _args: PhantomData<fn() -> Args>,
}

impl<F, R> Handler for FnHandler<F, Variadic>
where
    F: Fn(Vec<String>) -> R + Send + Sync + 'static,
    R: IntoOutcome,
{
    fn arity(&self) -> Option<usize> {
        None
    }

    fn call(&self, args: Vec<String>) -> Outcome {
        (self.f)(args).into_outcome()
    }
}

impl<F, R> IntoHandler<Variadic> for F
where
    F: Fn(Vec<String>) -> R + Send + Sync + 'static,
    R: IntoOutcome,
{
    fn into_handler(self) -> BoxedHandler {
        Arc::new(FnHandler::<F, Variadic> {
            f: self,
            _args: PhantomData,
        })
    }
}

macro_rules! fixed_arity {
    (@string $arg:ident) => { String };
    ($count:literal; $($arg:ident),*) => {
        impl<F, R> Handler for FnHandler<F, ($(fixed_arity!(@string $arg),)*)>
        where
            F: Fn($(fixed_arity!(@string $arg)),*) -> R + Send + Sync + 'static,
            R: IntoOutcome,
        {
            fn arity(&self) -> Option<usize> {
                Some($count)
            }

            #[allow(unused_mut, unused_variables)]
            fn call(&self, args: Vec<String>) -> Outcome {
                let mut args = args.into_iter();
                $(let $arg = args.next().unwrap_or_default();)*
                (self.f)($($arg),*).into_outcome()
            }
        }

        impl<F, R> IntoHandler<($(fixed_arity!(@string $arg),)*)> for F
        where
            F: Fn($(fixed_arity!(@string $arg)),*) -> R + Send + Sync + 'static,
            R: IntoOutcome,
        {
            fn into_handler(self) -> BoxedHandler {
                Arc::new(FnHandler::<F, ($(fixed_arity!(@string $arg),)*)> {
                    f: self,
                    _args: PhantomData,
                })
            }
        }
    };
}

fixed_arity!(0;);
fixed_arity!(1; a);
fixed_arity!(2; a, b);
fixed_arity!(3; a, b, c);
fixed_arity!(4; a, b, c, d);
fixed_arity!(5; a, b, c, d, e);
fixed_arity!(6; a, b, c, d, e, f);
