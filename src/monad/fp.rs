// The abstraction seam every concrete monad implements. The base
// container in container.rs is the reference implementor; variants bring
// their own pre/post behavior and keep the laws below:
// - left identity: wrapping values and unwrapping them yields the
//   original values.
// - right identity: chaining identity onto a monad yields the same monad.
// - associativity: bind(f) then bind(g) is equivalent to a single
//   bind(compose(f, g)).
use super::error::MonadError;
use crate::common::Fields;
use mockall::automock;

pub trait Unit: Sized {
    /// Wrap the values into this monad. a -> M a.
    fn unit(fields: Fields) -> Self;
}

// Clippy accidentally thinks [automock] is an index expression.
#[allow(clippy::indexing_slicing)]
mod trait_mod {
    use super::*;

    // A named, reusable bind step. Plain closures go straight into
    // Bind::bind; this seam is for steps that carry state or get mocked.
    #[automock]
    pub trait Step {
        fn run(&self, fields: &mut Fields) -> Result<(), MonadError>;
    }
}

pub use self::trait_mod::{MockStep, Step};

pub trait Bind: Unit {
    /// Return the wrapped values. M a -> a.
    fn unwrap(&self) -> Result<Fields, MonadError>;

    /// Apply the function `f` to the monad and produce the next monad in
    /// the chain.
    ///
    /// The step receives a mutable view of a copy of the current values;
    /// whatever it leaves in the mapping becomes the state of the
    /// returned monad, which is always a fresh instance. The receiver is
    /// never touched. An `Err` from the step surfaces unchanged and no
    /// monad is produced.
    fn bind<F>(&self, f: F) -> Result<Self, MonadError>
    where
        F: FnOnce(&mut Fields) -> Result<(), MonadError>,
    {
        let mut fields = self.unwrap()?;
        self.pre();
        f(&mut fields)?;
        self.post();
        Ok(Self::unit(fields))
    }

    /// Return myself. Fulfills the right identity law.
    fn identity(&self) -> &Self {
        self
    }

    // Hooks running before and after every bound step. Inert here;
    // concrete monads override them. post does not run when the step
    // fails.
    fn pre(&self) {}
    fn post(&self) {}

    fn bind_step(&self, step: &dyn Step) -> Result<Self, MonadError> {
        self.bind(|fields| step.run(fields))
    }
}

/// One step running `f` then `g` over the same mapping. Chaining
/// `bind(f)` then `bind(g)` is observably equivalent to
/// `bind(compose(f, g))`.
pub fn compose<F, G>(f: F, g: G) -> impl FnOnce(&mut Fields) -> Result<(), MonadError>
where
    F: FnOnce(&mut Fields) -> Result<(), MonadError>,
    G: FnOnce(&mut Fields) -> Result<(), MonadError>,
{
    move |fields| {
        f(fields)?;
        g(fields)
    }
}
