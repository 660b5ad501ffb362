use std::{
    any::Any,
    fmt::{self, Formatter},
    sync::Arc,
};

use parking_lot::Mutex;

/// A dynamically typed argument or return value.
///
/// Implemented for every `'static` type that is `Debug + Clone +
/// PartialEq + Send + Sync`. The erased form supports equality,
/// cloning and downcasting so matchers and answers can work on calls
/// whose argument types are only known to the double that received
/// them.
pub trait Value: Any + fmt::Debug + Send + Sync {
    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;

    #[doc(hidden)]
    fn clone_value(&self) -> Box<dyn Value>;

    #[doc(hidden)]
    fn eq_value(&self, other: &dyn Value) -> bool;
}

impl<T> Value for T
where
    T: Any + fmt::Debug + Clone + PartialEq + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_value(&self) -> Box<dyn Value> {
        Box::new(self.clone())
    }

    fn eq_value(&self, other: &dyn Value) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .map_or(false, |other| self == other)
    }
}

impl<'a> dyn Value + 'a {
    /// Returns the value as `T` if that is its concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }
}

impl Clone for Box<dyn Value> {
    fn clone(&self) -> Self {
        (**self).clone_value()
    }
}

/// A shared, mutable cell standing in for a by-reference (output)
/// parameter.
///
/// The double keeps one handle and passes a clone inside a
/// [`Slot::Reference`]; whatever a stub writes into the slot is
/// observed through the double's handle.
///
/// ```
/// use decoy::Reference;
///
/// let value = Reference::new("blah");
/// let handle = value.clone();
/// handle.set(42);
/// assert_eq!(value.get::<i32>(), Some(42));
/// ```
#[derive(Clone)]
pub struct Reference(Arc<Mutex<Box<dyn Value>>>);

impl Reference {
    pub fn new(initial: impl Value) -> Self {
        Reference(Arc::new(Mutex::new(Box::new(initial))))
    }

    /// Returns a copy of the current value if it is a `T`.
    pub fn get<T: Value + Clone>(&self) -> Option<T> {
        self.0.lock().downcast_ref::<T>().cloned()
    }

    /// Overwrites the current value. The new value may be of a
    /// different type than the one it replaces.
    pub fn set(&self, value: impl Value) {
        self.set_value(Box::new(value))
    }

    pub fn set_value(&self, value: Box<dyn Value>) {
        *self.0.lock() = value;
    }

    /// Returns a copy of the current value, whatever its type.
    pub fn to_value(&self) -> Box<dyn Value> {
        self.0.lock().clone()
    }

    /// Runs `f` against the current value without cloning it. The
    /// cell stays locked until `f` returns.
    pub fn with<R>(&self, f: impl FnOnce(&dyn Value) -> R) -> R {
        let value = self.0.lock();
        f(&**value)
    }
}

impl fmt::Debug for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "&{:?}", self.0.lock())
    }
}

/// One argument of an intercepted call.
#[derive(Clone, Debug)]
pub enum Slot {
    /// An argument passed by value. Writes only affect the call
    /// record.
    Value(Box<dyn Value>),
    /// An argument passed by reference. Writes are visible to the
    /// caller.
    Reference(Reference),
}

impl Slot {
    pub fn value(value: impl Value) -> Self {
        Slot::Value(Box::new(value))
    }

    pub fn reference(reference: &Reference) -> Self {
        Slot::Reference(reference.clone())
    }

    /// Runs `f` against the value held by the slot, looking through
    /// references.
    pub fn with<R>(&self, f: impl FnOnce(&dyn Value) -> R) -> R {
        match self {
            Slot::Value(value) => f(&**value),
            Slot::Reference(reference) => reference.with(f),
        }
    }

    /// Returns a copy of the held value. A reference is only locked
    /// for as long as the copy takes.
    pub fn to_value(&self) -> Box<dyn Value> {
        match self {
            Slot::Value(value) => value.clone(),
            Slot::Reference(reference) => reference.to_value(),
        }
    }

    /// Returns a copy of the held value if it is a `T`.
    pub fn get<T: Value + Clone>(&self) -> Option<T> {
        self.with(|value| value.downcast_ref::<T>().cloned())
    }

    /// Overwrites the held value, writing through references.
    pub fn set_value(&mut self, value: Box<dyn Value>) {
        match self {
            Slot::Value(held) => *held = value,
            Slot::Reference(reference) => reference.set_value(value),
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Slot::Reference(_))
    }
}

/// The ordered argument record of a single call.
pub type Arguments = [Slot];

/// Builds a `Vec<Slot>` of by-value arguments.
///
/// Use [`Slot::reference`] for by-reference slots.
///
/// ```
/// use decoy::args;
///
/// let args = args!["bar", "test"];
/// assert_eq!(args.len(), 2);
/// assert_eq!(args[1].get::<&str>(), Some("test"));
/// ```
#[macro_export]
macro_rules! args {
    () => (::std::vec::Vec::<$crate::Slot>::new());
    ($($arg:expr),+ $(,)?) => (
        ::std::vec![$($crate::Slot::value($arg)),+]
    );
}
