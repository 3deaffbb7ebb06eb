// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The boundary between the registry and the properties it catalogs.
//!
//! Properties are owned by the application. The registry keeps a
//! [`PropertyRef`], a weak reference that never keeps a property alive, and
//! relays change notifications to observers through a [`ChangeRelay`].

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use smallvec::SmallVec;

/// An application-owned value holder that can be registered as a setting.
///
/// The registry never reads or writes property values; it only needs a name
/// for diagnostics and the property's identity.
pub trait Property {
    /// Returns the name of the property.
    fn name(&self) -> &str;
}

/// Identity of a property object.
///
/// Two keys are equal when they were taken from the same live object.
/// A key taken from a dropped property may be reused by a later allocation.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct PropertyKey(usize);

impl PropertyKey {
    /// Returns the key of `property`.
    #[must_use]
    pub fn of(property: &dyn Property) -> Self {
        Self(core::ptr::from_ref(property).cast::<()>().addr())
    }
}

impl fmt::Debug for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyKey({:#x})", self.0)
    }
}

/// A non-owning, liveness-checked reference to a [`Property`].
///
/// Build one from any `&Rc<P>`, or from a `Weak<dyn Property>` when the
/// property is already type-erased:
///
/// ```rust
/// use std::rc::Rc;
/// use understory_settings::{Property, PropertyRef};
///
/// struct Units;
/// impl Property for Units {
///     fn name(&self) -> &str { "units" }
/// }
///
/// let units = Rc::new(Units);
/// let weak = PropertyRef::from(&units);
/// assert_eq!(weak.upgrade().map(|p| p.name().to_owned()).as_deref(), Some("units"));
///
/// drop(units);
/// assert!(weak.upgrade().is_none());
/// ```
#[derive(Clone)]
pub struct PropertyRef(Weak<dyn Property>);

impl PropertyRef {
    /// Returns the property if its owner still holds it.
    #[must_use]
    pub fn upgrade(&self) -> Option<Rc<dyn Property>> {
        self.0.upgrade()
    }

    /// Returns `true` if the property has been dropped by its owner.
    #[must_use]
    pub fn is_dangling(&self) -> bool {
        self.0.strong_count() == 0
    }

    /// Returns `true` if both references point at the same property.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}

impl<P: Property + 'static> From<&Rc<P>> for PropertyRef {
    fn from(property: &Rc<P>) -> Self {
        let weak: Weak<P> = Rc::downgrade(property);
        Self(weak)
    }
}

impl From<Weak<dyn Property>> for PropertyRef {
    fn from(property: Weak<dyn Property>) -> Self {
        Self(property)
    }
}

impl fmt::Debug for PropertyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(property) => f
                .debug_tuple("PropertyRef")
                .field(&property.name())
                .finish(),
            None => f.write_str("PropertyRef(<dropped>)"),
        }
    }
}

/// Event delivered to observers when a property reports a new value.
#[derive(Clone, Copy)]
pub struct PropertyChanged<'a> {
    /// Identity of the changed property.
    pub key: PropertyKey,
    /// The changed property.
    pub property: &'a dyn Property,
}

impl fmt::Debug for PropertyChanged<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyChanged")
            .field("key", &self.key)
            .field("property", &self.property.name())
            .finish()
    }
}

/// Handle returned by [`ChangeRelay::subscribe`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Rc<dyn Fn(&PropertyChanged<'_>)>;

/// Fan-out of property change notifications to observers.
///
/// A relay is shared through an `Rc` by the registry, its properties and any
/// reset callbacks. Notifying walks a snapshot of the observer list, so an
/// observer may subscribe, unsubscribe or notify again while it runs.
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use understory_settings::{ChangeRelay, Property};
///
/// struct Units;
/// impl Property for Units {
///     fn name(&self) -> &str { "units" }
/// }
///
/// let relay = ChangeRelay::new();
/// let seen = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&seen);
/// relay.subscribe(move |_| counter.set(counter.get() + 1));
///
/// relay.notify(&Units);
/// assert_eq!(seen.get(), 1);
/// ```
#[derive(Default)]
pub struct ChangeRelay {
    observers: RefCell<Vec<(ObserverId, Observer)>>,
    next_id: Cell<u64>,
}

impl ChangeRelay {
    /// Creates a relay with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `observer` and returns a handle to remove it later.
    pub fn subscribe(&self, observer: impl Fn(&PropertyChanged<'_>) + 'static) -> ObserverId {
        let id = ObserverId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.observers.borrow_mut().push((id, Rc::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    /// Returns the number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    /// Tells every observer that `property` changed.
    ///
    /// Observers registered during this call are not invoked for it, and
    /// observers removed during this call still are.
    pub fn notify(&self, property: &dyn Property) {
        let event = PropertyChanged {
            key: PropertyKey::of(property),
            property,
        };
        let snapshot: SmallVec<[Observer; 4]> = self
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect();
        tracing::trace!(
            property = property.name(),
            observers = snapshot.len(),
            "relaying property change"
        );
        for observer in snapshot {
            observer(&event);
        }
    }
}

impl fmt::Debug for ChangeRelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeRelay")
            .field("observers", &self.observer_count())
            .finish_non_exhaustive()
    }
}
