//! Session-scoped key/value storage shared by every story of a session.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{StoryError, StoryResult};

/// A mutable store of named values outliving any single story.
///
/// Values are kept as JSON values, so the store itself does not enforce a
/// type per slot. A read decodes the stored value into the requested type and
/// fails with [`StoryError::SlotType`] when the shapes disagree. Values whose
/// JSON form would not read back as the same type, such as non-finite floats,
/// are refused with [`StoryError::UnstorableValue`].
#[derive(Debug, Default)]
pub struct Environment {
    slots: RefCell<HashMap<String, Value>>,
}

impl Environment {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a slot, initializing it to `default` on first access.
    ///
    /// Once a slot holds a value, `default` is ignored.
    pub fn get<T>(&self, name: &str, default: T) -> StoryResult<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let mut slots = self.slots.borrow_mut();
        match slots.get(name) {
            Some(value) => decode(name, value.clone()),
            None => {
                slots.insert(name.to_string(), encode::<T>(name, &default)?);
                Ok(default)
            }
        }
    }

    /// Read a slot that must already hold a value.
    pub fn get_required<T>(&self, name: &str) -> StoryResult<T>
    where
        T: DeserializeOwned,
    {
        let value = self
            .slots
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| StoryError::NoDefaultProvided(name.to_string()))?;
        decode(name, value)
    }

    /// Overwrite a slot.
    pub fn set<T>(&self, name: &str, value: T) -> StoryResult<()>
    where
        T: Serialize + DeserializeOwned,
    {
        let value = encode::<T>(name, &value)?;
        self.slots.borrow_mut().insert(name.to_string(), value);
        Ok(())
    }

    /// Whether the slot holds a value.
    pub fn contains(&self, name: &str) -> bool {
        self.slots.borrow().contains_key(name)
    }

    /// Remove a slot, returning its raw value.
    pub fn remove(&self, name: &str) -> Option<Value> {
        self.slots.borrow_mut().remove(name)
    }

    /// Names of all slots, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.slots.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// A sorted copy of every slot.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.slots
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Drop every slot.
    pub fn clear(&self) {
        self.slots.borrow_mut().clear();
    }

    /// A typed handle on a single slot.
    pub fn slot<T>(&self, name: impl Into<String>) -> Slot<T> {
        Slot {
            name: name.into(),
            default: None,
            _marker: PhantomData,
        }
    }
}

/// Encode `value`, refusing it unless the result decodes back into `T`.
fn encode<T: Serialize + DeserializeOwned>(name: &str, value: &T) -> StoryResult<Value> {
    let unstorable = |source| StoryError::UnstorableValue {
        name: name.to_string(),
        source,
    };
    let encoded = serde_json::to_value(value).map_err(unstorable)?;
    T::deserialize(&encoded).map_err(unstorable)?;
    Ok(encoded)
}

fn decode<T: DeserializeOwned>(name: &str, value: Value) -> StoryResult<T> {
    serde_json::from_value(value).map_err(|source| StoryError::SlotType {
        name: name.to_string(),
        source,
    })
}

/// A named, typed view of one environment slot.
///
/// Stories declare the state they share through slots instead of repeating
/// slot names and defaults at every access.
#[derive(Debug, Clone)]
pub struct Slot<T> {
    name: String,
    default: Option<T>,
    _marker: PhantomData<T>,
}

impl<T> Slot<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Provide the value the slot takes on first read.
    pub fn with_default(mut self, default: T) -> Self {
        self.default = Some(default);
        self
    }

    /// The slot name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the slot from `env`.
    pub fn get(&self, env: &Environment) -> StoryResult<T> {
        match &self.default {
            Some(default) => env.get(&self.name, default.clone()),
            None => env.get_required(&self.name),
        }
    }

    /// Write the slot in `env`.
    pub fn set(&self, env: &Environment, value: T) -> StoryResult<()> {
        env.set(&self.name, value)
    }
}
