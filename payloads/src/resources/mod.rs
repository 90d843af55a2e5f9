//! Descriptors binding each entity type to its backend collection.
//!
//! A [`Resource`] knows its endpoint paths, the keys its collection and single
//! items are wrapped under in the response envelope, and how raw records are
//! normalised before typed decoding. Capabilities that only some collections
//! have are separate traits.

pub mod admin;
pub mod announcement;
pub mod application;
pub mod blog;
pub mod contact;
pub mod event;
pub mod mentor;
pub mod program;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::fmt::Debug;

use crate::{EntityId, requests::Validate};

pub trait Resource:
    Debug + Clone + PartialEq + DeserializeOwned + Send + Sync + 'static
{
    /// Path segment of the collection, relative to the API base.
    const PATH: &'static str;
    /// Key of the item array in a list response.
    const COLLECTION_KEY: &'static str;
    /// Key of the single item in a get/create/update response.
    const ITEM_KEY: &'static str;
    /// Singular human name, used in messages.
    const LABEL: &'static str;

    type Filters: Debug
        + Clone
        + Default
        + PartialEq
        + Serialize
        + Send
        + Sync
        + 'static;
    type Draft: Debug + Serialize + Validate + Send + Sync;

    fn id(&self) -> &EntityId;

    fn list_path() -> String {
        Self::PATH.to_string()
    }

    fn item_path(id: &EntityId) -> String {
        format!("{}/{id}", Self::PATH)
    }

    fn create_path() -> String {
        Self::list_path()
    }

    /// Fix up a raw record before it is decoded.
    fn normalize(raw: &mut Value) {
        normalize_id(raw);
    }
}

/// Collections whose records can be edited and deleted.
pub trait Editable: Resource {
    type Patch: Debug + Serialize + Validate + Send + Sync;
}

/// Collections with a status-only endpoint taking `{isActive}`.
pub trait Toggle: Resource {
    fn status_path(id: &EntityId) -> String {
        format!("{}/{id}/status", Self::PATH)
    }

    fn is_active(&self) -> bool;

    fn set_active(&mut self, active: bool);
}

/// Collections with an aggregate overview endpoint.
pub trait HasStats: Resource {
    type Stats: Debug
        + Clone
        + Default
        + PartialEq
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    fn stats_path() -> String {
        format!("{}/stats/overview", Self::PATH)
    }
}

/// Copy a Mongo-style `_id` into `id`; a present `_id` takes precedence.
pub fn normalize_id(raw: &mut Value) {
    let Value::Object(fields) = raw else {
        return;
    };
    let underscore = fields
        .get("_id")
        .filter(|id| !id.is_null() && id.as_str() != Some(""))
        .cloned();
    if let Some(id) = underscore {
        fields.insert("id".into(), id);
    }
}

/// Decode one record, normalising it first.
pub fn decode_item<R: Resource>(mut raw: Value) -> Result<R, serde_json::Error> {
    R::normalize(&mut raw);
    serde_json::from_value(raw)
}

/// Pull a single record out of a response `data` payload, which is either
/// `{<item key>: record}` or the record itself.
pub fn unwrap_item<R: Resource>(data: Value) -> Result<R, serde_json::Error> {
    match data {
        Value::Object(mut fields) => match fields.remove(R::ITEM_KEY) {
            Some(item @ Value::Object(_)) => decode_item(item),
            _ => decode_item(Value::Object(fields)),
        },
        other => decode_item(other),
    }
}

/// Deserialize fields that the backend sometimes sends as `null`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    use serde::Deserialize;
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `rust_decimal::serde::float_option` that also accepts an explicit `null`.
pub(crate) mod float_or_null {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float_option::serialize(value, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Decimal>, D::Error> {
        #[derive(Deserialize)]
        struct Float(#[serde(with = "rust_decimal::serde::float")] Decimal);

        Ok(Option::<Float>::deserialize(deserializer)?.map(|Float(v)| v))
    }
}
