use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// Name of the event type that marks products as already bought
pub const PURCHASE_EVENT: &str = "Purchase";

/// A single user behaviour event as posted by the client
///
/// Every field is optional on the wire. Fields with an unexpected JSON type
/// are treated as absent rather than rejecting the whole request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    /// Seconds since the Unix epoch
    #[serde(default, deserialize_with = "lenient")]
    pub timestamp: Option<f64>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub product_ids: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub data: Option<EventData>,
}

/// Nested payload carrying product references
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EventData {
    #[serde(default, deserialize_with = "lenient_seq")]
    pub products: Option<Vec<ProductRef>>,
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
}

/// A product sub-record inside `data.products`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductRef {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
}

/// Where an event's product identifiers come from
///
/// Sources are tried in declaration order and the first non-empty one wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProductSource<'a> {
    /// Top-level `productIds` list
    Explicit(&'a [String]),
    /// `data.products[].id`
    Products(&'a [ProductRef]),
    /// Single `data.id`
    Embedded(&'a str),
    Empty,
}

impl<'a> ProductSource<'a> {
    /// Identifiers carried by this source, in order
    pub fn ids(self) -> Vec<&'a str> {
        match self {
            ProductSource::Explicit(ids) => ids.iter().map(String::as_str).collect(),
            ProductSource::Products(products) => {
                products.iter().filter_map(|p| p.id.as_deref()).collect()
            }
            ProductSource::Embedded(id) => vec![id],
            ProductSource::Empty => Vec::new(),
        }
    }
}

impl Event {
    /// Creates an event with an explicit product id list
    pub fn new(name: impl Into<String>, timestamp: i64, product_ids: Vec<String>) -> Self {
        Self {
            name: Some(name.into()),
            timestamp: Some(timestamp as f64),
            product_ids: Some(product_ids),
            data: None,
        }
    }

    /// Event name, or an empty string when the client omitted it
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn is_purchase(&self) -> bool {
        self.name.as_deref() == Some(PURCHASE_EVENT)
    }

    /// Resolves which identifier source applies to this event
    pub fn product_source(&self) -> ProductSource<'_> {
        if let Some(ids) = self.product_ids.as_deref().filter(|ids| !ids.is_empty()) {
            return ProductSource::Explicit(ids);
        }

        if let Some(data) = &self.data {
            if let Some(products) = data
                .products
                .as_deref()
                .filter(|products| products.iter().any(|p| p.id.is_some()))
            {
                return ProductSource::Products(products);
            }

            if let Some(id) = data.id.as_deref().filter(|id| !id.is_empty()) {
                return ProductSource::Embedded(id);
            }
        }

        ProductSource::Empty
    }

    /// Product identifiers referenced by this event
    pub fn product_ids(&self) -> Vec<&str> {
        self.product_source().ids()
    }

    /// Parses a raw JSON value, falling back to an empty event for non-objects
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

/// Deserializes a field, mapping any type mismatch to `None`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Like [`lenient`] but keeps the well-formed elements of a list
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}

/// Deserializes an event list element by element
///
/// Non-object elements become empty events, so one bad entry cannot reject
/// the whole batch.
pub fn deserialize_events<'de, D>(deserializer: D) -> Result<Vec<Event>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values.into_iter().map(Event::from_value).collect())
}
