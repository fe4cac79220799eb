//! Request and response models for the NewsRPM endpoints.
//!
//! Response types own the payload exactly as the server sent it and expose
//! the fields the CLI reads through lenient accessors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One value or several for an indexed-data lookup.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum IndexValue {
    One(String),
    Many(Vec<String>),
}

impl IndexValue {
    /// A comma-separated list becomes [`IndexValue::Many`]; anything else
    /// stays a single value.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.contains(',') {
            let values = split_list(raw);
            if values.is_empty() {
                None
            } else {
                Some(IndexValue::Many(values))
            }
        } else if raw.is_empty() {
            None
        } else {
            Some(IndexValue::One(raw.to_string()))
        }
    }
}

/// Splits on commas, trims, drops empty entries.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Body of `POST /search/indexedData`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IndexedDataQuery {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<IndexValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

impl IndexedDataQuery {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }
}

/// Body of `POST /search/article`. Every filter is optional.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArticleQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<Vec<String>>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sponsored: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn array_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Declares a response type that owns the JSON payload exactly as the
/// server sent it. Serializing one yields that payload unchanged.
macro_rules! raw_response {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
        #[serde(transparent)]
        pub struct $name(Value);

        impl $name {
            /// The `success` flag; absent or non-boolean reads as `false`.
            pub fn success(&self) -> bool {
                self.0.get("success").and_then(Value::as_bool).unwrap_or(false)
            }

            pub fn as_value(&self) -> &Value {
                &self.0
            }

            pub fn into_value(self) -> Value {
                self.0
            }
        }

        impl From<Value> for $name {
            fn from(value: Value) -> Self {
                Self(value)
            }
        }
    };
}

raw_response!(
    /// `{success, rows}` from the search endpoints.
    MultipleArticleResponse
);
raw_response!(
    /// `{success, doc}` from `GET /article/{slugOrId}`.
    SingleArticleResponse
);
raw_response!(
    /// `{success, rows: [{provider}]}` from `GET /provider`.
    ProviderListResponse
);
raw_response!(
    /// `{success, body: {v, chunks}}` from the body endpoints.
    ArticleBodyResponse
);
raw_response!(
    /// `{success, id}` from `POST /article`.
    UploadResponse
);

/// Read-only view of one article document. Fields of an unexpected JSON
/// type read as absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Article<'a>(&'a Value);

impl<'a> Article<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self(value)
    }

    pub fn headline(&self) -> Option<&'a str> {
        str_field(self.0, "headline")
    }

    pub fn provider(&self) -> Option<&'a str> {
        str_field(self.0, "provider")
    }

    pub fn slug(&self) -> Option<&'a str> {
        str_field(self.0, "slug")
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.0.get(key)
    }

    pub fn as_value(&self) -> &'a Value {
        self.0
    }
}

/// A named, formatted fragment of an article body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyChunk<'a>(&'a Value);

impl<'a> BodyChunk<'a> {
    pub fn name(&self) -> Option<&'a str> {
        str_field(self.0, "name")
    }

    pub fn format(&self) -> Option<&'a str> {
        str_field(self.0, "format")
    }

    pub fn content(&self) -> Option<&'a str> {
        str_field(self.0, "content")
    }

    pub fn as_value(&self) -> &'a Value {
        self.0
    }
}

impl MultipleArticleResponse {
    pub fn rows(&self) -> impl Iterator<Item = Article<'_>> {
        array_field(&self.0, "rows").iter().map(Article)
    }
}

impl SingleArticleResponse {
    /// The document, unless it is absent or `null`.
    pub fn doc(&self) -> Option<Article<'_>> {
        self.0.get("doc").filter(|doc| !doc.is_null()).map(Article)
    }
}

impl ProviderListResponse {
    /// Provider names in server order, skipping rows without a non-empty
    /// string `provider`.
    pub fn providers(&self) -> impl Iterator<Item = &str> {
        array_field(&self.0, "rows")
            .iter()
            .filter_map(|row| str_field(row, "provider"))
            .filter(|name| !name.is_empty())
    }
}

impl ArticleBodyResponse {
    /// Body format version, when the server sent a numeric `v`.
    pub fn version(&self) -> Option<u64> {
        self.0.get("body")?.get("v")?.as_u64()
    }

    pub fn chunks(&self) -> impl Iterator<Item = BodyChunk<'_>> {
        let chunks = match self.0.get("body") {
            Some(body) => array_field(body, "chunks"),
            None => &[],
        };
        chunks.iter().map(BodyChunk)
    }
}

impl UploadResponse {
    /// The created id as sent (number or string), unless absent or `null`.
    pub fn id(&self) -> Option<&Value> {
        self.0.get("id").filter(|id| !id.is_null())
    }
}
