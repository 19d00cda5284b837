//! Layout component descriptors
//!
//! A screen layout is a JSON array of widgets authored by the browser
//! designer. The server stores it verbatim; these types exist for tooling
//! (`screenctl layout inspect`) and for seeding empty layouts.
//!
//! ```json
//! [{"id": "button_1718000000000_42", "type": "button", "x": 10, "y": 20,
//!   "width": 120, "height": 40, "text": "OK", "zIndex": 0}]
//! ```

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, Result};

static ID_SEQ: AtomicU32 = AtomicU32::new(0);

/// One positioned widget on the designer canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(default)]
    pub width: i32,
    #[serde(default)]
    pub height: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default)]
    pub checked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(default)]
    pub z_index: i32,
    /// Free-form widget properties the designer attaches
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Value>,
}

impl Component {
    /// Create a component at a position with a generated id (`<type>_<millis>_<n>`).
    pub fn new(kind: impl Into<String>, x: i32, y: i32, width: i32, height: i32) -> Self {
        let kind = kind.into();
        let id = format!(
            "{}_{}_{}",
            kind,
            Utc::now().timestamp_millis(),
            ID_SEQ.fetch_add(1, Ordering::Relaxed) % 1000
        );

        Self {
            id,
            kind,
            x,
            y,
            width,
            height,
            text: None,
            placeholder: None,
            text_color: None,
            checked: false,
            image_path: None,
            z_index: 0,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

/// An ordered list of components, as serialized into `layoutJson`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layout(pub Vec<Component>);

impl Layout {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Decode a client-authored layout blob.
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(CoreError::layout)
    }

    pub fn to_json(&self) -> String {
        // Vec of plain structs cannot fail to serialize
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn components(&self) -> &[Component] {
        &self.0
    }

    /// Count components per widget type
    pub fn summary(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for component in &self.0 {
            *counts.entry(component.kind.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Bounding box `(width, height)` covering every component.
    ///
    /// Far edges are computed in `i64`; designer coordinates are `i32` and
    /// `x + width` may not fit.
    pub fn extent(&self) -> (i64, i64) {
        self.0.iter().fold((0, 0), |(w, h), c| {
            (
                w.max(i64::from(c.x) + i64::from(c.width)),
                h.max(i64::from(c.y) + i64::from(c.height)),
            )
        })
    }
}
