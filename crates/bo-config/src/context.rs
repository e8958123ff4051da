//! Settings object produced by a successful parse
//!
//! Two string-valued attributes, both absent until a statement assigns them.
//! Assignments overwrite (last write wins); callers decide what "absent" means.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The fixed set of configurable attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Db,
    UrlOpenCmd,
}

impl Attribute {
    pub const ALL: [Attribute; 2] = [Attribute::Db, Attribute::UrlOpenCmd];

    /// Key spelling used in the configuration file
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Db => "db",
            Attribute::UrlOpenCmd => "url_open_cmd",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Validated configuration values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    db: Option<String>,
    url_open_cmd: Option<String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, attribute: Attribute) -> &Option<String> {
        match attribute {
            Attribute::Db => &self.db,
            Attribute::UrlOpenCmd => &self.url_open_cmd,
        }
    }

    fn slot_mut(&mut self, attribute: Attribute) -> &mut Option<String> {
        match attribute {
            Attribute::Db => &mut self.db,
            Attribute::UrlOpenCmd => &mut self.url_open_cmd,
        }
    }

    /// Current value, or `None` before any assignment
    pub fn get(&self, attribute: Attribute) -> Option<&str> {
        self.slot(attribute).as_deref()
    }

    /// Store an owned copy of `value`, returning the overwritten value if any
    pub fn set(&mut self, attribute: Attribute, value: &str) -> Option<String> {
        self.slot_mut(attribute).replace(value.to_string())
    }

    pub fn db(&self) -> Option<&str> {
        self.get(Attribute::Db)
    }

    pub fn url_open_cmd(&self) -> Option<&str> {
        self.get(Attribute::UrlOpenCmd)
    }

    pub fn set_db(&mut self, value: &str) -> Option<String> {
        self.set(Attribute::Db, value)
    }

    pub fn set_url_open_cmd(&mut self, value: &str) -> Option<String> {
        self.set(Attribute::UrlOpenCmd, value)
    }

    /// Attributes no statement has assigned, in declaration order
    pub fn missing(&self) -> Vec<Attribute> {
        Attribute::ALL
            .into_iter()
            .filter(|a| self.get(*a).is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// JSON object keyed by attribute name; absent values are `null`
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for attribute in Attribute::ALL {
            let value = match self.get(attribute) {
                Some(v) => serde_json::Value::String(v.to_string()),
                None => serde_json::Value::Null,
            };
            map.insert(attribute.name().to_string(), value);
        }
        serde_json::Value::Object(map)
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "DB: {}", self.db().unwrap_or("(null)"))?;
        write!(f, "URL_OPEN_CMD: {}", self.url_open_cmd().unwrap_or("(null)"))
    }
}
