use std::fmt;
use std::hash::{Hash, Hasher};

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DecodeError;

pub const SCREEN_FIELD: &str = "screen";
pub const DEPENDENCY_FIELD: &str = "dependency";

/// Item context handed to the detail family of screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailDependency {
    #[serde(rename = "itemID")]
    pub item_id: i64,
    #[serde(rename = "itemName")]
    pub item_name: String,
}

impl DetailDependency {
    pub fn new(item_id: i64, item_name: impl Into<String>) -> Self {
        Self {
            item_id,
            item_name: item_name.into(),
        }
    }
}

/// Opaque key feature modules use to reach each other's screens.
///
/// Equality and hashing only look at [`ScreenIdentifier::tag`]: two `Detail`
/// identifiers with different (or missing) dependencies are the same key. The
/// registry relies on this, so these impls must never become derived ones.
#[derive(Debug, Clone)]
pub enum ScreenIdentifier {
    Home,
    Detail(Option<DetailDependency>),
    Settings,
    SubDetail(Option<DetailDependency>),
    SettingsDetail,
}

impl ScreenIdentifier {
    /// Every identifier in canonical (payload-free) form.
    pub const ALL: [ScreenIdentifier; 5] = [
        ScreenIdentifier::Home,
        ScreenIdentifier::Detail(None),
        ScreenIdentifier::Settings,
        ScreenIdentifier::SubDetail(None),
        ScreenIdentifier::SettingsDetail,
    ];

    pub fn detail(dependency: DetailDependency) -> Self {
        Self::Detail(Some(dependency))
    }

    pub fn sub_detail(dependency: DetailDependency) -> Self {
        Self::SubDetail(Some(dependency))
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Detail(_) => "detail",
            Self::Settings => "settings",
            Self::SubDetail(_) => "subdetail",
            Self::SettingsDetail => "settingsdetail",
        }
    }

    /// Case-insensitive lookup against the tag table. Payload variants come
    /// back without a dependency.
    pub fn from_string(value: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|candidate| candidate.tag().eq_ignore_ascii_case(value))
            .cloned()
    }

    pub fn dependency(&self) -> Option<&DetailDependency> {
        match self {
            Self::Detail(dependency) | Self::SubDetail(dependency) => dependency.as_ref(),
            _ => None,
        }
    }

    pub fn accepts_dependency(&self) -> bool {
        matches!(self, Self::Detail(_) | Self::SubDetail(_))
    }

    /// The registry key for this identifier: same variant, payload dropped.
    pub fn canonical(&self) -> Self {
        match self {
            Self::Home => Self::Home,
            Self::Detail(_) => Self::Detail(None),
            Self::Settings => Self::Settings,
            Self::SubDetail(_) => Self::SubDetail(None),
            Self::SettingsDetail => Self::SettingsDetail,
        }
    }

    /// Decode `{"screen": <tag>, "dependency"?: {...}}`.
    ///
    /// A missing or malformed dependency is tolerated and decodes to `None`;
    /// only the `screen` field can make decoding fail.
    pub fn decode(value: &Value) -> Result<Self, DecodeError> {
        let object = value.as_object().ok_or(DecodeError::NotAnObject)?;
        let screen = object
            .get(SCREEN_FIELD)
            .ok_or(DecodeError::MissingField {
                field: SCREEN_FIELD,
            })?
            .as_str()
            .ok_or(DecodeError::InvalidField {
                field: SCREEN_FIELD,
            })?;

        let identifier =
            Self::from_string(screen).ok_or_else(|| DecodeError::UnknownScreen {
                field: SCREEN_FIELD,
                value: screen.to_string(),
            })?;

        let dependency = || {
            object
                .get(DEPENDENCY_FIELD)
                .and_then(|raw| DetailDependency::deserialize(raw).ok())
        };

        Ok(match identifier {
            Self::Detail(_) => Self::Detail(dependency()),
            Self::SubDetail(_) => Self::SubDetail(dependency()),
            other => other,
        })
    }

    pub fn from_json_str(input: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(input)?;
        Self::decode(&value)
    }

    pub fn to_json(&self) -> Value {
        let mut object = serde_json::Map::new();
        object.insert(SCREEN_FIELD.to_string(), Value::from(self.tag()));
        if let Some(dependency) = self.dependency() {
            if let Ok(encoded) = serde_json::to_value(dependency) {
                object.insert(DEPENDENCY_FIELD.to_string(), encoded);
            }
        }
        Value::Object(object)
    }
}

impl PartialEq for ScreenIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.tag() == other.tag()
    }
}

impl Eq for ScreenIdentifier {}

impl Hash for ScreenIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag().hash(state);
    }
}

impl fmt::Display for ScreenIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for ScreenIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(SCREEN_FIELD, self.tag())?;
        if let Some(dependency) = self.dependency() {
            map.serialize_entry(DEPENDENCY_FIELD, dependency)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ScreenIdentifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::decode(&value).map_err(de::Error::custom)
    }
}

/// Top-level sections of the shell, in container order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Home = 0,
    Detail = 1,
    Settings = 2,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Home, Section::Detail, Section::Settings];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Detail => "Detail",
            Self::Settings => "Settings",
        }
    }
}
