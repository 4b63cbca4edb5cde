//! Observation key specification.
//!
//! An [`ObsKey`] names one entry of the observation handed to the agent:
//! either a snapshot field passed through whole, or a numeric or
//! description field cropped to the agent-centered window. Keys are
//! usually written as strings (`"glyphs"`, `"chars_crop"`, `"message"`)
//! and parsed with [`ObsKey::parse`].

use std::fmt;

use delve_core::ConfigError;

/// Names of the numeric 2-D fields a game snapshot may carry.
pub const GRID_FIELDS: [&str; 6] = [
    "glyphs",
    "chars",
    "colors",
    "specials",
    "tty_chars",
    "tty_colors",
];

const CROP_SUFFIX: &str = "_crop";

/// One entry of an observation.
///
/// # Examples
///
/// ```
/// use delve_obs::ObsKey;
///
/// let key = ObsKey::parse("chars_crop").unwrap();
/// assert_eq!(key, ObsKey::GridCrop("chars".into()));
/// assert_eq!(key.to_string(), "chars_crop");
///
/// assert!(ObsKey::parse("pixel").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ObsKey {
    /// A named numeric field over the whole map.
    Grid(String),
    /// A named numeric field cropped around its anchor.
    GridCrop(String),
    /// Per-cell descriptions over the whole map.
    ScreenDescriptions,
    /// Per-cell descriptions cropped around the agent.
    ScreenDescriptionsCrop,
    /// The step's message text.
    Message,
    /// Inventory item descriptions.
    InvStrs,
    /// Inventory letters.
    InvLetters,
    /// The agent's position.
    Position,
}

impl ObsKey {
    /// Parse a key name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedObservationKey`] for unknown names
    /// and for rendered-pixel keys, which this crate does not produce.
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        let key = match name {
            "screen_descriptions" => Self::ScreenDescriptions,
            "screen_descriptions_crop" => Self::ScreenDescriptionsCrop,
            "message" => Self::Message,
            "inv_strs" => Self::InvStrs,
            "inv_letters" => Self::InvLetters,
            "position" => Self::Position,
            _ => match name.strip_suffix(CROP_SUFFIX) {
                Some(base) if GRID_FIELDS.contains(&base) => Self::GridCrop(base.to_string()),
                None if GRID_FIELDS.contains(&name) => Self::Grid(name.to_string()),
                _ => {
                    return Err(ConfigError::UnsupportedObservationKey {
                        key: name.to_string(),
                    })
                }
            },
        };
        Ok(key)
    }

    /// Parse a list of key names, failing on the first bad one.
    pub fn parse_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<Self>, ConfigError> {
        names.iter().map(|n| Self::parse(n.as_ref())).collect()
    }

    /// Whether this key is cropped to the observation window.
    pub fn is_crop(&self) -> bool {
        matches!(self, Self::GridCrop(_) | Self::ScreenDescriptionsCrop)
    }

    /// Whether a crop of this key is anchored on the terminal cursor
    /// rather than on the agent.
    pub fn anchors_on_cursor(&self) -> bool {
        matches!(self, Self::GridCrop(name) if name.starts_with("tty"))
    }
}

impl fmt::Display for ObsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(name) => write!(f, "{name}"),
            Self::GridCrop(name) => write!(f, "{name}{CROP_SUFFIX}"),
            Self::ScreenDescriptions => write!(f, "screen_descriptions"),
            Self::ScreenDescriptionsCrop => write!(f, "screen_descriptions_crop"),
            Self::Message => write!(f, "message"),
            Self::InvStrs => write!(f, "inv_strs"),
            Self::InvLetters => write!(f, "inv_letters"),
            Self::Position => write!(f, "position"),
        }
    }
}
