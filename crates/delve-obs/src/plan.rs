//! Observation plans: a validated key list executed against snapshots.
//!
//! [`ObsPlan::compile`] fixes the ordered, de-duplicated key list and the
//! crop window once; [`ObsPlan::execute`] then turns each [`Snapshot`]
//! into an [`Observation`] with one [`ObsValue`] per key, in key order.

use indexmap::{IndexMap, IndexSet};

use delve_core::{Grid, ObsError, Position, Snapshot, TextGrid};

use crate::spec::ObsKey;
use crate::window::CropWindow;

/// One extracted observation entry.
#[derive(Clone, Debug, PartialEq)]
pub enum ObsValue {
    /// A numeric 2-D field, whole or cropped.
    Grid(Grid<u16>),
    /// A description field, whole or cropped.
    Descriptions(TextGrid),
    /// Message text.
    Text(String),
    /// A list of strings (inventory descriptions).
    Strings(Vec<String>),
    /// A list of bytes (inventory letters).
    Bytes(Vec<u8>),
    /// A coordinate.
    Position(Position),
}

/// The agent-facing observation for one step, keyed by [`ObsKey`] name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Observation {
    entries: IndexMap<String, ObsValue>,
}

impl Observation {
    /// Look up an entry by key name (e.g. `"chars_crop"`).
    pub fn get(&self, key: &str) -> Option<&ObsValue> {
        self.entries.get(key)
    }

    /// A numeric grid entry.
    pub fn grid(&self, key: &str) -> Option<&Grid<u16>> {
        match self.entries.get(key)? {
            ObsValue::Grid(g) => Some(g),
            _ => None,
        }
    }

    /// A description grid entry.
    pub fn descriptions(&self, key: &str) -> Option<&TextGrid> {
        match self.entries.get(key)? {
            ObsValue::Descriptions(t) => Some(t),
            _ => None,
        }
    }

    /// Entry names in key order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the observation has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A compiled observation plan.
///
/// # Examples
///
/// ```
/// use delve_core::{Grid, Snapshot};
/// use delve_obs::{CropWindow, ObsKey, ObsPlan};
///
/// let keys = ObsKey::parse_all(&["chars_crop", "message"]).unwrap();
/// let plan = ObsPlan::compile(&keys, CropWindow::new(3, 3, 0).unwrap());
///
/// let snap = Snapshot::builder(4, 4, 8)
///     .position((0, 0))
///     .message("Hello")
///     .grid("chars", Grid::filled(4, 4, b'.' as u16))
///     .unwrap()
///     .build();
/// let obs = plan.execute(&snap).unwrap();
/// let crop = obs.grid("chars_crop").unwrap();
/// assert_eq!(crop.get(0, 0), Some(&0));
/// assert_eq!(crop.get(1, 1), Some(&(b'.' as u16)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ObsPlan {
    keys: IndexSet<ObsKey>,
    window: CropWindow,
}

impl ObsPlan {
    /// Compile a plan. Repeated keys are kept once, at their first position.
    pub fn compile(keys: &[ObsKey], window: CropWindow) -> Self {
        Self {
            keys: keys.iter().cloned().collect(),
            window,
        }
    }

    /// Keys in output order.
    pub fn keys(&self) -> impl Iterator<Item = &ObsKey> {
        self.keys.iter()
    }

    /// The crop window used for `_crop` keys.
    pub fn window(&self) -> CropWindow {
        self.window
    }

    /// Extract the observation for `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns [`ObsError::MissingField`] if the snapshot lacks a named
    /// grid the plan requires, or lacks a terminal cursor for a `tty_*`
    /// crop.
    pub fn execute(&self, snapshot: &Snapshot) -> Result<Observation, ObsError> {
        let mut entries = IndexMap::with_capacity(self.keys.len());
        for key in &self.keys {
            entries.insert(key.to_string(), self.extract(key, snapshot)?);
        }
        Ok(Observation { entries })
    }

    fn extract(&self, key: &ObsKey, snapshot: &Snapshot) -> Result<ObsValue, ObsError> {
        let value = match key {
            ObsKey::Grid(name) => ObsValue::Grid(named_grid(snapshot, name)?.clone()),
            ObsKey::GridCrop(name) => {
                let anchor = self.anchor(key, snapshot)?;
                ObsValue::Grid(self.window.crop(named_grid(snapshot, name)?, anchor))
            }
            ObsKey::ScreenDescriptions => {
                ObsValue::Descriptions(snapshot.screen_descriptions().clone())
            }
            ObsKey::ScreenDescriptionsCrop => ObsValue::Descriptions(
                self.window
                    .crop_text(snapshot.screen_descriptions(), snapshot.position()),
            ),
            ObsKey::Message => ObsValue::Text(snapshot.message().to_string()),
            ObsKey::InvStrs => ObsValue::Strings(snapshot.inv_strs().to_vec()),
            ObsKey::InvLetters => ObsValue::Bytes(snapshot.inv_letters().to_vec()),
            ObsKey::Position => ObsValue::Position(snapshot.position()),
        };
        Ok(value)
    }

    fn anchor(&self, key: &ObsKey, snapshot: &Snapshot) -> Result<Position, ObsError> {
        if key.anchors_on_cursor() {
            snapshot.tty_cursor().ok_or_else(|| ObsError::MissingField {
                name: "tty_cursor".into(),
            })
        } else {
            Ok(snapshot.position())
        }
    }
}

fn named_grid<'s>(snapshot: &'s Snapshot, name: &str) -> Result<&'s Grid<u16>, ObsError> {
    snapshot.grid(name).ok_or_else(|| ObsError::MissingField {
        name: name.to_string(),
    })
}
