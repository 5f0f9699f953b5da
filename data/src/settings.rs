//! Key/value settings tree used to persist shapes and specs.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::internal::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    fn kind(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "int",
            Scalar::Float(_) => "float",
            Scalar::String(_) => "string",
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Scalar {
        Scalar::Bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Scalar {
        Scalar::Int(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Scalar {
        Scalar::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Scalar {
        Scalar::String(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Scalar {
        Scalar::String(v)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    Scalar(Scalar),
    Tree(Settings),
}

/// Ordered tree of settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    entries: BTreeMap<String, Entry>,
}

/// Values that know how to write themselves to, and read themselves from, a
/// settings tree.
pub trait Persist: Sized {
    fn save_to(&self, settings: &mut Settings);
    fn load_from(settings: &Settings) -> DlResult<Self>;

    fn to_settings(&self) -> Settings {
        let mut settings = Settings::default();
        self.save_to(&mut settings);
        settings
    }
}

impl Settings {
    pub fn new() -> Settings {
        Settings::default()
    }

    pub fn from_json(json: &str) -> DlResult<Settings> {
        serde_json::from_str(json).context("Parsing settings as JSON")
    }

    pub fn to_json(&self) -> DlResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Scalar>) {
        self.entries.insert(key.into(), Entry::Scalar(value.into()));
    }

    pub fn set_tree(&mut self, key: impl Into<String>, tree: Settings) {
        self.entries.insert(key.into(), Entry::Tree(tree));
    }

    pub fn save(&mut self, key: impl Into<String>, value: &impl Persist) {
        self.set_tree(key, value.to_settings())
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn scalar(&self, key: &str) -> DlResult<&Scalar> {
        match self.entries.get(key) {
            Some(Entry::Scalar(s)) => Ok(s),
            Some(Entry::Tree(_)) => bail!("Expected a value for key {key:?}, found a tree"),
            None => bail!("No value for key {key:?}"),
        }
    }

    pub fn tree(&self, key: &str) -> DlResult<&Settings> {
        match self.entries.get(key) {
            Some(Entry::Tree(t)) => Ok(t),
            Some(Entry::Scalar(s)) => {
                bail!("Expected a tree for key {key:?}, found a {}", s.kind())
            }
            None => bail!("No tree for key {key:?}"),
        }
    }

    pub fn get_string(&self, key: &str) -> DlResult<&str> {
        match self.scalar(key)? {
            Scalar::String(s) => Ok(s),
            other => bail!("Expected a string for key {key:?}, found a {}", other.kind()),
        }
    }

    pub fn get_i64(&self, key: &str) -> DlResult<i64> {
        match self.scalar(key)? {
            Scalar::Int(i) => Ok(*i),
            other => bail!("Expected an integer for key {key:?}, found a {}", other.kind()),
        }
    }

    pub fn get_f64(&self, key: &str) -> DlResult<f64> {
        match self.scalar(key)? {
            Scalar::Float(f) => Ok(*f),
            Scalar::Int(i) => Ok(*i as f64),
            other => bail!("Expected a number for key {key:?}, found a {}", other.kind()),
        }
    }

    pub fn get_bool(&self, key: &str) -> DlResult<bool> {
        match self.scalar(key)? {
            Scalar::Bool(b) => Ok(*b),
            other => bail!("Expected a boolean for key {key:?}, found a {}", other.kind()),
        }
    }

    pub fn load<T: Persist>(&self, key: &str) -> DlResult<T> {
        T::load_from(self.tree(key)?).with_context(|| format!("Loading {key:?}"))
    }

    /// Load a tree entry, accepting the historical encoding where a single
    /// string was stored instead.
    ///
    /// When the legacy form is found, the value built by `default` is
    /// returned in its place. Any other mismatch is still an error.
    pub fn load_or_legacy_default<T: Persist>(
        &self,
        key: &str,
        default: impl FnOnce() -> T,
    ) -> DlResult<T> {
        match self.entries.get(key) {
            Some(Entry::Scalar(Scalar::String(legacy))) => {
                log::warn!("Replacing legacy value {legacy:?} for {key:?} by its default");
                Ok(default())
            }
            _ => self.load(key),
        }
    }
}

const KEY_NAME: &str = "name";
const KEY_BATCH_SIZE: &str = "batch_size";
const KEY_SHAPE: &str = "shape";
const KEY_SHAPE_KNOWN: &str = "shape_known";
const KEY_DATUM_TYPE: &str = "datum_type";

impl Persist for TensorSpec {
    fn save_to(&self, settings: &mut Settings) {
        settings.set(KEY_NAME, self.name());
        if let Some(batch) = self.batch_size() {
            settings.set(KEY_BATCH_SIZE, batch as i64);
        }
        if let Some(shape) = self.shape() {
            settings.set(KEY_SHAPE, render_shape(shape));
            settings.set(KEY_SHAPE_KNOWN, shape.is_rank_known());
        }
        settings.set(KEY_DATUM_TYPE, self.datum_type().name());
    }

    fn load_from(settings: &Settings) -> DlResult<TensorSpec> {
        let name = settings.get_string(KEY_NAME)?;
        let batch_size = if settings.contains(KEY_BATCH_SIZE) {
            let batch = settings.get_i64(KEY_BATCH_SIZE)?;
            if batch <= 0 {
                bail!(ValidationError::invalid_argument(format!(
                    "batch size of tensor {name:?} must be strictly positive, got {batch}"
                )));
            }
            Some(batch as u64)
        } else {
            None
        };
        let shape = if !settings.contains(KEY_SHAPE) {
            None
        } else if settings.contains(KEY_SHAPE_KNOWN) && !settings.get_bool(KEY_SHAPE_KNOWN)? {
            Some(TensorShape::unknown())
        } else {
            let text = settings.get_string(KEY_SHAPE)?;
            Some(
                parse_shape(text, &ShapeConstraint::partial())
                    .with_context(|| format!("Loading shape of tensor {name:?}"))?,
            )
        };
        if !settings.contains(KEY_DATUM_TYPE) {
            bail!(ValidationError::invalid_argument(format!(
                "tensor {name:?} has no datum type"
            )));
        }
        let datum_type: DatumType = settings.get_string(KEY_DATUM_TYPE)?.parse()?;
        Ok(TensorSpec::new(name, batch_size, shape, datum_type)?)
    }
}

const SECTIONS: [&str; 3] = ["inputs", "hidden_outputs", "outputs"];

impl Persist for NetworkSpec {
    fn save_to(&self, settings: &mut Settings) {
        let sections = [self.inputs(), self.hidden_outputs(), self.outputs()];
        for (key, specs) in SECTIONS.into_iter().zip(sections) {
            let mut section = Settings::new();
            for (ix, spec) in specs.iter().enumerate() {
                section.save(ix.to_string(), spec);
            }
            settings.set_tree(key, section);
        }
    }

    fn load_from(settings: &Settings) -> DlResult<NetworkSpec> {
        let mut sections: Vec<Vec<TensorSpec>> = vec![];
        for key in SECTIONS {
            let mut specs = vec![];
            if settings.contains(key) {
                let section = settings.tree(key)?;
                while section.contains(&specs.len().to_string()) {
                    let spec: TensorSpec = section
                        .load(&specs.len().to_string())
                        .with_context(|| format!("Loading {key}"))?;
                    specs.push(spec);
                }
                if section.len() != specs.len() {
                    let unexpected = section
                        .keys()
                        .filter(|k| k.parse::<usize>().map_or(true, |ix| ix >= specs.len()))
                        .map(|k| format!("{k:?}"))
                        .join(", ");
                    bail!(ValidationError::invalid_argument(format!(
                        "{key} holds {} spec(s) numbered from \"0\" without gaps, \
                         unexpected key(s): {unexpected}",
                        specs.len()
                    )));
                }
            }
            sections.push(specs);
        }
        let outputs = sections.pop().unwrap_or_default();
        let hidden = sections.pop().unwrap_or_default();
        let inputs = sections.pop().unwrap_or_default();
        Ok(NetworkSpec::new(inputs, hidden, outputs)?)
    }
}
