//! Barrier geometry as stored on disk
//!
//! ```json
//! {
//!   "Barriers": [
//!     { "MinPos": "-1530 250 -2", "MaxPos": "-1400 380 160", "Bombsite": "A" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use retakes_sdk::{Bombsite, Vector};

/// A rectangular blocking volume for one bombsite
///
/// Corners are kept exactly as they were marked; identity is exact equality
/// of both corners and the site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Barrier {
    #[serde(rename = "MinPos", with = "vector_text")]
    pub min_pos: Vector,
    #[serde(rename = "MaxPos", with = "vector_text")]
    pub max_pos: Vector,
    #[serde(rename = "Bombsite", with = "bombsite_text")]
    pub bombsite: Bombsite,
}

impl Barrier {
    pub fn new(min_pos: Vector, max_pos: Vector, bombsite: Bombsite) -> Self {
        Self {
            min_pos,
            max_pos,
            bombsite,
        }
    }

    /// Per-axis average of the two corners
    pub fn center(&self) -> Vector {
        self.min_pos.midpoint(&self.max_pos)
    }
}

/// Every barrier configured for one map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarrierConfigData {
    #[serde(rename = "Barriers", default)]
    pub barriers: Vec<Barrier>,
}

impl BarrierConfigData {
    pub fn contains(&self, barrier: &Barrier) -> bool {
        self.barriers.iter().any(|b| b == barrier)
    }

    /// Drop repeated barriers, keeping the first of each in order
    ///
    /// Returns the number removed.
    pub fn sanitize(&mut self) -> usize {
        let before = self.barriers.len();
        let mut kept: Vec<Barrier> = Vec::with_capacity(before);
        for barrier in self.barriers.drain(..) {
            if !kept.contains(&barrier) {
                kept.push(barrier);
            }
        }
        self.barriers = kept;
        before - self.barriers.len()
    }
}

/// Vectors as `"x y z"` text; commas are accepted as separators on read
pub mod vector_text {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use retakes_sdk::Vector;

    pub fn serialize<S: Serializer>(vector: &Vector, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(vector)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vector, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse(&text).ok_or_else(|| D::Error::custom(format!("invalid vector '{}'", text)))
    }

    /// Exactly three finite components, or `None`
    pub fn parse(text: &str) -> Option<Vector> {
        let mut parts = text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<f32>().ok().filter(|value| value.is_finite()));

        let x = parts.next()??;
        let y = parts.next()??;
        let z = parts.next()??;
        if parts.next().is_some() {
            return None;
        }
        Some(Vector::new(x, y, z))
    }
}

/// Sites as `"A"` / `"B"`; the numeric form (0 / 1) is also read
pub mod bombsite_text {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use retakes_sdk::Bombsite;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Index(i32),
    }

    pub fn serialize<S: Serializer>(site: &Bombsite, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(site.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bombsite, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Text(text) => text.parse().map_err(D::Error::custom),
            Repr::Index(index) => Bombsite::from_index(index)
                .ok_or_else(|| D::Error::custom(format!("invalid bombsite index {}", index))),
        }
    }
}
