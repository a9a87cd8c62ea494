//! Game event payload
//!
//! The native bridge serializes each game event's keys into a flat JSON object
//! and hands it over with the event name. [`GameEventRef`] owns that payload and
//! offers the same defaulted accessors the engine's `IGameEvent` has.

use serde_json::{Map, Value};

/// A fired game event: its name and key/value payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameEventRef {
    name: String,
    fields: Map<String, Value>,
}

impl GameEventRef {
    /// Create an event with no keys
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Map::new(),
        }
    }

    /// Parse the bridge's JSON payload
    ///
    /// An empty string is treated as an event with no keys.
    pub fn from_json(name: impl Into<String>, payload: &str) -> Result<Self, serde_json::Error> {
        let fields = if payload.trim().is_empty() {
            Map::new()
        } else {
            serde_json::from_str(payload)?
        };

        Ok(Self {
            name: name.into(),
            fields,
        })
    }

    /// Builder-style setter
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Set or replace a key
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.fields.insert(key.to_string(), value.into());
    }

    /// Get the event name
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Whether the payload carries `key`
    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Get an integer value
    ///
    /// Floats are truncated and booleans map to 0/1.
    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        match self.fields.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .map(|v| v as i32)
                .or_else(|| n.as_f64().map(|v| v as i32))
                .unwrap_or(default),
            Some(Value::Bool(b)) => *b as i32,
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    /// Get an unsigned 64-bit value (SteamIDs)
    pub fn get_uint64(&self, key: &str, default: u64) -> u64 {
        match self.fields.get(key) {
            Some(Value::Number(n)) => n.as_u64().unwrap_or(default),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    /// Get a float value
    pub fn get_float(&self, key: &str, default: f32) -> f32 {
        match self.fields.get(key) {
            Some(Value::Number(n)) => n.as_f64().map(|v| v as f32).unwrap_or(default),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    /// Get a boolean value
    ///
    /// Non-zero numbers count as true.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.fields.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(default),
            _ => default,
        }
    }

    /// Get a string value
    pub fn get_string(&self, key: &str, default: &str) -> String {
        match self.fields.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => default.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_accessors() {
        let event = GameEventRef::from_json(
            "player_ping",
            r#"{"userid": 3, "x": 12.5, "y": -4, "z": 0.25, "urgent": 1, "steamid": "76561198000000001"}"#,
        )
        .unwrap();

        assert_eq!(event.get_name(), "player_ping");
        assert_eq!(event.get_int("userid", -1), 3);
        assert_eq!(event.get_float("x", 0.0), 12.5);
        assert_eq!(event.get_float("y", 0.0), -4.0);
        assert!(event.get_bool("urgent", false));
        assert_eq!(event.get_uint64("steamid", 0), 76561198000000001);
    }

    #[test]
    fn test_defaults_for_missing_keys() {
        let event = GameEventRef::from_json("round_end", "").unwrap();
        assert_eq!(event.get_int("winner", -1), -1);
        assert_eq!(event.get_string("message", "none"), "none");
        assert!(!event.has("winner"));
    }

    #[test]
    fn test_invalid_json() {
        assert!(GameEventRef::from_json("round_end", "{not json").is_err());
        assert!(GameEventRef::from_json("round_end", "[1, 2]").is_err());
    }

    #[test]
    fn test_builder() {
        let event = GameEventRef::new("bomb_planted").with("site", 1).with("userid", 7);
        assert_eq!(event.get_int("site", 0), 1);
        assert_eq!(event.get_string("userid", ""), "7");
    }
}
