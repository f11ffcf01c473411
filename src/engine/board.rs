use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::{Map, Value};
use std::io;

/// `json.dumps` default layout: `", "` / `": "` separators, non-ASCII as `\uXXXX`.
struct SpacedAsciiFormatter;

impl Formatter for SpacedAsciiFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W: ?Sized + io::Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        for c in fragment.chars() {
            if c.is_ascii() {
                writer.write_all(&[c as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Player -> consensus line across every game scanned, in insertion order.
/// Re-inserting a player overwrites the value and keeps the original slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsensusBoard {
    entries: Vec<(String, f64)>,
}

impl ConsensusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, player: String, line: f64) {
        match self.entries.iter_mut().find(|(p, _)| *p == player) {
            Some(entry) => entry.1 = line,
            None => self.entries.push((player, line)),
        }
    }

    pub fn get(&self, player: &str) -> Option<f64> {
        self.entries.iter().find(|(p, _)| p == player).map(|(_, l)| *l)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(p, l)| (p.as_str(), *l))
    }

    /// Entries ordered by ascending line; equal lines keep insertion order.
    pub fn sorted_by_line(&self) -> Vec<(&str, f64)> {
        let mut out: Vec<(&str, f64)> = self.iter().collect();
        out.sort_by(|a, b| a.1.total_cmp(&b.1));
        out
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (player, line) in self.iter() {
            map.insert(player.to_string(), Value::from(line));
        }
        Value::Object(map)
    }

    /// Single-line dump with spaced separators, e.g. `{"A": 255.0, "B": 247.5}`.
    pub fn to_json_line(&self) -> Result<String> {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedAsciiFormatter);
        self.to_json()
            .serialize(&mut ser)
            .context("failed to serialize consensus board")?;
        String::from_utf8(buf).context("consensus board JSON is not UTF-8")
    }
}
