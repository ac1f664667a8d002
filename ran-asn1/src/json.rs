//! JSON rendering of information elements
//!
//! A human-readable dump for logs and debugging. It is a side channel and
//! has no influence on the PER encoding. Bit strings render as `"0101…"`,
//! octet strings as lowercase hex, CHOICE values as `{ "Alternative": … }`.

use serde::Serialize;
use std::io;

/// Render a value as pretty-printed JSON
pub trait ToJson {
    /// Write the JSON text to `writer`
    ///
    /// # Errors
    ///
    /// Returns an error if `writer` fails.
    fn to_json<W: io::Write>(&self, writer: W) -> serde_json::Result<()>;

    /// Render to a `String`
    fn to_json_string(&self) -> serde_json::Result<String>;
}

impl<T: Serialize + ?Sized> ToJson for T {
    fn to_json<W: io::Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }

    fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
