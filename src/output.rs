//! Writing generated values.

use serde_json::Value;
use std::io::Write;

/// Write values as JSON lines, or as one pretty-printed array.
pub fn write_values<W, I>(out: &mut W, values: I, pretty: bool) -> anyhow::Result<()>
where
    W: Write,
    I: IntoIterator<Item = Value>,
{
    if pretty {
        let values: Vec<Value> = values.into_iter().collect();
        serde_json::to_writer_pretty(&mut *out, &values)?;
        writeln!(out)?;
    } else {
        for value in values {
            serde_json::to_writer(&mut *out, &value)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}
