use std::io::Write;
use std::path::Path;

use spool_format::fs::{read_json, write_json};
use spool_format::json::{self, EncodeOptions, Value};

use crate::cli::{JsonArgs, JsonCommands, JsonFormatArgs, JsonGetArgs};
use crate::error::{Error, Result};

pub fn run(args: JsonArgs) -> Result<()> {
    match args.command {
        JsonCommands::Format(args) => format(args),
        JsonCommands::Get(args) => get(args),
    }
}

fn load(path: &Path) -> Result<Value> {
    read_json(path).map_err(|source| Error::LoadDocument {
        path: path.to_path_buf(),
        source,
    })
}

fn format(args: JsonFormatArgs) -> Result<()> {
    let value = load(&args.path)?;
    let options = if args.compact {
        EncodeOptions::compact()
    } else {
        EncodeOptions::pretty(args.indent)
    };

    if args.in_place {
        return write_json(&args.path, &value, &options).map_err(|source| Error::SaveDocument {
            path: args.path.clone(),
            source,
        });
    }

    let bytes = json::encode_with(&value, &options).map_err(|source| Error::Encode { source })?;
    print_bytes(&bytes)
}

/// Follow `keys` from `root`, treating a key as an index when the current value is an array.
fn walk<'a>(root: &'a Value, keys: &[String]) -> std::result::Result<&'a Value, usize> {
    let mut current = root;
    for (depth, key) in keys.iter().enumerate() {
        let next = match current {
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            Value::Object(map) => map.get(key),
            _ => None,
        };
        current = next.ok_or(depth)?;
    }
    Ok(current)
}

fn get(args: JsonGetArgs) -> Result<()> {
    let value = load(&args.path)?;
    let found = walk(&value, &args.keys).map_err(|depth| Error::MissingKey {
        path: args.path.clone(),
        key_path: args.keys[..=depth].join("."),
    })?;

    match found {
        Value::String(s) => print_bytes(s.as_bytes()),
        other => {
            let bytes = json::encode_pretty(other, "  ").map_err(|source| Error::Encode { source })?;
            print_bytes(&bytes)
        }
    }
}

fn print_bytes(bytes: &[u8]) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    out.write_all(bytes)
        .and_then(|_| out.write_all(b"\n"))
        .and_then(|_| out.flush())
        .map_err(|source| Error::Stdout { source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn walks_objects_and_arrays() {
        let value = json::decode(br#"[{"author": {"name": "Maria"}, "tags": ["a", "b"]}]"#).unwrap();
        assert_eq!(
            walk(&value, &keys(&["0", "author", "name"])).unwrap().as_str(),
            Some("Maria")
        );
        assert_eq!(walk(&value, &keys(&["0", "tags", "1"])).unwrap().as_str(), Some("b"));
        assert_eq!(walk(&value, &[]).unwrap(), &value);
    }

    #[test]
    fn reports_depth_of_missing_key() {
        let value = json::decode(br#"{"a": {"b": 1}}"#).unwrap();
        assert_eq!(walk(&value, &keys(&["a", "c", "d"])), Err(1));
        assert_eq!(walk(&value, &keys(&["a", "b", "c"])), Err(2));
        assert_eq!(walk(&value, &keys(&["0"])), Err(0));
    }
}
