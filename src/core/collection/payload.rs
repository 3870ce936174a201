use crate::models::error::SError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub fn serialize<T: Serialize>(manifest: &T) -> Result<String, SError> {
    Ok(serde_json::to_string(manifest)?)
}

/// Merges `text` into `target`: top-level fields present in `text` replace the
/// target's, everything else is kept.
pub fn populate<T>(target: &mut T, text: &str) -> Result<(), SError>
where
    T: Serialize + DeserializeOwned,
{
    let incoming: Value = serde_json::from_str(text)?;
    let mut current = serde_json::to_value(&*target)?;

    match (&mut current, incoming) {
        (Value::Object(fields), Value::Object(incoming)) => {
            for (key, value) in incoming {
                fields.insert(key, value);
            }
        }
        (slot, incoming) => *slot = incoming,
    }

    *target = serde_json::from_value(current)?;
    Ok(())
}
