use crate::models::error::SError;
use crate::models::mod_dto::ModDescriptor;
use regex::Regex;
use std::sync::LazyLock;

static LIST_REGEX: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r#"(?s)([A-Za-z_]+)\s*=\s*\{(.*?)\}"#));
static LIST_ITEM_REGEX: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r#""([^"]*)"|([^\s"]+)"#));
static SCALAR_REGEX: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*([A-Za-z_]+)\s*=\s*(?:"([^"]*)"|([^\s"]+))"#)
});

fn compiled(
    regex: &'static LazyLock<Result<Regex, regex::Error>>,
) -> Result<&'static Regex, SError> {
    regex
        .as_ref()
        .map_err(|e| SError::ParseError(format!("Bad descriptor pattern: {e}")))
}

/// Turns descriptor text into a [`ModDescriptor`] and back.
pub trait DescriptorParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<ModDescriptor, SError>;
    fn serialize(&self, descriptor: &ModDescriptor) -> String;
}

/// The `key="value"` / `key={ "a" "b" }` format used by Paradox-style games.
#[derive(Default, Clone, Copy, Debug)]
pub struct ParadoxDescriptorParser;

impl DescriptorParser for ParadoxDescriptorParser {
    fn parse(&self, text: &str) -> Result<ModDescriptor, SError> {
        let text = text.trim_start_matches('\u{feff}');
        let mut descriptor = ModDescriptor::default();

        let list_re = compiled(&LIST_REGEX)?;
        let item_re = compiled(&LIST_ITEM_REGEX)?;
        for caps in list_re.captures_iter(text) {
            let items: Vec<String> = item_re
                .captures_iter(&caps[2])
                .filter_map(|c| c.get(1).or_else(|| c.get(2)))
                .map(|m| m.as_str().to_string())
                .collect();
            match &caps[1] {
                "tags" => descriptor.tags = items,
                "dependencies" => descriptor.dependencies = items,
                _ => {}
            }
        }

        // Scalars; list bodies were already consumed above.
        let without_lists = list_re.replace_all(text, "");
        let scalar_re = compiled(&SCALAR_REGEX)?;
        for caps in scalar_re.captures_iter(&without_lists) {
            let Some(value) = caps.get(2).or_else(|| caps.get(3)) else {
                continue;
            };
            let value = value.as_str().to_string();
            match &caps[1] {
                "name" => descriptor.name = value,
                "version" => descriptor.version = Some(value),
                "path" => descriptor.path = Some(value),
                "archive" => descriptor.archive = Some(value),
                "picture" => descriptor.picture = Some(value),
                "supported_version" => descriptor.supported_version = Some(value),
                "remote_file_id" => {
                    let id = value.trim().parse::<i64>().map_err(|e| {
                        SError::ParseError(format!("Invalid remote_file_id '{value}': {e}"))
                    })?;
                    descriptor.remote_id = Some(id);
                }
                _ => {}
            }
        }

        if descriptor.name.trim().is_empty() {
            return Err(SError::ParseError("Descriptor has no name".to_string()));
        }
        Ok(descriptor)
    }

    fn serialize(&self, descriptor: &ModDescriptor) -> String {
        let mut out = String::new();
        let mut scalar = |key: &str, value: &str| {
            out.push_str(&format!("{key}=\"{}\"\n", escape(value)));
        };

        scalar("name", &descriptor.name);
        if let Some(version) = &descriptor.version {
            scalar("version", version);
        }
        if let Some(path) = &descriptor.path {
            scalar("path", path);
        }
        if let Some(archive) = &descriptor.archive {
            scalar("archive", archive);
        }
        if let Some(picture) = &descriptor.picture {
            scalar("picture", picture);
        }
        if let Some(id) = descriptor.remote_id {
            scalar("remote_file_id", &id.to_string());
        }
        if let Some(supported) = &descriptor.supported_version {
            scalar("supported_version", supported);
        }

        for (key, items) in [
            ("tags", &descriptor.tags),
            ("dependencies", &descriptor.dependencies),
        ] {
            if items.is_empty() {
                continue;
            }
            out.push_str(&format!("{key}={{\n"));
            for item in items {
                out.push_str(&format!("\t\"{}\"\n", escape(item)));
            }
            out.push_str("}\n");
        }
        out
    }
}

// The format has no escape sequences; quotes would end the value early.
fn escape(value: &str) -> String {
    value.replace('"', "'")
}
