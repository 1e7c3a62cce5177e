//! Template loading and management

use rpc_bones_common::{GeneratorError, Lang, Result};
use std::collections::HashMap;
use tera::{Tera, Value};

/// Load the method stub templates for every target language
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    tera.register_filter("comment", comment_filter);

    tera.add_raw_template(
        template_name(Lang::Js),
        include_str!("../templates/method.js.tera"),
    )
    .map_err(|e| GeneratorError::Render(format!("Failed to load method.js template: {}", e)))?;

    tera.add_raw_template(
        template_name(Lang::Jsonnet),
        include_str!("../templates/method.jsonnet.tera"),
    )
    .map_err(|e| {
        GeneratorError::Render(format!("Failed to load method.jsonnet template: {}", e))
    })?;

    Ok(tera)
}

/// Name of the method stub template for a language
pub fn template_name(lang: Lang) -> &'static str {
    match lang {
        Lang::Js => "method.js",
        Lang::Jsonnet => "method.jsonnet",
    }
}

/// Filter to turn every line into a `//` line comment
fn comment_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("comment filter expects a string"))?;

    let commented: Vec<String> = text
        .lines()
        .map(|line| {
            if line.is_empty() {
                "//".to_string()
            } else {
                format!("// {}", line)
            }
        })
        .collect();

    Ok(Value::String(commented.join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_load() {
        let tera = load_templates().unwrap();
        let names: Vec<&str> = tera.get_template_names().collect();
        assert!(names.contains(&"method.js"));
        assert!(names.contains(&"method.jsonnet"));
    }

    #[test]
    fn test_comment_filter() {
        let value = Value::String("{\n  request: {},\n\n}".to_string());
        let result = comment_filter(&value, &HashMap::new()).unwrap();
        assert_eq!(result.as_str(), Some("// {\n//   request: {},\n//\n// }"));
    }

    #[test]
    fn test_comment_filter_rejects_non_strings() {
        assert!(comment_filter(&Value::Bool(true), &HashMap::new()).is_err());
    }
}
