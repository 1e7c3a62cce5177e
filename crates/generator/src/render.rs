//! Stub rendering
//!
//! Serializes synthesized values and a call shape into stub source text.
//! Rendering makes no decisions about data; it only lays out what the
//! synthesizer and shape resolver produced.

use crate::shape::{CallShape, InputEnvelope, OutputEnvelope};
use crate::templates;
use crate::value::{Literal, MessageEntry, SynthesizedValue};
use rpc_bones_common::{GeneratorError, Lang, MethodDescriptor, RenderOptions, Result};
use std::fmt;
use tera::Tera;

const SEE_ABOVE: &str = "see example above";

/// Jsonnet keywords cannot be used as bare object keys
const JSONNET_KEYWORDS: &[&str] = &[
    "assert",
    "else",
    "error",
    "false",
    "for",
    "function",
    "if",
    "import",
    "importbin",
    "importstr",
    "in",
    "local",
    "null",
    "self",
    "super",
    "tailstrict",
    "then",
    "true",
];

/// Line-oriented text builder
///
/// Values render bottom-up: each level wraps, indents or decorates the
/// lines of the level below.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snippet {
    lines: Vec<String>,
}

impl Snippet {
    pub fn single(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
        }
    }

    pub fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn extend(&mut self, other: Snippet) {
        self.lines.extend(other.lines);
    }

    /// Prefix every line
    pub fn prefix(&mut self, prefix: &str) {
        for line in &mut self.lines {
            line.insert_str(0, prefix);
        }
    }

    /// Indent and wrap between an opening and a closing line
    pub fn nest(&mut self, open: &str, close: &str) {
        self.indent(2);
        self.lines.insert(0, open.to_string());
        self.lines.push(close.to_string());
    }

    /// Like `nest`, but keeps single-line content on one line
    pub fn nest_compact(&mut self, open: &str, close: &str) {
        if self.lines.len() == 1 {
            self.lines[0] = format!("{}{}{}", open, self.lines[0], close);
        } else {
            self.nest(open, close);
        }
    }

    pub fn indent(&mut self, width: usize) {
        self.prefix(&" ".repeat(width));
    }

    /// Insert text at the start of the first line
    pub fn prepend(&mut self, text: &str) {
        match self.lines.first_mut() {
            Some(first) => first.insert_str(0, text),
            None => self.lines.push(text.to_string()),
        }
    }

    /// Add text to the end of the last line
    pub fn append(&mut self, text: &str) {
        match self.lines.last_mut() {
            Some(last) => last.push_str(text),
            None => self.lines.push(text.to_string()),
        }
    }

    /// Trailing `//` comment on the first line
    pub fn comment_first_line(&mut self, comment: &str) {
        match self.lines.first_mut() {
            Some(first) => {
                first.push_str("  // ");
                first.push_str(comment);
            }
            None => self.lines.push(format!("// {}", comment)),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl fmt::Display for Snippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// Renders method stubs through the language templates
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            tera: templates::load_templates()?,
        })
    }

    /// Render the stub for one method
    ///
    /// `None` for the request or response renders only its type name, as
    /// used by minimal mode.
    pub fn render(
        &self,
        method: &MethodDescriptor,
        shape: &CallShape,
        request: Option<&SynthesizedValue>,
        response: Option<&SynthesizedValue>,
        options: &RenderOptions,
    ) -> Result<String> {
        let values = ValueRenderer::new(options);

        let mut input = values.top_level(request, &method.input_type);
        match shape.input {
            InputEnvelope::RequestStream => input.nest(&format!("{}: [", shape.input.key()), "],"),
            InputEnvelope::Request => input.prepend(&format!("{}: ", shape.input.key())),
        }
        input.nest("{", "}");

        let mut output = values.top_level(response, &method.output_type);
        match shape.output {
            OutputEnvelope::ResponseStream => {
                output.nest(&format!("{}: [", shape.output.key()), "],")
            }
            OutputEnvelope::Response => output.prepend(&format!("{}: ", shape.output.key())),
        }
        output.indent(match options.lang {
            Lang::Js => 4,
            Lang::Jsonnet => 2,
        });

        let params = if options.include_metadata_param {
            "input, metadata"
        } else {
            "input"
        };

        let mut context = tera::Context::new();
        context.insert("full_name", &method.full_name);
        context.insert("method_name", &method.name);
        context.insert("shape", &shape.kind.to_string());
        context.insert("params", params);
        context.insert("input", &input.to_string());
        context.insert("output", &output.to_string());

        let rendered = self
            .tera
            .render(templates::template_name(options.lang), &context)
            .map_err(|e| GeneratorError::Render(format!("Template error: {}", e)))?;

        Ok(rendered.trim_end().to_string())
    }
}

/// Serializes value trees with one set of options
pub struct ValueRenderer<'a> {
    options: &'a RenderOptions,
}

impl<'a> ValueRenderer<'a> {
    pub fn new(options: &'a RenderOptions) -> Self {
        Self { options }
    }

    /// Render a request or response as a comma-terminated envelope member,
    /// with the type name on the opening line when annotating
    pub fn top_level(&self, value: Option<&SynthesizedValue>, type_name: &str) -> Snippet {
        let value = match value {
            Some(value) => value,
            None => {
                let mut snippet = Snippet::single("{");
                snippet.comment_first_line(type_name);
                snippet.line("},");
                return snippet;
            }
        };

        let mut snippet = self.value(value);
        snippet.append(",");
        if self.options.annotate {
            if let SynthesizedValue::Message { type_name, .. } = value {
                snippet.comment_first_line(short_name(type_name));
            }
        }
        snippet
    }

    pub fn value(&self, value: &SynthesizedValue) -> Snippet {
        match value {
            SynthesizedValue::Scalar(literal) => Snippet::single(self.literal(literal)),
            SynthesizedValue::EnumLiteral(name) => Snippet::single(self.options.quote(name)),
            SynthesizedValue::Message { entries, .. } => {
                if entries.is_empty() {
                    return Snippet::single("{}");
                }
                let mut snippet = Snippet::default();
                for entry in entries {
                    snippet.extend(self.entry(entry));
                }
                snippet.nest("{", "}");
                snippet
            }
            SynthesizedValue::RepeatedOne(element) => {
                let mut snippet = self.value(element);
                snippet.nest_compact("[", "]");
                snippet
            }
            SynthesizedValue::MapOne { key, value } => {
                let mut snippet = self.value(value);
                snippet.prepend(&format!("{}: ", self.options.quote(key)));
                snippet.append(",");
                snippet.nest("{", "}");
                snippet
            }
            SynthesizedValue::Reference { .. } => Snippet::single("{}"),
        }
    }

    fn entry(&self, entry: &MessageEntry) -> Snippet {
        let mut snippet = self.value(&entry.value);
        snippet.prepend(&format!("{}: ", self.key(&entry.key)));
        snippet.append(",");
        if let Some(comment) = self.entry_comment(entry) {
            snippet.comment_first_line(&comment);
        }
        snippet
    }

    /// Field type annotation, plus a pointer back to the full expansion
    /// for references
    fn entry_comment(&self, entry: &MessageEntry) -> Option<String> {
        let reference = entry.value.reference_target();

        match (&entry.annotation, self.options.annotate) {
            (Some(annotation), true) => {
                let mut comment = annotation.field_type.to_string();
                match (&annotation.oneof, reference) {
                    (Some(oneof), Some(_)) => {
                        comment.push_str(&format!(" (one-of {}, {})", oneof, SEE_ABOVE))
                    }
                    (Some(oneof), None) => comment.push_str(&format!(" (one-of {})", oneof)),
                    (None, Some(_)) => comment.push_str(&format!(" ({})", SEE_ABOVE)),
                    (None, None) => {}
                }
                Some(comment)
            }
            _ => reference.map(|type_name| format!("{} ({})", short_name(type_name), SEE_ABOVE)),
        }
    }

    fn literal(&self, literal: &Literal) -> String {
        match literal {
            Literal::Null => "null".to_string(),
            Literal::Bool(b) => b.to_string(),
            Literal::Integer(i) => i.to_string(),
            Literal::Float(f) if f.fract() == 0.0 && f.is_finite() => format!("{:.1}", f),
            Literal::Float(f) => f.to_string(),
            Literal::String(s) => self.options.quote(s),
        }
    }

    /// Bare identifier keys stay unquoted
    fn key(&self, key: &str) -> String {
        let mut chars = key.chars();
        let is_identifier = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
        let reserved = self.options.lang == Lang::Jsonnet && JSONNET_KEYWORDS.contains(&key);

        if is_identifier && !reserved {
            key.to_string()
        } else {
            self.options.quote(key)
        }
    }
}

fn short_name(full_name: &str) -> &str {
    full_name.rsplit('.').next().unwrap_or(full_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldType;
    use rpc_bones_common::{QuoteStyle, ScalarKind, TypeRef};

    fn options() -> RenderOptions {
        RenderOptions {
            lang: Lang::Js,
            ..Default::default()
        }
    }

    #[test]
    fn test_snippet_nest_compact() {
        let mut single = Snippet::single("0");
        single.nest_compact("[", "]");
        assert_eq!(single.to_string(), "[0]");

        let mut multi = Snippet::single("{");
        multi.line("}");
        multi.nest_compact("[", "]");
        assert_eq!(multi.to_string(), "[\n  {\n  }\n]");
    }

    #[test]
    fn test_snippet_prepend_append_on_empty() {
        let mut snippet = Snippet::default();
        snippet.append(",");
        snippet.prepend("a: ");
        assert_eq!(snippet.lines(), ["a: ,"]);
    }

    #[test]
    fn test_literals() {
        let opts = options();
        let renderer = ValueRenderer::new(&opts);
        assert_eq!(renderer.literal(&Literal::Null), "null");
        assert_eq!(renderer.literal(&Literal::Bool(false)), "false");
        assert_eq!(renderer.literal(&Literal::Integer(0)), "0");
        assert_eq!(renderer.literal(&Literal::Float(0.0)), "0.0");
        assert_eq!(renderer.literal(&Literal::Float(1.5)), "1.5");
        assert_eq!(renderer.literal(&Literal::String("0".into())), "\"0\"");
    }

    #[test]
    fn test_keys() {
        let opts = options();
        let renderer = ValueRenderer::new(&opts);
        assert_eq!(renderer.key("firstName"), "firstName");
        assert_eq!(renderer.key("@type"), "\"@type\"");
        assert_eq!(renderer.key("local"), "local");

        let jsonnet = RenderOptions {
            lang: Lang::Jsonnet,
            quote_style: QuoteStyle::Single,
            ..Default::default()
        };
        let renderer = ValueRenderer::new(&jsonnet);
        assert_eq!(renderer.key("local"), "'local'");
        assert_eq!(renderer.key("type"), "type");
    }

    #[test]
    fn test_annotated_message() {
        let value = SynthesizedValue::message(
            "greet.HelloRequest",
            vec![MessageEntry::annotated(
                "firstName",
                FieldType::Single(TypeRef::Scalar(ScalarKind::String)),
                SynthesizedValue::string(""),
            )],
        );
        let opts = options();
        let snippet = ValueRenderer::new(&opts).top_level(Some(&value), "greet.HelloRequest");
        assert_eq!(
            snippet.to_string(),
            "{  // HelloRequest\n  firstName: \"\",  // string\n},"
        );
    }

    #[test]
    fn test_unannotated_message_keeps_reference_comment() {
        let value = SynthesizedValue::message(
            "pkg.Node",
            vec![
                MessageEntry::annotated(
                    "id",
                    FieldType::Single(TypeRef::Scalar(ScalarKind::Int32)),
                    SynthesizedValue::Scalar(Literal::Integer(0)),
                ),
                MessageEntry::annotated(
                    "next",
                    FieldType::Single(TypeRef::message("pkg.Node")),
                    SynthesizedValue::Reference {
                        type_name: "pkg.Node".to_string(),
                    },
                ),
            ],
        );
        let opts = RenderOptions {
            annotate: false,
            ..options()
        };
        let snippet = ValueRenderer::new(&opts).top_level(Some(&value), "pkg.Node");
        assert_eq!(
            snippet.to_string(),
            "{\n  id: 0,\n  next: {},  // Node (see example above)\n},"
        );
    }

    #[test]
    fn test_map_rendering() {
        let value = SynthesizedValue::MapOne {
            key: "key".to_string(),
            value: Box::new(SynthesizedValue::EnumLiteral("RED".to_string())),
        };
        let opts = RenderOptions {
            quote_style: QuoteStyle::Single,
            ..options()
        };
        let snippet = ValueRenderer::new(&opts).value(&value);
        assert_eq!(snippet.to_string(), "{\n  'key': 'RED',\n}");
    }

    #[test]
    fn test_single_line_top_level_keeps_comma_before_comment() {
        let value = SynthesizedValue::message("google.protobuf.Empty", Vec::new());
        let opts = options();
        let snippet = ValueRenderer::new(&opts).top_level(Some(&value), "google.protobuf.Empty");
        assert_eq!(snippet.to_string(), "{},  // Empty");
    }

    #[test]
    fn test_minimal_top_level() {
        let opts = options();
        let snippet = ValueRenderer::new(&opts).top_level(None, "greet.HelloRequest");
        assert_eq!(snippet.to_string(), "{  // greet.HelloRequest\n},");
    }
}
