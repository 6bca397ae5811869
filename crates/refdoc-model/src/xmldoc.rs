//! XML documentation comment sidecar files.
//!
//! Compilers emit documentation comments into an XML file next to the
//! artifact:
//!
//! ```xml
//! <doc>
//!   <members>
//!     <member name="T:Shapes.Circle">
//!       <summary>A circle. See <see cref="T:Shapes.Shape"/>.</summary>
//!     </member>
//!   </members>
//! </doc>
//! ```
//!
//! Members are keyed by documentation IDs, computed here from the model with
//! [`type_id`], [`method_id`] and friends.

use std::collections::HashMap;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::entity::{Assembly, ConstructorDef, MethodDef, TypeDef};
use crate::reference::TypeReference;

/// Summaries keyed by documentation ID.
#[derive(Debug, Default)]
pub struct XmlDocs {
    summaries: HashMap<String, String>,
}

impl XmlDocs {
    /// Parse an XML documentation file.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not well-formed XML.
    pub fn parse(xml: &str) -> Result<Self, quick_xml::Error> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut summaries = HashMap::new();
        let mut buf = Vec::new();
        let mut member: Option<String> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.name().as_ref() {
                    b"member" => member = attribute(&e, b"name"),
                    b"summary" => {
                        let text = read_summary(&mut reader)?;
                        if let Some(id) = &member {
                            summaries.insert(id.clone(), text);
                        }
                    }
                    _ => {}
                },
                Event::End(e) if e.name().as_ref() == b"member" => member = None,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { summaries })
    }

    /// Number of documented members.
    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    /// True when the file documents nothing.
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Summary for a documentation ID.
    pub fn summary(&self, id: &str) -> Option<&str> {
        self.summaries.get(id).map(String::as_str)
    }

    /// Fill in missing summaries of every type and member in `assembly`.
    ///
    /// Summaries already present in the artifact are kept.
    pub fn apply(&self, assembly: &mut Assembly) {
        for ty in &mut assembly.types {
            let tid = type_id(ty);
            fill(&mut ty.summary, self.summary(&format!("T:{tid}")));

            for ctor in &mut ty.constructors {
                let id = constructor_id(&tid, &ty.generic_parameters, ctor);
                fill(&mut ctor.summary, self.summary(&id));
            }
            for property in &mut ty.properties {
                let id = format!("P:{tid}.{}", property.name);
                fill(&mut property.summary, self.summary(&id));
            }
            for method in &mut ty.methods {
                let id = method_id(&tid, &ty.generic_parameters, method);
                fill(&mut method.summary, self.summary(&id));
            }
            for value in &mut ty.enum_values {
                let id = format!("F:{tid}.{}", value.name);
                fill(&mut value.summary, self.summary(&id));
            }
        }
    }
}

fn fill(slot: &mut Option<String>, summary: Option<&str>) {
    if slot.as_deref().is_none_or(|s| s.trim().is_empty())
        && let Some(summary) = summary
    {
        *slot = Some(summary.to_owned());
    }
}

/// Documentation ID body of a type (without the `T:` prefix).
///
/// Nested types use `.` in documentation IDs.
pub fn type_id(ty: &TypeDef) -> String {
    ty.full_name().replace('+', ".")
}

/// Documentation ID of a method.
pub fn method_id(type_id: &str, type_parameters: &[String], method: &MethodDef) -> String {
    let mut id = format!("M:{type_id}.{}", method.name);
    if !method.generic_parameters.is_empty() {
        id.push_str(&format!("``{}", method.generic_parameters.len()));
    }
    let scope = Scope {
        type_parameters,
        method_parameters: &method.generic_parameters,
    };
    push_parameters(&mut id, &scope, method.parameters.iter().map(|p| &p.parameter_type));
    id
}

/// Documentation ID of a constructor.
pub fn constructor_id(type_id: &str, type_parameters: &[String], ctor: &ConstructorDef) -> String {
    let mut id = format!("M:{type_id}.#ctor");
    let scope = Scope {
        type_parameters,
        method_parameters: &[],
    };
    push_parameters(&mut id, &scope, ctor.parameters.iter().map(|p| &p.parameter_type));
    id
}

/// Generic parameters in scope of a signature.
struct Scope<'a> {
    type_parameters: &'a [String],
    method_parameters: &'a [String],
}

fn push_parameters<'r>(
    id: &mut String,
    scope: &Scope<'_>,
    parameters: impl ExactSizeIterator<Item = &'r TypeReference>,
) {
    if parameters.len() == 0 {
        return;
    }
    let encoded: Vec<String> = parameters.map(|p| encode_type(p, scope)).collect();
    id.push('(');
    id.push_str(&encoded.join(","));
    id.push(')');
}

/// Encode a parameter type the way documentation IDs spell it.
fn encode_type(reference: &TypeReference, scope: &Scope<'_>) -> String {
    match reference {
        TypeReference::Named(name) => name.replace('+', "."),
        TypeReference::GenericParameter(name) => {
            if let Some(index) = scope.method_parameters.iter().position(|p| p == name) {
                format!("``{index}")
            } else if let Some(index) = scope.type_parameters.iter().position(|p| p == name) {
                format!("`{index}")
            } else {
                name.clone()
            }
        }
        TypeReference::Array(element) => format!("{}[]", encode_type(element, scope)),
        TypeReference::ByRef(element) => format!("{}@", encode_type(element, scope)),
        TypeReference::Pointer(element) => format!("{}*", encode_type(element, scope)),
        TypeReference::GenericInstance { definition, arguments } => {
            let definition = definition.split('`').next().unwrap_or(definition);
            let arguments: Vec<String> = arguments.iter().map(|a| encode_type(a, scope)).collect();
            format!("{}{{{}}}", definition.replace('+', "."), arguments.join(","))
        }
    }
}

fn attribute(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name)
        .map(|attr| {
            attr.unescape_value().map_or_else(
                |_| String::from_utf8_lossy(&attr.value).into_owned(),
                std::borrow::Cow::into_owned,
            )
        })
}

/// Read the content of a `<summary>` element as plain text.
///
/// Cross-reference elements are replaced by the referenced name and
/// whitespace runs collapse into single spaces.
fn read_summary<R: BufRead>(reader: &mut Reader<R>) -> Result<String, quick_xml::Error> {
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                depth += 1;
                // A `<see>` with content displays its content instead of the cref.
                if !matches!(e.name().as_ref(), b"see" | b"seealso") {
                    text.push(' ');
                }
            }
            Event::Empty(e) => {
                if let Some(word) = inline_reference(&e) {
                    text.push_str(&word);
                }
            }
            Event::Text(e) => text.push_str(&reader.decoder().decode(&e)?),
            Event::GeneralRef(e) => {
                let entity = reader.decoder().decode(&e)?;
                text.push_str(&decode_entity(&entity));
            }
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
            Event::End(_) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(collapse_whitespace(&text))
}

/// Text standing in for an empty inline element such as `<see cref="..."/>`.
fn inline_reference(e: &BytesStart) -> Option<String> {
    match e.name().as_ref() {
        b"see" | b"seealso" => attribute(e, b"cref")
            .map(|cref| cref_name(&cref).to_owned())
            .or_else(|| attribute(e, b"langword")),
        b"paramref" | b"typeparamref" => attribute(e, b"name"),
        b"para" | b"br" => Some(" ".to_owned()),
        _ => None,
    }
}

/// Last name segment of a cref: `M:Shapes.Circle.Area(System.Double)` is `Area`.
fn cref_name(cref: &str) -> &str {
    let body = cref.split_once(':').map_or(cref, |(_, rest)| rest);
    let body = body.split('(').next().unwrap_or(body);
    let body = body.split('`').next().unwrap_or(body);
    body.rsplit('.').next().unwrap_or(body)
}

fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        _ => format!("&{entity};"),
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
