//! Helpers for working with metadata type names.
//!
//! Full names follow the metadata conventions:
//! - `Shapes.Circle` - plain type
//! - ``Shapes.Container`1`` - generic type definition (arity marker)
//! - `Shapes.Outer+Inner` - nested type

/// Keyword aliases for well-known primitive types.
const ALIASES: &[(&str, &str)] = &[
    ("System.Boolean", "bool"),
    ("System.Byte", "byte"),
    ("System.Char", "char"),
    ("System.Decimal", "decimal"),
    ("System.Double", "double"),
    ("System.Int32", "int"),
    ("System.Int64", "long"),
    ("System.Object", "object"),
    ("System.Single", "float"),
    ("System.String", "string"),
    ("System.Void", "void"),
];

/// Full name of the type every other type ultimately derives from.
pub const ROOT_TYPE: &str = "System.Object";

/// Look up the keyword alias of a primitive type.
///
/// # Examples
///
/// ```
/// use refdoc_model::alias;
///
/// assert_eq!(alias("System.String"), Some("string"));
/// assert_eq!(alias("Shapes.Circle"), None);
/// ```
pub fn alias(full_name: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(name, _)| *name == full_name)
        .map(|(_, keyword)| *keyword)
}

/// Namespace part of a full type name.
///
/// Nested and generic parts are ignored: the namespace ends at the last dot
/// before the outermost type name.
pub fn namespace_of(full_name: &str) -> &str {
    let outer = full_name.split('+').next().unwrap_or(full_name);
    let outer = outer.split('`').next().unwrap_or(outer);
    outer.rsplit_once('.').map_or("", |(ns, _)| ns)
}

/// Type name without its namespace (``Outer+Inner`1`` stays nested).
pub fn simple_name(full_name: &str) -> &str {
    let ns = namespace_of(full_name);
    if ns.is_empty() {
        full_name
    } else {
        &full_name[ns.len() + 1..]
    }
}

/// Remove generic arity markers and render nesting with dots.
///
/// ``System.Collections.Generic.List`1`` becomes `System.Collections.Generic.List`
/// and `Ns.Outer+Inner` becomes `Ns.Outer.Inner`.
pub fn strip_arity(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '`' => {
                while chars.peek().is_some_and(char::is_ascii_digit) {
                    chars.next();
                }
            }
            '+' => result.push('.'),
            _ => result.push(c),
        }
    }
    result
}

/// Short display name: alias if one exists, otherwise the simple name
/// without arity markers.
pub fn short_name(full_name: &str) -> String {
    alias(full_name).map_or_else(|| strip_arity(simple_name(full_name)), str::to_owned)
}

/// Full display name: alias if one exists, otherwise the full name without
/// arity markers.
pub fn display_full_name(full_name: &str) -> String {
    alias(full_name).map_or_else(|| strip_arity(full_name), str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_known_primitives() {
        assert_eq!(alias("System.Int32"), Some("int"));
        assert_eq!(alias("System.Void"), Some("void"));
        assert_eq!(alias("System.Object"), Some("object"));
        assert_eq!(alias("System.Type"), None);
    }

    #[test]
    fn test_namespace_of_plain_type() {
        assert_eq!(namespace_of("Shapes.Circle"), "Shapes");
        assert_eq!(namespace_of("System.Collections.Generic.List`1"), "System.Collections.Generic");
    }

    #[test]
    fn test_namespace_of_nested_type() {
        assert_eq!(namespace_of("Printing.TypePrinter+NameComponents"), "Printing");
    }

    #[test]
    fn test_namespace_of_global_type() {
        assert_eq!(namespace_of("Program"), "");
        assert_eq!(simple_name("Program"), "Program");
    }

    #[test]
    fn test_simple_name_keeps_nesting() {
        assert_eq!(simple_name("Printing.TypePrinter+NameComponents"), "TypePrinter+NameComponents");
    }

    #[test]
    fn test_strip_arity() {
        assert_eq!(strip_arity("Shapes.Container`1"), "Shapes.Container");
        assert_eq!(strip_arity("Ns.Outer`2+Inner`1"), "Ns.Outer.Inner");
        assert_eq!(strip_arity("Ns.Plain"), "Ns.Plain");
    }

    #[test]
    fn test_short_name_prefers_alias() {
        assert_eq!(short_name("System.String"), "string");
        assert_eq!(short_name("System.Type"), "Type");
        assert_eq!(short_name("Shapes.Container`1"), "Container");
    }

    #[test]
    fn test_display_full_name() {
        assert_eq!(display_full_name("Shapes.Shape"), "Shapes.Shape");
        assert_eq!(display_full_name("System.Boolean"), "bool");
    }
}
