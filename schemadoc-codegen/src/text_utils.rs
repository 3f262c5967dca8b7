/// Make a schema type name usable as an identifier.
/// e.g. "ORI-A" -> "ORI_A", "gremiumGegevens" -> "gremiumGegevens"
pub fn binding_key(type_name: &str) -> String {
    type_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// The generated class name for a schema type: binding key with its first
/// character upper-cased.
/// e.g. "gremiumGegevens" -> "GremiumGegevens", "ORI-A" -> "ORI_A"
pub fn class_name(type_name: &str) -> String {
    let key = binding_key(type_name);
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => key,
    }
}

/// The stub docstring the generator template emits for a class.
/// e.g. "gremiumGegevens" -> `"""{{docs.gremiumGegevens}}"""`
pub fn placeholder_anchor(key: &str) -> String {
    format!("\"\"\"{{{{docs.{key}}}}}\"\"\"")
}

/// Python type the generated bindings use for an XSD builtin type
pub fn builtin_type(xsd_type: &str) -> Option<&'static str> {
    let python = match xsd_type {
        "string" | "normalizedString" | "token" | "language" | "Name" | "NCName" | "ID"
        | "IDREF" | "ENTITY" | "NMTOKEN" | "anyURI" => "str",
        "integer" | "int" | "long" | "short" | "byte" | "nonNegativeInteger"
        | "positiveInteger" | "nonPositiveInteger" | "negativeInteger" | "unsignedLong"
        | "unsignedInt" | "unsignedShort" | "unsignedByte" => "int",
        "boolean" => "bool",
        "float" | "double" => "float",
        "decimal" => "Decimal",
        "date" => "XmlDate",
        "dateTime" => "XmlDateTime",
        "time" => "XmlTime",
        "duration" => "XmlDuration",
        "gYear" | "gYearMonth" | "gMonth" | "gMonthDay" | "gDay" => "XmlPeriod",
        "base64Binary" | "hexBinary" => "bytes",
        "QName" | "NOTATION" => "QName",
        _ => return None,
    };
    Some(python)
}

/// Leading spaces and tabs of the line containing byte offset `pos`
pub fn line_indent(text: &str, pos: usize) -> &str {
    let line_start = text[..pos].rfind('\n').map_or(0, |i| i + 1);
    let line = &text[line_start..];
    let width = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..width]
}

/// Greedy word wrap. The first line starts with `initial`, later lines with
/// `subsequent`. Words longer than `width` are kept whole.
pub fn wrap(text: &str, width: usize, initial: &str, subsequent: &str) -> String {
    let mut out = String::new();
    let mut line = String::from(initial);
    let mut line_len = initial.chars().count();
    let mut has_word = false;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if has_word && line_len + 1 + word_len > width {
            out.push_str(&line);
            out.push('\n');
            line = format!("{subsequent}{word}");
            line_len = subsequent.chars().count() + word_len;
        } else {
            if has_word {
                line.push(' ');
                line_len += 1;
            }
            line.push_str(word);
            line_len += word_len;
        }
        has_word = true;
    }

    if has_word {
        out.push_str(&line);
    }
    out
}
