//! Python naming and rendering.

use super::{MethodStub, ReturnShape};

/// Converts `CamelCase`, `mixedCase` and `SCREAMING_SNAKE` names to
/// `snake_case`. Acronyms stay together: `getHTTPResponse` becomes
/// `get_http_response`.
#[must_use]
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.extend(c.to_lowercase());
    }
    out.trim_matches('_').to_string()
}

/// Applies `old -> new` pairs in order as lower-case substring replacements.
#[must_use]
pub fn apply_entity_mapping(name: &str, entities: &[(String, String)]) -> String {
    entities.iter().fold(name.to_string(), |acc, (old, new)| {
        acc.replace(&old.to_lowercase(), &new.to_lowercase())
    })
}

/// Derives the method name: schema prefix and `SP_` prefix removed,
/// snake-cased, entity mapping applied. A name that is only the prefix keeps
/// it, so `SP_` becomes `sp` rather than an empty name.
#[must_use]
pub fn method_name(procedure_name: &str, entities: &[(String, String)]) -> String {
    let bare = procedure_name.rsplit('.').next().unwrap_or(procedure_name);
    let stripped = match bare.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("SP_") && bare.len() > 3 => &bare[3..],
        _ => bare,
    };
    apply_entity_mapping(&snake_case(stripped), entities)
}

/// Derives a parameter name: lower-cased, `p_` prefix removed, entity
/// mapping applied.
#[must_use]
pub fn parameter_name(declared: &str, entities: &[(String, String)]) -> String {
    let lowered = declared.to_lowercase();
    let name = match lowered.strip_prefix("p_") {
        Some(rest) if !rest.is_empty() => rest,
        _ => lowered.as_str(),
    };
    apply_entity_mapping(name, entities)
}

/// Renders `stub` as an indented `async def` method.
pub(super) fn render(stub: &MethodStub) -> String {
    let mut lines = vec![format!("    async def {}(", stub.name), "        self,".to_string()];
    for input in stub.inputs() {
        lines.push(format!(
            "        {}: {},",
            input.name,
            input.target_type.python()
        ));
    }

    let shape = stub.return_shape();
    let return_type = match &shape {
        ReturnShape::None => "None",
        ReturnShape::Single(output) => output.target_type.python(),
        ReturnShape::Record(_) => "dict[str, Any]",
    };
    lines.push(format!("    ) -> {return_type}:"));

    lines.push(r#"        """"#.to_string());
    let mut documented = false;
    if stub.inputs().next().is_some() {
        documented = true;
        lines.push("        Args:".to_string());
        for input in stub.inputs() {
            lines.push(format!(
                "            {}: {}",
                input.name,
                input.target_type.python()
            ));
        }
    }
    match &shape {
        ReturnShape::None => {}
        ReturnShape::Single(output) => {
            documented = true;
            lines.push("        Returns:".to_string());
            lines.push(format!("            {}", output.target_type.python()));
        }
        ReturnShape::Record(outputs) => {
            documented = true;
            let names: Vec<&str> = outputs.iter().map(|p| p.name.as_str()).collect();
            lines.push("        Returns:".to_string());
            lines.push(format!("            dict with: {}", names.join(", ")));
        }
    }
    if !documented {
        lines.push(format!("        Converted from {}.", stub.procedure_name));
    }
    lines.push(format!(
        "        Replaces Oracle {} procedure.",
        stub.procedure_name
    ));
    lines.push(r#"        """"#.to_string());
    lines.push("        # Procedural logic is not transpiled.".to_string());
    lines.push("        raise NotImplementedError".to_string());
    lines.join("\n")
}
