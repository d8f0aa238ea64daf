use std::collections::HashMap;

/// Substitutes `{{name}}` placeholders (inner whitespace allowed).
///
/// Placeholders missing from `values` are kept verbatim and substituted
/// text is never scanned again, so comment bodies containing braces pass
/// through untouched.
pub fn render_template(template: &str, values: &HashMap<&str, &str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            break;
        };

        out.push_str(&rest[..open]);
        let name = after_open[..close].trim();
        match values.get(name) {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after_open[close + 2..];
    }

    out.push_str(rest);
    out
}
