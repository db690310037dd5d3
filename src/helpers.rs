/// Replace `{placeholder}` markers in a message template.
pub fn fill_template(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in substitutions {
        out = out.replace(&format!("{{{}}}", key), value);
    }
    out
}
