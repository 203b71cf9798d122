/// Lowercases, drops every character that is not alphanumeric, whitespace
/// or `_`, and trims. Only used to decide skips and to build the classifier
/// input; the original text is what ends up in the ThemeMap.
pub fn preprocess(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect::<String>()
        .trim()
        .to_string()
}
