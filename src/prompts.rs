pub const ANALYZE: &str = include_str!("../data/prompts/analyze.txt");
pub const FIX: &str = include_str!("../data/prompts/fix.txt");
pub const FEATURE: &str = include_str!("../data/prompts/feature.txt");
pub const TEST: &str = include_str!("../data/prompts/test.txt");
pub const SCHEMA: &str = include_str!("../data/prompts/schema.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}
