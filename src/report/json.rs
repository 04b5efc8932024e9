use crate::types::report::Output;

pub fn to_json(output: &Output) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(output)
}
