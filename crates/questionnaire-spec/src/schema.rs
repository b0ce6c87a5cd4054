use serde_json::Value;

use crate::spec::question::Question;

/// JSON Schema describing the question list a form accepts.
pub fn questions_schema() -> Value {
    schemars::schema_for!(Vec<Question>).to_value()
}
