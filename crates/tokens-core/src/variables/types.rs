//! Wire shapes consumed from the variables service (spec §6). Deliberately
//! minimal: only the fields C7 actually reads.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaVariable {
    pub id: String,
    pub name: String,
    pub variable_collection_id: String,
    pub resolved_type: String,
    #[serde(default)]
    pub description: Option<String>,
    pub values_by_mode: IndexMap<String, VariableValue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum VariableValue {
    #[serde(rename = "VALUE")]
    Value { value: Value },
    #[serde(rename = "ALIAS")]
    Alias { value: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeInfo {
    pub mode_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub modes: Vec<ModeInfo>,
    pub default_mode_id: String,
}
