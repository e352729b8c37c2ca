use serde::{Deserialize, Serialize};

/// Input kind for a function parameter.
///
/// Mirrors the catalog's declared input types; the UI picks an editing
/// affordance from this tag and performs no further validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// Free-form text input
    #[default]
    Text,
    /// Numeric input
    Number,
    /// Masked text input
    Password,
    /// Email address input
    Email,
    /// Calendar date input
    Date,
    /// One value chosen from the parameter's `options`
    Select,
}

/// Per-function choice of result rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Formatted raw JSON text (the default)
    #[default]
    Json,
    /// Tabular view derived from the result's row array
    Table,
}

/// Symbolic icon reference carried by a service definition.
///
/// The catalog stores only this tag; the presentation layer resolves it to a
/// concrete glyph. Callable or otherwise opaque icon references must never
/// appear in catalog data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconKind {
    #[default]
    Activity,
    Users,
    ShoppingCart,
    Database,
    BarChart,
}

/// Represents a single parameter of a testable function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamDefinition {
    /// Parameter identifier used as the key in the parameter value map
    pub id: String,
    /// Human-readable display name
    pub name: String,
    /// Input kind tag
    #[serde(rename = "type", default)]
    pub kind: ParamKind,
    /// Allowed values for `select` parameters (empty otherwise)
    #[serde(default)]
    pub options: Vec<String>,
    /// Default value used to seed the parameter value map
    #[serde(default)]
    pub default_value: Option<String>,
}

/// Represents one testable operation of a business service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDefinition {
    /// Function identifier, unique within its service
    pub id: String,
    /// Human-readable display name
    pub name: String,
    /// Ordered parameter schema
    #[serde(default)]
    pub params: Vec<ParamDefinition>,
    /// Run immediately on selection or parameter change, without explicit
    /// submission
    #[serde(default)]
    pub auto_execute: bool,
    /// Result rendering choice
    #[serde(default)]
    pub display_mode: DisplayMode,
}

/// A logical grouping of related testable functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDefinition {
    /// Service identifier (e.g. "order")
    pub id: String,
    /// Human-readable display name
    pub name: String,
    /// Icon resolved by the presentation layer
    #[serde(default)]
    pub icon: IconKind,
    /// Ordered list of functions offered by this service
    #[serde(default)]
    pub functions: Vec<FunctionDefinition>,
}

impl ServiceDefinition {
    /// Look up a function of this service by id.
    pub fn function(&self, function_id: &str) -> Option<&FunctionDefinition> {
        self.functions.iter().find(|f| f.id == function_id)
    }
}

/// A named endpoint address associated with exactly one service.
///
/// Serialized camelCase (`serviceId`) to stay compatible with the persisted
/// server-list format. The owning service id is fixed at creation; records
/// loaded without one are repaired by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerRecord {
    /// Record identifier, derived from the creation timestamp
    pub id: String,
    /// Human-readable display name
    pub name: String,
    /// URI-like address, display-only and echoed into synthetic responses
    pub address: String,
    /// Owning service id; empty until repaired when absent in stored data
    #[serde(default)]
    pub service_id: String,
}

/// Result of a finished mock execution.
///
/// Carries the raw result text destined for the single result slot, tagged
/// with the monotonic sequence number of the execution that produced it so
/// the state machine can discard superseded completions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Sequence number assigned when the execution started
    pub seq: u64,
    /// Raw result text (pretty-printed JSON or an error object)
    pub raw: String,
}
