use std::collections::HashMap;
use std::sync::Arc;
use serde_json::{json, Value};
use crate::dataset::ReviewStore;
use crate::filter::{filter, FilterCriteria};

/// A tool function: takes JSON args, returns string result or error string.
pub type ToolFn = Box<dyn Fn(&HashMap<String, Value>) -> Result<String, String> + Send + Sync>;

/// Tool schema in the OpenAI function-calling shape.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ToolSchema {
    pub name:         String,
    pub description:  String,
    pub input_schema: Value,
}

struct ToolEntry {
    schema: ToolSchema,
    func:   ToolFn,
}

pub struct ToolRegistry {
    tools: HashMap<String, ToolEntry>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: HashMap::new() }
    }

    /// Register a tool with its schema and implementation.
    ///
    /// # Arguments
    /// * `name`        - Unique tool name (must match schema name)
    /// * `description` - What the tool does and when the model should call it
    /// * `schema`      - JSON Schema for the input parameters
    /// * `func`        - The implementation
    pub fn register(
        &mut self,
        name:        impl Into<String>,
        description: impl Into<String>,
        schema:      Value,
        func:        ToolFn,
    ) {
        let name = name.into();
        self.tools.insert(name.clone(), ToolEntry {
            schema: ToolSchema {
                name:         name.clone(),
                description:  description.into(),
                input_schema: schema,
            },
            func,
        });
    }

    /// Execute a named tool. Unknown tools and tool failures both come back
    /// as `Err(String)`; nothing here panics.
    pub fn execute(&self, name: &str, args: &HashMap<String, Value>) -> Result<String, String> {
        match self.tools.get(name) {
            Some(entry) => (entry.func)(args),
            None        => Err(format!("Tool '{}' not found in registry", name)),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|e| e.schema.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self { Self::new() }
}

// ── filter_reviews ───────────────────────────────────────────────────────

pub const FILTER_REVIEWS: &str = "filter_reviews";

const FILTER_REVIEWS_DESCRIPTION: &str =
    "Returns the list of client review summaries after optional filtering. \
     Arguments that are not given mean no filter is applied for that dimension; \
     never ask the user for them and never guess them.";

pub fn filter_reviews_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "city": {
                "type": "string",
                "description": "Name of the city the store is located in. Optional."
            },
            "start_date": {
                "type": "string",
                "description": "Start date in 'YYYY-MM-DD' format. 'YYYY-MM' or 'YYYY' mean the first day of that month or year. Optional."
            },
            "end_date": {
                "type": "string",
                "description": "End date in 'YYYY-MM-DD' format. 'YYYY-MM' or 'YYYY' mean the last day of that month or year. Optional."
            },
            "address_fragment": {
                "type": "string",
                "description": "Fragment of the store's street address, matched as a case-insensitive regular expression. Optional."
            },
            "state": {
                "type": "string",
                "description": "Two-letter abbreviation of the state the store is in. Canadian stores have no state. Optional."
            }
        },
        "required": []
    })
}

fn optional_string(args: &HashMap<String, Value>, key: &str) -> Result<Option<String>, String> {
    match args.get(key) {
        None | Some(Value::Null)                      => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s))                        => Ok(Some(s.clone())),
        Some(other) => Err(format!("'{}' must be a string, got {}", key, other)),
    }
}

fn optional_trimmed(args: &HashMap<String, Value>, key: &str) -> Result<Option<String>, String> {
    Ok(optional_string(args, key)?.map(|s| s.trim().to_string()))
}

/// Maps tool-call arguments onto `FilterCriteria`. Missing, null and blank
/// arguments all mean "no filter". `address_fragment` is a regex and is
/// passed through verbatim; the other values are trimmed.
pub fn criteria_from_args(args: &HashMap<String, Value>) -> Result<FilterCriteria, String> {
    Ok(FilterCriteria {
        city:             optional_trimmed(args, "city")?,
        start_date:       optional_trimmed(args, "start_date")?,
        end_date:         optional_trimmed(args, "end_date")?,
        address_fragment: optional_string(args, "address_fragment")?,
        state:            optional_trimmed(args, "state")?,
    })
}

/// Builds the `filter_reviews` tool over a shared review store. The output
/// is a JSON array of summaries; an empty result is the one-element
/// sentinel array.
pub fn filter_reviews_tool(store: Arc<ReviewStore>) -> ToolFn {
    Box::new(move |args: &HashMap<String, Value>| {
        let criteria = criteria_from_args(args)?;
        let outcome = filter(store.records(), &criteria).map_err(|e| e.to_string())?;
        tracing::info!(?criteria, matched = outcome.matches().len(), "filter_reviews executed");
        serde_json::to_string(&outcome.into_summaries())
            .map_err(|e| format!("Failed to encode summaries: {}", e))
    })
}

/// Registers `filter_reviews` on a registry.
pub fn register_filter_reviews(registry: &mut ToolRegistry, store: Arc<ReviewStore>) {
    registry.register(
        FILTER_REVIEWS,
        FILTER_REVIEWS_DESCRIPTION,
        filter_reviews_schema(),
        filter_reviews_tool(store),
    );
}
