use rmcp::model::JsonObject;
use serde_json::Value;
use tracing::{debug, warn};

use crate::mcp::{MCPSessionOps, MemberDescriptor, ToolOutcome};
use crate::provider::ToolDefinition;
use crate::types::{AgentToolCall, AgentToolResult};

const PLACEHOLDER_DESCRIPTION: &str = "No description";

/// One executed call: the line shown to the user and the result fed back.
#[derive(Debug, Clone)]
pub(super) struct ToolExecutionOutcome {
    pub(super) log: String,
    pub(super) result: AgentToolResult,
}

/// Translate an advertised tool into the backend's declaration format.
pub(super) fn tool_declaration(member: MemberDescriptor) -> ToolDefinition {
    ToolDefinition {
        name: member.name,
        description: member
            .description
            .unwrap_or_else(|| PLACEHOLDER_DESCRIPTION.to_string()),
        parameters: member
            .input_schema
            .unwrap_or_else(|| serde_json::json!({ "type": "object", "properties": {} })),
    }
}

/// Arguments as a map; anything that is not an object becomes an empty map
/// and the tool itself reports what is missing.
pub(super) fn coerce_tool_arguments(value: &Value) -> JsonObject {
    match value {
        Value::Object(map) => map.clone(),
        Value::String(raw) => match serde_json::from_str::<Value>(raw.trim()) {
            Ok(Value::Object(map)) => map,
            _ => {
                warn!(raw = %raw, "tool arguments are not a JSON object; using empty arguments");
                JsonObject::new()
            }
        },
        Value::Null => JsonObject::new(),
        other => {
            warn!(arguments = %other, "tool arguments are not a JSON object; using empty arguments");
            JsonObject::new()
        }
    }
}

/// Run one call against the session. Never fails: errors become results.
pub(super) async fn execute_tool_call<S>(session: &mut S, call: &AgentToolCall) -> ToolExecutionOutcome
where
    S: MCPSessionOps + ?Sized,
{
    let arguments = coerce_tool_arguments(&call.arguments);
    let rendered = render_arguments(&arguments);
    debug!(tool = %call.name, id = %call.id, arguments = %rendered, "executing tool call");

    match session.call_tool(&call.name, arguments).await {
        ToolOutcome::Success { text } => ToolExecutionOutcome {
            log: format!("[Used {}({rendered})]", call.name),
            result: AgentToolResult {
                tool_call_id: call.id.clone(),
                content: text,
                is_error: false,
            },
        },
        ToolOutcome::Failure { message } => ToolExecutionOutcome {
            log: format!("[Tool error: {message}]"),
            result: AgentToolResult {
                tool_call_id: call.id.clone(),
                content: format!("Error: {message}"),
                is_error: true,
            },
        },
    }
}

/// Render arguments the way a Python dict prints: `{'message': 'hello'}`.
pub(super) fn render_arguments(arguments: &JsonObject) -> String {
    let entries: Vec<String> = arguments
        .iter()
        .map(|(key, value)| format!("{}: {}", quote(key), render_value(value)))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(render_value).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => render_arguments(map),
    }
}

/// Quote a string the way Python's `repr` does.
fn quote(s: &str) -> String {
    let delimiter = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(delimiter);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let code = u32::from(c);
                if code <= 0xff {
                    out.push_str(&format!("\\x{code:02x}"));
                } else {
                    out.push_str(&format!("\\u{code:04x}"));
                }
            }
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn render_arguments_matches_python_dict_repr() {
        assert_eq!(
            render_arguments(&object(json!({"message": "hello"}))),
            "{'message': 'hello'}"
        );
        assert_eq!(render_arguments(&JsonObject::new()), "{}");
    }

    #[test]
    fn render_arguments_handles_nested_and_scalar_values() {
        let rendered = render_arguments(&object(json!({
            "count": 3,
            "flags": [true, false, null],
            "inner": {"quote": "it's"}
        })));
        assert_eq!(
            rendered,
            "{'count': 3, 'flags': [True, False, None], 'inner': {'quote': \"it's\"}}"
        );
    }

    #[test]
    fn render_arguments_keeps_argument_order() {
        let arguments = coerce_tool_arguments(&json!(r#"{"zeta": "z", "alpha": 1, "mid": null}"#));
        assert_eq!(
            render_arguments(&arguments),
            "{'zeta': 'z', 'alpha': 1, 'mid': None}"
        );
    }

    #[test]
    fn render_arguments_escapes_control_characters() {
        let rendered = render_arguments(&object(json!({
            "zeta": "a\nb",
            "alpha": "tab\there\r\u{7}",
            "path": "C:\\tmp",
            "both": "it's \"quoted\""
        })));
        assert_eq!(
            rendered,
            r#"{'zeta': 'a\nb', 'alpha': 'tab\there\r\x07', 'path': 'C:\\tmp', 'both': 'it\'s "quoted"'}"#
        );
        assert!(!rendered.contains('\n'));
    }

    #[test]
    fn coerce_accepts_objects_and_stringified_objects() {
        let direct = coerce_tool_arguments(&json!({"city": "nyc"}));
        assert_eq!(direct.get("city"), Some(&json!("nyc")));

        let from_str = coerce_tool_arguments(&json!(r#"{"city":"la"}"#));
        assert_eq!(from_str.get("city"), Some(&json!("la")));
    }

    #[test]
    fn coerce_turns_malformed_payloads_into_empty_map() {
        assert!(coerce_tool_arguments(&json!(r#"{"city":"nyc""#)).is_empty());
        assert!(coerce_tool_arguments(&json!(["bad"])).is_empty());
        assert!(coerce_tool_arguments(&Value::Null).is_empty());
        assert!(coerce_tool_arguments(&json!("[1, 2]")).is_empty());
    }

    #[test]
    fn tool_declaration_fills_defaults() {
        let declared = tool_declaration(MemberDescriptor::tool("ping", None, None));
        assert_eq!(declared.description, "No description");
        assert_eq!(
            declared.parameters,
            json!({"type": "object", "properties": {}})
        );
    }
}
