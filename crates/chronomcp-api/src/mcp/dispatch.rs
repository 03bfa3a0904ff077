//! Tool-call dispatch and result framing
//!
//! Handler failures never become protocol errors: they are rendered as
//! error content so the assistant can read the message and retry.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chronomcp_core::{Credential, Error, Payload, RequestContext, ToolArgs, ToolResult};
use rmcp::model::{CallToolResult, Content, Meta, Tool};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::registry::Registry;

/// Prefix of the text frame carrying a deep link.
pub const DEEP_LINK_PREFIX: &str = "link to chronosphere: ";

/// Routes tool calls to registered handlers.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Tools visible to a caller: everything registered minus the caller's
    /// request-scoped disabled set.
    pub fn visible_tools(&self, credential: &Credential) -> Vec<Tool> {
        self.registry
            .list()
            .filter(|m| !credential.is_tool_disabled(&m.name))
            .map(|m| m.to_tool())
            .collect()
    }

    pub async fn dispatch(&self, ctx: RequestContext, name: &str, args: ToolArgs) -> CallToolResult {
        info!(tool = %name, "Tool call");
        if tracing::enabled!(tracing::Level::DEBUG) {
            let shown = Value::Object(args.clone());
            debug!(tool = %name, args = %shown, "Tool call arguments");
        }

        let outcome = if ctx.credential().is_tool_disabled(name) {
            Err(Error::ToolDisabled(name.to_string()))
        } else {
            match self.registry.lookup(name) {
                Some(tool) => tool.call(ctx, args).await,
                None => Err(Error::UnknownTool(name.to_string())),
            }
        };

        let result = match outcome {
            Ok(result) => {
                info!(tool = %name, "Tool call succeeded");
                render(result)
            }
            Err(e) => {
                info!(tool = %name, code = e.code().name(), error = %e, "Tool call failed");
                CallToolResult::error(vec![Content::text(e.to_string())])
            }
        };

        if tracing::enabled!(tracing::Level::DEBUG) {
            let body = serde_json::to_string(&result).unwrap_or_default();
            debug!(tool = %name, response = %body, "Tool call response");
        }
        result
    }
}

/// Frame a successful handler result.
///
/// Order: deep link, then exactly one of image, text or JSON. Metadata is
/// attached to the result envelope as `_meta`.
pub fn render(result: ToolResult) -> CallToolResult {
    let mut content = Vec::with_capacity(2);
    if let Some(link) = result.deep_link.as_deref().filter(|l| !l.is_empty()) {
        content.push(Content::text(format!("{DEEP_LINK_PREFIX}{link}")));
    }

    match result.payload {
        Payload::Image { data, mime_type } => {
            content.push(Content::image(BASE64.encode(data), mime_type));
        }
        Payload::Text(text) => content.push(Content::text(text)),
        Payload::Json(value) => content.push(Content::text(value.to_string())),
    }

    with_meta(CallToolResult::success(content), result.metadata)
}

fn with_meta(mut result: CallToolResult, metadata: Map<String, Value>) -> CallToolResult {
    if !metadata.is_empty() {
        result.meta = Some(Meta(metadata));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::registry::tests::StaticGroup;
    use crate::mcp::registry::{ToolDefinition, ToolGroup, ToolMetadata};
    use std::collections::BTreeSet;
    use serde_json::json;

    struct FailingGroup;

    impl ToolGroup for FailingGroup {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn tools(&self) -> Vec<ToolDefinition> {
            vec![ToolDefinition::new(ToolMetadata::new("fail", "always fails"), |_, _| async {
                Err(Error::upstream("list alerts", "503 Service Unavailable"))
            })]
        }
    }

    fn dispatcher() -> Dispatcher {
        let groups: Vec<Box<dyn ToolGroup>> =
            vec![Box::new(StaticGroup(vec!["echo", "other"])), Box::new(FailingGroup)];
        Dispatcher::new(Arc::new(Registry::build(&groups, &BTreeSet::new()).unwrap()))
    }

    fn texts(result: &CallToolResult) -> Vec<String> {
        result
            .content
            .iter()
            .filter_map(|c| c.as_text().map(|t| t.text.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_success_is_text_frame() {
        let result = dispatcher().dispatch(RequestContext::new(), "echo", ToolArgs::new()).await;
        assert_ne!(result.is_error, Some(true));
        assert_eq!(texts(&result), vec!["echo"]);
    }

    #[tokio::test]
    async fn test_handler_error_is_error_content() {
        let result = dispatcher().dispatch(RequestContext::new(), "fail", ToolArgs::new()).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            texts(&result),
            vec!["failed to list alerts: 503 Service Unavailable"]
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_is_error_content() {
        let result = dispatcher().dispatch(RequestContext::new(), "nope", ToolArgs::new()).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(texts(&result), vec!["unknown tool: nope"]);
    }

    #[tokio::test]
    async fn test_request_disabled_tool_is_refused() {
        let ctx = RequestContext::new()
            .with_credential(Credential::default().with_disabled_tools(["echo"]));
        let result = dispatcher().dispatch(ctx, "echo", ToolArgs::new()).await;
        assert_eq!(result.is_error, Some(true));
        assert!(texts(&result)[0].contains("echo"));
    }

    #[test]
    fn test_visible_tools_hide_request_disabled() {
        let credential = Credential::default().with_disabled_tools(["other"]);
        let names: Vec<_> = dispatcher()
            .visible_tools(&credential)
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        assert_eq!(names, vec!["echo", "fail"]);
    }

    #[test]
    fn test_render_deep_link_precedes_json() {
        let result = render(
            ToolResult::from_value(json!({"events": []})).with_deep_link("https://acme.chronosphere.io/events"),
        );
        assert_eq!(
            texts(&result),
            vec![
                "link to chronosphere: https://acme.chronosphere.io/events".to_string(),
                r#"{"events":[]}"#.to_string(),
            ]
        );
    }

    #[test]
    fn test_render_image_is_terminal() {
        let result = render(ToolResult::image(vec![1, 2, 3], "image/png"));
        assert_eq!(result.content.len(), 1);
        let image = result.content[0].as_image().unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, BASE64.encode([1, 2, 3]));
    }

    #[test]
    fn test_render_attaches_metadata() {
        let result = render(
            ToolResult::text("ok")
                .with_metadata("result_type", "matrix")
                .with_metadata("series_count", 2),
        );
        let meta = result.meta.as_ref().unwrap();
        assert_eq!(meta.0.get("series_count"), Some(&json!(2)));
        let envelope = serde_json::to_value(&result).unwrap();
        assert_eq!(envelope["_meta"], json!({"result_type": "matrix", "series_count": 2}));
    }

    #[test]
    fn test_render_metadata_survives_image_payload() {
        let result = render(ToolResult::image(vec![0], "image/png").with_metadata("legend", json!([])));
        assert_eq!(result.content.len(), 1);
        assert_eq!(result.meta.unwrap().0.get("legend"), Some(&json!([])));
    }

    #[test]
    fn test_render_without_metadata_has_no_meta() {
        let envelope = serde_json::to_value(render(ToolResult::text("ok"))).unwrap();
        assert!(envelope.get("_meta").is_none());
    }
}
