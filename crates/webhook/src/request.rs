use orderdesk_core::{ApplicationError, SessionId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Session paths look like `projects/<project>/agent/sessions/<id>`.
pub const SESSION_PATH_SEPARATOR: &str = "/sessions/";

/// Inbound fulfillment body. Only the fields the dispatcher reads are modelled;
/// everything else in the payload is ignored.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    #[serde(default)]
    pub session: Value,
    #[serde(default)]
    pub query_result: Option<QueryResult>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub intent: Option<IntentInfo>,
    #[serde(default)]
    pub parameters: Value,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentInfo {
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A request reduced to what the dispatcher needs.
#[derive(Clone, Debug, PartialEq)]
pub struct IntentRequest {
    pub session_id: SessionId,
    pub intent_name: String,
    /// Raw parameter bag; may be any JSON value. See [`crate::params`].
    pub parameters: Value,
}

impl IntentRequest {
    pub fn new(session_id: SessionId, intent_name: impl Into<String>, parameters: Value) -> Self {
        Self { session_id, intent_name: intent_name.into(), parameters }
    }
}

impl From<WebhookRequest> for IntentRequest {
    fn from(request: WebhookRequest) -> Self {
        let session_id = session_id_from_path(&request.session);
        let (intent_name, parameters) = match request.query_result {
            Some(query_result) => (
                query_result
                    .intent
                    .and_then(|intent| intent.display_name)
                    .map(|name| name.trim().to_owned())
                    .unwrap_or_default(),
                query_result.parameters,
            ),
            None => (String::new(), Value::Null),
        };

        Self { session_id, intent_name, parameters }
    }
}

/// Parses a raw body. Anything that is not a JSON object with the expected
/// shape is a malformed request.
pub fn parse_request(body: &[u8]) -> Result<IntentRequest, ApplicationError> {
    let payload: Value = serde_json::from_slice(body)
        .map_err(|err| ApplicationError::MalformedRequest(err.to_string()))?;
    if !payload.is_object() {
        return Err(ApplicationError::MalformedRequest("expected a JSON object".to_owned()));
    }

    let request: WebhookRequest = serde_json::from_value(payload)
        .map_err(|err| ApplicationError::MalformedRequest(err.to_string()))?;
    Ok(request.into())
}

/// Session id is the text after the last path separator. A session value that
/// is absent, blank, or not a string maps to the anonymous session.
pub fn session_id_from_path(session: &Value) -> SessionId {
    let Some(path) = session.as_str() else {
        return SessionId::anonymous();
    };

    let tail = match path.rsplit_once(SESSION_PATH_SEPARATOR) {
        Some((_, id)) => id,
        None => path,
    };
    SessionId::from_raw(Some(tail))
}
