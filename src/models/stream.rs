use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamEventKind {
    Start,
    Progress,
    Complete,
}

/// One server-sent progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreamEvent {
    #[serde(rename = "type")]
    pub kind: StreamEventKind,
    pub message: &'static str,
}

impl StreamEvent {
    /// Encode as a single `data: <json>\n\n` frame.
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        Ok(format!("data: {}\n\n", serde_json::to_string(self)?))
    }
}

/// Thread bookkeeping payloads for the placeholder agent endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadCreated {
    pub thread_id: &'static str,
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadState {
    pub thread_id: String,
    pub state: serde_json::Map<String, serde_json::Value>,
}
