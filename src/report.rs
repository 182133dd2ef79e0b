use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineId {
    Rqrr,
    Rxing,
}

impl EngineId {
    pub fn as_str(self) -> &'static str {
        match self {
            EngineId::Rqrr => "rqrr",
            EngineId::Rxing => "rxing",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub found: u32,
    pub results: Vec<ScanAttempt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanAttempt {
    pub engine: EngineId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// 0 for images, the page number for PDFs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Time spent in the engine call, including the engine's own pixel
    /// conversion. Image decoding and cropping are not included.
    pub duration_ms: u64,
}

impl ScanAttempt {
    pub fn success(engine: EngineId, text: String, duration_ms: u64) -> Self {
        Self {
            engine,
            text: Some(text),
            index: Some(0),
            error: None,
            duration_ms,
        }
    }

    pub fn failure(engine: EngineId, error: String, duration_ms: u64) -> Self {
        Self {
            engine,
            text: None,
            index: None,
            error: Some(error),
            duration_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        self.text.is_some()
    }
}

impl ScanResult {
    /// Appends an attempt, counting it when it carries decoded text.
    pub fn push(&mut self, attempt: ScanAttempt) {
        if attempt.is_success() {
            self.found += 1;
        }
        self.results.push(attempt);
    }

    /// Appends a page's attempts, stamping each with the page number.
    pub fn append_page(&mut self, page: u32, page_result: ScanResult) {
        for mut attempt in page_result.results {
            attempt.index = Some(page);
            self.push(attempt);
        }
    }

    pub fn first_text(&self) -> Option<&str> {
        self.results.iter().find_map(|r| r.text.as_deref())
    }
}

/// Call-level failure as reported to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub message: String,
    pub detail: serde_json::Value,
    pub status_code: u16,
}
