//! The default `ExternalAssistant`: no configured capability, so every
//! call returns `None` and every caller falls back to its own
//! deterministic path.

use async_trait::async_trait;
use remembrance_domain::ports::assistant::{ExternalAssistant, GenerateRequest, GenerateTestsRequest, RefineRequest, TranspileRequest};
use remembrance_domain::value_objects::Language;
use tracing::trace;

/// Always returns `None`. This is the assistant wired in whenever no
/// external capability has been configured; the system is fully
/// functional without one.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAssistant;

#[async_trait]
impl ExternalAssistant for NoopAssistant {
    async fn transpile(&self, request: TranspileRequest) -> Option<String> {
        trace!(from = %request.from, to = %request.to, "no-op transpile");
        None
    }

    async fn generate_tests(&self, request: GenerateTestsRequest) -> Option<String> {
        trace!(language = %request.language, "no-op generate_tests");
        None
    }

    async fn refine(&self, request: RefineRequest) -> Option<String> {
        trace!(language = %request.language, reason = %request.reason, "no-op refine");
        None
    }

    async fn generate_alternative(&self, request: GenerateRequest) -> Option<String> {
        trace!(language = %request.language, "no-op generate_alternative");
        None
    }

    async fn explain(&self, _code: &str, language: Language) -> Option<String> {
        trace!(%language, "no-op explain");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_call_returns_none() {
        let assistant = NoopAssistant;
        assert!(assistant
            .transpile(TranspileRequest {
                code: "fn f() {}".to_owned(),
                from: Language::Rust,
                to: Language::Python,
            })
            .await
            .is_none());
        assert!(assistant.explain("fn f() {}", Language::Rust).await.is_none());
    }
}
