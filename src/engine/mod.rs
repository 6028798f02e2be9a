mod http;

use crate::error::AnalyzeError;
use crate::model::{AnalysisRequest, AnalysisResult};
use async_trait::async_trait;

pub use http::HttpAnalyzer;

/// Performs exactly one analysis attempt against the remote service.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalyzeError>;
}
