//! Compliance auditor.

use std::sync::Arc;

use camp_registry::{audit::compliance_prompt, camps::Camp};
use tracing::{info, warn};

use crate::audit::{AuditError, TextGenerator};

/// Obtains a reviewer narration for a camp card.
#[derive(Clone)]
pub struct ComplianceAuditor {
    generator: Arc<dyn TextGenerator>,
}

impl ComplianceAuditor {
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Narration for `camp`, or `None` when the service is not configured,
    /// fails or answers with nothing.
    pub async fn narrate(&self, camp: &Camp) -> Option<String> {
        let prompt = compliance_prompt(camp);

        match self.generator.generate(&prompt).await {
            Ok(text) if text.trim().is_empty() => {
                warn!(camp = %camp.id, "text-generation service returned no text");

                None
            }
            Ok(text) => {
                info!(camp = %camp.id, "compliance narration received");

                Some(text.trim().to_string())
            }
            Err(AuditError::MissingApiKey) => {
                warn!("text-generation API key is not configured");

                None
            }
            Err(error) => {
                warn!(camp = %camp.id, %error, "compliance narration failed");

                None
            }
        }
    }
}
