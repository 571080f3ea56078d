//! Bulk generation
//!
//! Items run one after another so later items see the names recorded by earlier ones
//! when conflicts are checked.

use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use super::NamingService;
use crate::models::{
    BulkResourceNameRequest, BulkResourceNameResponse, BulkResourceNameResult,
    ResourceNameRequest,
};

impl NamingService {
    /// Generate names for several resource types in request order
    pub async fn generate_bulk(
        &self,
        request: BulkResourceNameRequest,
    ) -> BulkResourceNameResponse {
        let total = request.resource_types.len();
        if total == 0 {
            return BulkResourceNameResponse::rejected("At least one resource type is required", 0);
        }

        let batch_id = Uuid::new_v4();
        let span = info_span!(
            "bulk_generate",
            batch_id = %batch_id,
            total,
            validate_only = request.validate_only
        );

        async {
            let mut results = Vec::with_capacity(total);
            for resource_type in &request.resource_types {
                let item = request.item_request(resource_type);
                let result = if request.validate_only {
                    self.validate_item(&item).await
                } else {
                    let response = self.generate(item).await;
                    BulkResourceNameResult::from_response(resource_type, response)
                };

                let failed = !result.success;
                results.push(result);
                if failed && !request.continue_on_error {
                    info!(resource_type = %resource_type, "Stopping bulk request after failure");
                    break;
                }
            }

            let response = BulkResourceNameResponse::from_results(results, total);
            info!(
                success_count = response.success_count,
                failure_count = response.failure_count,
                "Bulk request processed"
            );
            response
        }
        .instrument(span)
        .await
    }

    /// Assemble and validate only; nothing is resolved or recorded
    async fn validate_item(&self, item: &ResourceNameRequest) -> BulkResourceNameResult {
        match self.prepare(item).await {
            Ok(prepared) => BulkResourceNameResult {
                resource_type: item.resource_type.clone(),
                success: true,
                resource_name: Some(prepared.validation.name),
                error_message: None,
                resource_name_details: None,
                validation_metadata: None,
            },
            Err(e) => {
                let message = self
                    .report_failure(&e, "bulk_validate", &item.resource_type)
                    .await;
                BulkResourceNameResult::failure(&item.resource_type, message)
            }
        }
    }
}
