//! Schedule operations: PDF upload, analysis trigger, free-slot retrieval.

use crate::{
    client::ApiClient,
    endpoints,
    error::{ApiError, Result},
    slots::FreeSlot,
};
use serde_json::{json, Value};

impl ApiClient {
    /// Upload a schedule PDF. Extra string fields ride along in the same
    /// multipart form.
    pub async fn upload_schedule(
        &self,
        file_name: &str,
        file_bytes: Vec<u8>,
        extra_fields: &[(&str, &str)],
    ) -> Result<Value> {
        self.upload(endpoints::schedules::UPLOAD, file_name, file_bytes, extra_fields)
            .await
    }

    /// Ask the analysis service to extract courses from an uploaded
    /// schedule.
    pub async fn analyze_schedule(&self, schedule_id: u64) -> Result<Value> {
        self.post(
            endpoints::schedules::ANALYZE,
            &json!({ "emploi_du_temps_id": schedule_id }),
        )
        .await
    }

    /// Fetch the detected free slots for a schedule, typed for the
    /// aggregation functions in [`crate::slots`].
    pub async fn free_slots(&self, schedule_id: u64) -> Result<Vec<FreeSlot>> {
        let path = format!(
            "{}?emploi_du_temps_id={}",
            endpoints::schedules::FREE_SLOTS,
            schedule_id
        );
        let payload = self.get_resource(&path, "creneaux_libres").await?;
        serde_json::from_value(payload).map_err(|_| ApiError::MalformedResponse)
    }
}
