// Mapper between domain models and the JSON wire format
use crate::application::query_service::DataResponse;
use crate::domain::frame::{Field, FieldValues, Frame};
use crate::domain::health::{HealthCheckResult, HealthStatus};
use crate::domain::query::{DataQuery, TimeRange};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub struct QueryDataRequest {
    #[serde(default)]
    pub queries: Vec<DataQueryDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQueryDto {
    pub ref_id: String,
    pub time_range: TimeRange,
    /// Everything else is the query model.
    #[serde(flatten)]
    pub model: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct QueryDataResponse {
    pub results: BTreeMap<String, DataResponseDto>,
}

#[derive(Debug, Serialize)]
pub struct DataResponseDto {
    pub frames: Vec<FrameDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FrameDto {
    pub name: String,
    pub fields: Vec<FieldDto>,
}

#[derive(Debug, Serialize)]
pub struct FieldDto {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: &'static str,
    pub values: Value,
}

#[derive(Debug, Serialize)]
pub struct HealthCheckDto {
    pub status: &'static str,
    pub message: String,
}

pub fn data_query_from_dto(dto: DataQueryDto) -> DataQuery {
    DataQuery {
        ref_id: dto.ref_id,
        time_range: dto.time_range,
        json: Value::Object(dto.model),
    }
}

pub fn query_response_to_dto(responses: BTreeMap<String, DataResponse>) -> QueryDataResponse {
    let results = responses
        .into_iter()
        .map(|(ref_id, response)| (ref_id, data_response_to_dto(response)))
        .collect();

    QueryDataResponse { results }
}

fn data_response_to_dto(response: DataResponse) -> DataResponseDto {
    DataResponseDto {
        frames: response.frames.into_iter().map(frame_to_dto).collect(),
        error: response.error,
    }
}

fn frame_to_dto(frame: Frame) -> FrameDto {
    FrameDto {
        name: frame.name,
        fields: frame.fields.into_iter().map(field_to_dto).collect(),
    }
}

fn field_to_dto(field: Field) -> FieldDto {
    let field_type = field.values.type_name();
    // Non-finite numbers become null.
    let values = match field.values {
        FieldValues::Time(times) => Value::from(
            times
                .iter()
                .map(|t| t.timestamp_millis())
                .collect::<Vec<_>>(),
        ),
        FieldValues::Number(numbers) => Value::from(numbers),
        FieldValues::Text(texts) => Value::from(texts),
    };

    FieldDto {
        name: field.name,
        field_type,
        values,
    }
}

pub fn health_to_dto(result: HealthCheckResult) -> HealthCheckDto {
    let status = match result.status {
        HealthStatus::Ok => "OK",
        HealthStatus::Error => "ERROR",
    };

    HealthCheckDto {
        status,
        message: result.message,
    }
}
