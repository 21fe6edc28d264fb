use core::str::FromStr;

use serde::{Deserialize, Serialize};

use kitshelf_core::{DomainError, ProductId};
use kitshelf_infra::{CreateProduct, ServiceError, UpdateProduct};
use kitshelf_products::parse_epoch_millis;

// -------------------------
// Request DTOs
// -------------------------

/// Epoch milliseconds as either a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EpochMillis {
    Number(i64),
    Text(String),
}

impl EpochMillis {
    pub fn into_raw(self) -> String {
        match self {
            EpochMillis::Number(ms) => ms.to_string(),
            EpochMillis::Text(raw) => raw,
        }
    }

    pub fn to_millis(&self) -> Result<i64, ServiceError> {
        match self {
            EpochMillis::Number(ms) => Ok(*ms),
            EpochMillis::Text(raw) => Ok(parse_epoch_millis(raw)?),
        }
    }
}

/// Attributes stay strings here so unknown values surface as validation errors
/// naming the allowed set rather than as opaque JSON rejections.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub start: Option<EpochMillis>,
    pub end: Option<EpochMillis>,
}

impl CreateProductRequest {
    pub fn into_command(self) -> Result<CreateProduct, ServiceError> {
        Ok(CreateProduct {
            name: required("name", self.name)?,
            brand: parse_attr(required("brand", self.brand)?)?,
            size: parse_attr(required("size", self.size)?)?,
            color: parse_attr(required("color", self.color)?)?,
            start: self.start.map(EpochMillis::into_raw),
            end: self.end.map(EpochMillis::into_raw),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub start: Option<EpochMillis>,
    pub end: Option<EpochMillis>,
}

impl UpdateProductRequest {
    pub fn into_command(self) -> Result<UpdateProduct, ServiceError> {
        Ok(UpdateProduct {
            name: self.name,
            brand: self.brand.map(parse_attr).transpose()?,
            size: self.size.map(parse_attr).transpose()?,
            color: self.color.map(parse_attr).transpose()?,
            start: self.start.as_ref().map(EpochMillis::to_millis).transpose()?,
            end: self.end.as_ref().map(EpochMillis::to_millis).transpose()?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AddAvailabilityRequest {
    pub start: Option<EpochMillis>,
    pub end: Option<EpochMillis>,
}

impl AddAvailabilityRequest {
    /// Raw `(start, end)` epoch strings, checked by the service once the product is found.
    pub fn into_raw_window(self) -> (Option<String>, Option<String>) {
        (
            self.start.map(EpochMillis::into_raw),
            self.end.map(EpochMillis::into_raw),
        )
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct AvailabilityCheckResponse {
    pub id: ProductId,
    pub available: bool,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn parse_product_id(raw: &str) -> Result<ProductId, ServiceError> {
    Ok(raw.parse::<ProductId>()?)
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ServiceError> {
    value.ok_or_else(|| ServiceError::Validation(format!("{field} is required")))
}

fn parse_attr<T>(raw: String) -> Result<T, ServiceError>
where
    T: FromStr<Err = DomainError>,
{
    Ok(raw.parse::<T>()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitshelf_products::{Brand, Color, Size};

    fn create_body(json: &str) -> CreateProductRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn epoch_millis_accepts_numbers_and_strings() {
        let number: EpochMillis = serde_json::from_str("1704067200000").unwrap();
        let text: EpochMillis = serde_json::from_str(r#""1704067200000""#).unwrap();
        assert_eq!(number.to_millis().unwrap(), 1_704_067_200_000);
        assert_eq!(text.to_millis().unwrap(), 1_704_067_200_000);
        assert_eq!(number.into_raw(), "1704067200000");
    }

    #[test]
    fn non_numeric_epoch_string_is_a_parse_error() {
        let text = EpochMillis::Text("soon".to_string());
        assert!(matches!(text.to_millis(), Err(ServiceError::Parse(_))));
    }

    #[test]
    fn create_request_maps_to_command() {
        let cmd = create_body(
            r#"{"name":"Ball","brand":"Kipsta","size":"S","color":"White","start":1704067200000,"end":"1704153600000"}"#,
        )
        .into_command()
        .unwrap();
        assert_eq!(cmd.brand, Brand::Kipsta);
        assert_eq!(cmd.size, Size::S);
        assert_eq!(cmd.color, Color::White);
        assert_eq!(cmd.start.as_deref(), Some("1704067200000"));
        assert_eq!(cmd.end.as_deref(), Some("1704153600000"));
    }

    #[test]
    fn create_request_requires_every_attribute() {
        let err = create_body(r#"{"name":"Ball","brand":"Kipsta","size":"S"}"#)
            .into_command()
            .unwrap_err();
        assert_eq!(err, ServiceError::Validation("color is required".to_string()));
    }

    #[test]
    fn unknown_attribute_value_names_the_allowed_set() {
        let err = create_body(r#"{"name":"Ball","brand":"Nike","size":"S","color":"Blue"}"#)
            .into_command()
            .unwrap_err();
        match err {
            ServiceError::Validation(msg) => assert!(msg.contains("Kipsta")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn update_request_keeps_absent_fields_absent() {
        let body: UpdateProductRequest = serde_json::from_str(r#"{"size":"L"}"#).unwrap();
        let cmd = body.into_command().unwrap();
        assert_eq!(cmd.size, Some(Size::L));
        assert!(cmd.name.is_none() && cmd.start.is_none() && cmd.end.is_none());
    }

    #[test]
    fn add_availability_body_is_passed_through_unparsed() {
        let body: AddAvailabilityRequest =
            serde_json::from_str(r#"{"start":1704067200000,"end":"soon"}"#).unwrap();
        assert_eq!(
            body.into_raw_window(),
            (Some("1704067200000".to_string()), Some("soon".to_string()))
        );

        let body: AddAvailabilityRequest = serde_json::from_str(r#"{"start":1}"#).unwrap();
        assert_eq!(body.into_raw_window(), (Some("1".to_string()), None));
    }

    #[test]
    fn product_id_must_be_numeric() {
        assert_eq!(parse_product_id("7").unwrap(), ProductId::new(7));
        assert!(matches!(parse_product_id("abc"), Err(ServiceError::Validation(_))));
    }
}
