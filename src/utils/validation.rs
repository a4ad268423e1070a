//! Utilidades de validação
//!
//! Este módulo contém funções helper para validação de dados
//! e conversão de tipos.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::ValidationError;

/// Validar e converter string para UUID
pub fn validate_uuid(value: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(value).map_err(|_| {
        let mut error = ValidationError::new("uuid");
        error.add_param("value".into(), &value.to_string());
        error
    })
}

/// Validar e converter string para data
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar e converter string para datetime
pub fn validate_datetime(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            let mut error = ValidationError::new("datetime");
            error.add_param("value".into(), &value.to_string());
            error.add_param("format".into(), &"RFC3339".to_string());
            error
        })
}

/// Validar que uma string não está vazia
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que uma quantidade é positiva
pub fn validate_quantidade(value: Decimal) -> Result<(), ValidationError> {
    if value <= Decimal::ZERO {
        let mut error = ValidationError::new("quantidade");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que um valor é não-negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + serde::Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar formato de placa de veículo
pub fn validate_placa(value: &str) -> Result<(), ValidationError> {
    // Formato básico: ABC1234 ou ABC1D23 (Mercosul), com ou sem hífen
    let clean_placa = value.replace([' ', '-'], "");
    if clean_placa.len() < 3 || clean_placa.len() > 10 {
        let mut error = ValidationError::new("placa");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_placa() {
        assert!(validate_placa("ABC1234").is_ok());
        assert!(validate_placa("ABC-1234").is_ok());
        assert!(validate_placa("AB").is_err());
    }

    #[test]
    fn test_validate_quantidade() {
        assert!(validate_quantidade(Decimal::new(455, 1)).is_ok());
        assert!(validate_quantidade(Decimal::ZERO).is_err());
    }
}
