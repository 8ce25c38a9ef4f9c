//! Path and query parameter parsing with per-field error reporting.

use crate::error::{AppError, FieldError};
use crate::schema::{search_term, CategoryFilter, PageRequest, ProductFilter};
use std::collections::HashMap;

/// Parse an integer path id; `name` is the parameter name used in the error (`path.<name>`).
pub fn parse_id(raw: &str, name: &str) -> Result<i32, AppError> {
    raw.parse::<i32>()
        .map_err(|_| AppError::field(format!("path.{}", name), "value is not a valid integer"))
}

fn int_param(
    params: &HashMap<String, String>,
    name: &str,
    min: i64,
    max: Option<i64>,
    errors: &mut Vec<FieldError>,
) -> Option<i64> {
    let raw = params.get(name)?;
    let field = format!("query.{}", name);
    let Ok(n) = raw.trim().parse::<i64>() else {
        errors.push(FieldError::new(field, "value is not a valid integer"));
        return None;
    };
    if n < min {
        errors.push(FieldError::new(field, format!("ensure this value is greater than or equal to {}", min)));
        return None;
    }
    if let Some(max) = max {
        if n > max {
            errors.push(FieldError::new(field, format!("ensure this value is less than or equal to {}", max)));
            return None;
        }
    }
    Some(n)
}

fn page_request(params: &HashMap<String, String>, errors: &mut Vec<FieldError>) -> PageRequest {
    let page_number = int_param(params, "page_number", 1, Some(u32::MAX as i64), errors).unwrap_or(1);
    let page_size = int_param(params, "page_size", 1, Some(PageRequest::MAX_SIZE as i64), errors)
        .unwrap_or(PageRequest::DEFAULT_SIZE as i64);
    PageRequest::new(page_number as u32, page_size as u32)
}

fn finish<T>(value: T, errors: Vec<FieldError>) -> Result<T, AppError> {
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(AppError::Validation(errors))
    }
}

/// `page_number`, `page_size`, `search_term`.
pub fn category_list_params(params: &HashMap<String, String>) -> Result<(CategoryFilter, PageRequest), AppError> {
    let mut errors = Vec::new();
    let page = page_request(params, &mut errors);
    let filter = CategoryFilter {
        search_term: search_term(params.get("search_term").map(String::as_str)),
    };
    finish((filter, page), errors)
}

/// `page_number`, `page_size`, `search_term`, `category_id`.
pub fn product_list_params(params: &HashMap<String, String>) -> Result<(ProductFilter, PageRequest), AppError> {
    let mut errors = Vec::new();
    let page = page_request(params, &mut errors);
    let category_id = int_param(params, "category_id", i32::MIN as i64, Some(i32::MAX as i64), &mut errors)
        .map(|n| n as i32);
    let filter = ProductFilter {
        search_term: search_term(params.get("search_term").map(String::as_str)),
        category_id,
    };
    finish((filter, page), errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults_apply_when_absent() {
        let (filter, page) = category_list_params(&query(&[])).unwrap();
        assert_eq!(page, PageRequest::new(1, 10));
        assert_eq!(filter.search_term, None);
    }

    #[test]
    fn parses_all_product_params() {
        let (filter, page) = product_list_params(&query(&[
            ("page_number", "3"),
            ("page_size", "4"),
            ("search_term", "rye"),
            ("category_id", "2"),
        ]))
        .unwrap();
        assert_eq!(page, PageRequest::new(3, 4));
        assert_eq!(filter.search_term.as_deref(), Some("rye"));
        assert_eq!(filter.category_id, Some(2));
    }

    #[test]
    fn reports_each_bad_param() {
        let err = product_list_params(&query(&[
            ("page_number", "0"),
            ("page_size", "many"),
            ("category_id", "x"),
        ]))
        .unwrap_err();
        match err {
            AppError::Validation(errs) => assert_eq!(
                errs,
                vec![
                    FieldError::new("query.page_number", "ensure this value is greater than or equal to 1"),
                    FieldError::new("query.page_size", "value is not a valid integer"),
                    FieldError::new("query.category_id", "value is not a valid integer"),
                ]
            ),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn page_size_has_upper_bound() {
        let err = category_list_params(&query(&[("page_size", "101")])).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn path_id_must_be_integer() {
        assert_eq!(parse_id("12", "category_id").unwrap(), 12);
        match parse_id("abc", "category_id") {
            Err(AppError::Validation(errs)) => assert_eq!(errs[0].field, "path.category_id"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
