use waymark_core::config::RankerKind;
use waymark_core::models::Language;

pub(super) fn parse_finite_f64(raw: &str) -> std::result::Result<f64, String> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid float value '{raw}'"))?;
    if !value.is_finite() {
        return Err(format!("value must be finite, got {value}"));
    }
    Ok(value)
}

pub(super) fn parse_unit_interval_f64(raw: &str) -> std::result::Result<f64, String> {
    let value = parse_finite_f64(raw)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("value must be within [0.0, 1.0], got {value}"));
    }
    Ok(value)
}

pub(super) fn parse_non_negative_f64(raw: &str) -> std::result::Result<f64, String> {
    let value = parse_finite_f64(raw)?;
    if value < 0.0 {
        return Err(format!("value must be finite and >= 0, got {value}"));
    }
    Ok(value)
}

pub(super) fn parse_positive_f64(raw: &str) -> std::result::Result<f64, String> {
    let value = parse_finite_f64(raw)?;
    if value <= 0.0 {
        return Err(format!("value must be finite and > 0, got {value}"));
    }
    Ok(value)
}

pub(super) fn parse_min_one_usize(raw: &str) -> std::result::Result<usize, String> {
    let value = raw
        .parse::<usize>()
        .map_err(|_| format!("invalid integer value '{raw}'"))?;
    if value == 0 {
        return Err("value must be >= 1".to_string());
    }
    Ok(value)
}

pub(super) fn parse_ranker_kind(raw: &str) -> std::result::Result<RankerKind, String> {
    raw.parse::<RankerKind>().map_err(|err| err.to_string())
}

pub(super) fn parse_language(raw: &str) -> std::result::Result<Language, String> {
    raw.parse::<Language>()
}
