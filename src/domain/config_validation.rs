//! Configuration validation.
//!
//! Every field is checked up front so a bad config fails before any data
//! is touched.

use crate::domain::error::KumosimError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), KumosimError> {
    validate_initial_cash(config)?;
    validate_partial_exit_fraction(config)?;
    validate_multipliers(config)?;
    validate_periods(config)?;
    validate_dates(config)?;
    validate_market(config)?;
    validate_codes(config)?;
    Ok(())
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), KumosimError> {
    let value = config.get_double("simulation", "initial_cash", 100.0);
    if value <= 0.0 {
        return Err(KumosimError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "initial_cash".to_string(),
            reason: "initial_cash must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_partial_exit_fraction(config: &dyn ConfigPort) -> Result<(), KumosimError> {
    let value = config.get_double("simulation", "partial_exit_fraction", 0.5);
    if value <= 0.0 || value >= 1.0 {
        return Err(KumosimError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "partial_exit_fraction".to_string(),
            reason: "partial_exit_fraction must be strictly between 0 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_multipliers(config: &dyn ConfigPort) -> Result<(), KumosimError> {
    for key in ["stop_loss_multiplier", "take_profit_multiplier"] {
        let default = if key == "stop_loss_multiplier" { 0.85 } else { 1.6 };
        let value = config.get_double("simulation", key, default);
        if value <= 0.0 {
            return Err(KumosimError::ConfigInvalid {
                section: "simulation".to_string(),
                key: key.to_string(),
                reason: format!("{key} must be positive"),
            });
        }
    }
    Ok(())
}

fn validate_periods(config: &dyn ConfigPort) -> Result<(), KumosimError> {
    let fields: [(&str, i64); 6] = [
        ("temu_period", 20),
        ("stoch_period", 14),
        ("stoch_smoothing", 3),
        ("tenkan_period", 9),
        ("kijun_period", 26),
        ("senkou_b_period", 52),
    ];
    for (key, default) in fields {
        let value = config.get_int("simulation", key, default);
        if value < 1 {
            return Err(KumosimError::ConfigInvalid {
                section: "simulation".to_string(),
                key: key.to_string(),
                reason: format!("{key} must be at least 1"),
            });
        }
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), KumosimError> {
    let start = parse_optional_date(config, "start_date")?;
    let end = parse_optional_date(config, "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(KumosimError::ConfigInvalid {
                section: "simulation".to_string(),
                key: "start_date".to_string(),
                reason: "start_date must be before end_date".to_string(),
            });
        }
    }
    Ok(())
}

fn parse_optional_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, KumosimError> {
    match config.get_string("simulation", key) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| KumosimError::ConfigInvalid {
                section: "simulation".to_string(),
                key: key.to_string(),
                reason: format!("invalid {key} format, expected YYYY-MM-DD"),
            }),
    }
}

fn validate_market(config: &dyn ConfigPort) -> Result<(), KumosimError> {
    match config.get_string("simulation", "market") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(KumosimError::ConfigMissing {
            section: "simulation".to_string(),
            key: "market".to_string(),
        }),
    }
}

fn validate_codes(config: &dyn ConfigPort) -> Result<(), KumosimError> {
    let codes = config.get_string("simulation", "codes");
    let code = config.get_string("simulation", "code");

    match (codes, code) {
        (Some(c), _) if !c.trim().is_empty() => Ok(()),
        (None, Some(c)) if !c.trim().is_empty() => Ok(()),
        _ => Err(KumosimError::ConfigMissing {
            section: "simulation".to_string(),
            key: "code".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn minimal_valid_config_passes() {
        let config = make_config("[simulation]\nmarket = BME\ncode = SAN\n");
        assert!(validate_simulation_config(&config).is_ok());
    }

    #[test]
    fn full_valid_config_passes() {
        let config = make_config(
            r#"
[simulation]
market = BME
codes = SAN,BBVA
initial_cash = 1000
partial_exit_fraction = 0.5
stop_loss_multiplier = 0.85
take_profit_multiplier = 1.6
temu_period = 20
stoch_period = 14
stoch_smoothing = 3
tenkan_period = 9
kijun_period = 26
senkou_b_period = 52
start_date = 2020-01-01
end_date = 2024-12-31

[data]
path = /tmp/data
"#,
        );
        assert!(validate_simulation_config(&config).is_ok());
    }

    #[test]
    fn initial_cash_zero_fails() {
        let config = make_config("[simulation]\nmarket = BME\ncode = SAN\ninitial_cash = 0\n");
        let err = validate_simulation_config(&config).unwrap_err();
        assert!(matches!(err, KumosimError::ConfigInvalid { key, .. } if key == "initial_cash"));
    }

    #[test]
    fn fraction_of_one_fails() {
        let config =
            make_config("[simulation]\nmarket = BME\ncode = SAN\npartial_exit_fraction = 1.0\n");
        let err = validate_simulation_config(&config).unwrap_err();
        assert!(
            matches!(err, KumosimError::ConfigInvalid { key, .. } if key == "partial_exit_fraction")
        );
    }

    #[test]
    fn negative_multiplier_fails() {
        let config =
            make_config("[simulation]\nmarket = BME\ncode = SAN\nstop_loss_multiplier = -0.85\n");
        let err = validate_simulation_config(&config).unwrap_err();
        assert!(
            matches!(err, KumosimError::ConfigInvalid { key, .. } if key == "stop_loss_multiplier")
        );
    }

    #[test]
    fn zero_period_fails() {
        let config = make_config("[simulation]\nmarket = BME\ncode = SAN\nkijun_period = 0\n");
        let err = validate_simulation_config(&config).unwrap_err();
        assert!(matches!(err, KumosimError::ConfigInvalid { key, .. } if key == "kijun_period"));
    }

    #[test]
    fn bad_date_format_fails() {
        let config =
            make_config("[simulation]\nmarket = BME\ncode = SAN\nstart_date = 01/02/2020\n");
        let err = validate_simulation_config(&config).unwrap_err();
        assert!(matches!(err, KumosimError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn reversed_dates_fail() {
        let config = make_config(
            "[simulation]\nmarket = BME\ncode = SAN\nstart_date = 2024-12-31\nend_date = 2020-01-01\n",
        );
        let err = validate_simulation_config(&config).unwrap_err();
        assert!(matches!(err, KumosimError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn missing_market_fails() {
        let config = make_config("[simulation]\ncode = SAN\n");
        let err = validate_simulation_config(&config).unwrap_err();
        assert!(matches!(err, KumosimError::ConfigMissing { key, .. } if key == "market"));
    }

    #[test]
    fn missing_code_fails() {
        let config = make_config("[simulation]\nmarket = BME\n");
        let err = validate_simulation_config(&config).unwrap_err();
        assert!(matches!(err, KumosimError::ConfigMissing { key, .. } if key == "code"));
    }

    #[test]
    fn codes_list_accepted() {
        let config = make_config("[simulation]\nmarket = BME\ncodes = SAN,BBVA,BME\n");
        assert!(validate_simulation_config(&config).is_ok());
    }
}
