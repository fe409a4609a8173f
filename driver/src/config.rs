use std::str::FromStr;

use error_stack::{Report, ResultExt};
use kernel::interface::config::{DeletePolicy, FulfillmentPolicy, StockAtomicity};
use kernel::KernelError;

use crate::env_or;
use crate::error::DriverError;

static STOCK_ATOMICITY: &str = "STOCK_ATOMICITY";
static DELETE_POLICY: &str = "DELETE_POLICY";
static SERVER_PORT: &str = "SERVER_PORT";
static REPORT_JOB_ENABLED: &str = "REPORT_JOB_ENABLED";

pub fn fulfillment_policy() -> error_stack::Result<FulfillmentPolicy, KernelError> {
    let atomicity = parse_or_default::<StockAtomicity>(STOCK_ATOMICITY)?;
    let delete = parse_or_default::<DeletePolicy>(DELETE_POLICY)?;
    Ok(FulfillmentPolicy::new(atomicity, delete))
}

fn parse_or_default<T>(key: &'static str) -> error_stack::Result<T, KernelError>
where
    T: FromStr<Err = Report<KernelError>> + Default,
{
    match dotenvy::var(key) {
        Ok(value) => value
            .parse::<T>()
            .attach_printable_lazy(|| DriverError::InvalidConfig { key, value }),
        Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)) => Ok(T::default()),
        Err(error) => Err(Report::new(DriverError::from(error)))
            .change_context(KernelError::Internal)
            .attach_printable_lazy(|| format!("Failed to read {key}")),
    }
}

pub fn server_port() -> error_stack::Result<u16, KernelError> {
    let value = env_or(SERVER_PORT, "8080");
    value
        .parse::<u16>()
        .change_context_lazy(|| KernelError::Internal)
        .attach_printable_lazy(|| DriverError::InvalidConfig {
            key: SERVER_PORT,
            value: value.clone(),
        })
}

pub fn report_job_enabled() -> error_stack::Result<bool, KernelError> {
    let value = env_or(REPORT_JOB_ENABLED, "true");
    parse_flag(&value).ok_or_else(|| {
        Report::new(KernelError::Internal).attach_printable(DriverError::InvalidConfig {
            key: REPORT_JOB_ENABLED,
            value,
        })
    })
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::parse_flag;

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" ON "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("No"), Some(false));
        assert_eq!(parse_flag("sometimes"), None);
    }
}
