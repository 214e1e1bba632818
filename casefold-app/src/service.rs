//! String case conversion.

#[cfg(test)]
use mockall::automock;

pub type CaseServicePtr = dyn CaseService + Send + Sync;

/// Converts the case of strings. Conversions follow Unicode case mapping rules and do not depend on
/// the system locale.
#[cfg_attr(test, automock)]
pub trait CaseService {
    fn upper(&self, value: &str) -> String;

    fn lower(&self, value: &str) -> String;
}

pub struct DefaultCaseService;

impl CaseService for DefaultCaseService {
    fn upper(&self, value: &str) -> String {
        value.to_uppercase()
    }

    fn lower(&self, value: &str) -> String {
        value.to_lowercase()
    }
}
