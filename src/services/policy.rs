//! Missing person resolution
//!
//! When an expense names someone the ledger has never seen, the caller
//! decides whether to register them or reject the expense.

use crate::error::FairshareResult;

/// Decision for a single unknown name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonResolution {
    Create,
    Reject,
}

/// Decides what happens to names missing from the ledger
pub trait MissingPersonPolicy {
    /// Resolve a normalized name that is not registered yet
    ///
    /// Returning an error aborts the expense without touching the ledger.
    fn resolve(&mut self, name: &str) -> FairshareResult<PersonResolution>;
}

/// Register every missing person
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoCreate;

impl MissingPersonPolicy for AutoCreate {
    fn resolve(&mut self, _name: &str) -> FairshareResult<PersonResolution> {
        Ok(PersonResolution::Create)
    }
}

/// Refuse expenses that mention unregistered people
#[derive(Debug, Default, Clone, Copy)]
pub struct RejectMissing;

impl MissingPersonPolicy for RejectMissing {
    fn resolve(&mut self, _name: &str) -> FairshareResult<PersonResolution> {
        Ok(PersonResolution::Reject)
    }
}

impl<F> MissingPersonPolicy for F
where
    F: FnMut(&str) -> PersonResolution,
{
    fn resolve(&mut self, name: &str) -> FairshareResult<PersonResolution> {
        Ok(self(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_policies() {
        assert_eq!(AutoCreate.resolve("dave").unwrap(), PersonResolution::Create);
        assert_eq!(
            RejectMissing.resolve("dave").unwrap(),
            PersonResolution::Reject
        );
    }

    #[test]
    fn test_closure_policy() {
        let mut asked = Vec::new();
        let mut policy = |name: &str| {
            asked.push(name.to_string());
            if name == "dave" {
                PersonResolution::Create
            } else {
                PersonResolution::Reject
            }
        };

        assert_eq!(policy.resolve("dave").unwrap(), PersonResolution::Create);
        assert_eq!(policy.resolve("erin").unwrap(), PersonResolution::Reject);
        drop(policy);
        assert_eq!(asked, ["dave", "erin"]);
    }
}
