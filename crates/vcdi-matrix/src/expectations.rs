//! Verifier expectations.
//!
//! Checks over a recorded [`VerifierOutcome`]. The status codes are part of
//! the verifier contract and are compared exactly.

use vcdi_client::VerifierOutcome;

use crate::failure::AssertionFailure;

/// Verifier accepted the credential: a result with status 200 and no
/// error.
///
/// # Errors
///
/// Returns the first violated expectation.
pub fn verification_success(outcome: &VerifierOutcome) -> Result<(), AssertionFailure> {
    let result = outcome
        .result
        .as_ref()
        .ok_or_else(|| AssertionFailure::assertion("Expected a result from verifier."))?;
    if outcome.error.is_some() {
        return Err(AssertionFailure::assertion("Expected verifier to not error."));
    }
    let status = result
        .status
        .ok_or_else(|| AssertionFailure::assertion("Expected verifier to return an HTTP Status code"))?;
    if status != 200 {
        return Err(AssertionFailure::assertion(format!(
            "Expected HTTP Status code 200. (got {status})"
        )));
    }
    Ok(())
}

/// Verifier rejected the credential: an error with status 400 and no
/// result.
///
/// # Errors
///
/// Returns the first violated expectation.
pub fn verification_fail(outcome: &VerifierOutcome) -> Result<(), AssertionFailure> {
    if outcome.result.is_some() {
        return Err(AssertionFailure::assertion("Expected no result from verifier."));
    }
    let error = outcome
        .error
        .as_ref()
        .ok_or_else(|| AssertionFailure::assertion("Expected verifier to error."))?;
    let status = error
        .status
        .ok_or_else(|| AssertionFailure::assertion("Expected verifier to return an HTTP Status code"))?;
    if status != 400 {
        return Err(AssertionFailure::assertion(format!(
            "Expected HTTP Status code 400 invalid input! (got {status})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use vcdi_client::HttpReply;

    fn reply(status: Option<u16>) -> HttpReply {
        HttpReply {
            status,
            body: Value::Null,
        }
    }

    #[test]
    fn success_requires_result_without_error() {
        assert!(verification_success(&VerifierOutcome::accepted(200, Value::Null)).is_ok());

        let both = VerifierOutcome {
            result: Some(reply(Some(200))),
            error: Some(reply(Some(500))),
        };
        assert_eq!(
            verification_success(&both).unwrap_err().reason,
            "Expected verifier to not error."
        );
    }

    #[test]
    fn success_requires_exactly_200() {
        let created = VerifierOutcome::accepted(201, Value::Null);
        assert!(verification_success(&created).unwrap_err().reason.contains("got 201"));

        let no_status = VerifierOutcome {
            result: Some(reply(None)),
            error: None,
        };
        assert!(verification_success(&no_status).is_err());
    }

    #[test]
    fn fail_requires_error_with_exactly_400() {
        assert!(verification_fail(&VerifierOutcome::rejected(400, Value::Null)).is_ok());
        assert!(verification_fail(&VerifierOutcome::rejected(500, Value::Null)).is_err());
        assert_eq!(
            verification_fail(&VerifierOutcome::accepted(200, Value::Null))
                .unwrap_err()
                .reason,
            "Expected no result from verifier."
        );
        assert_eq!(
            verification_fail(&VerifierOutcome::default()).unwrap_err().reason,
            "Expected verifier to error."
        );
    }
}
