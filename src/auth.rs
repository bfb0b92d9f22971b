use crate::error::{DashboardError, Result};

/// Maps provider error codes from account operations to the fixed table of
/// human-readable messages shown in the UI. Unrecognized codes fall back to
/// a generic message rather than leaking raw codes to the user.
pub fn friendly_auth_message(code: &str) -> &'static str {
    match code {
        "auth/invalid-email" => "The email address is badly formatted.",
        "auth/user-disabled" => "This account has been disabled.",
        "auth/user-not-found" => "No account found for that email.",
        "auth/wrong-password" => "Incorrect password. Please try again.",
        "auth/email-already-in-use" => "An account already exists for that email.",
        "auth/weak-password" => "The password is too weak. Use at least 6 characters.",
        "auth/too-many-requests" => "Too many attempts. Please wait a moment and try again.",
        "auth/network-request-failed" => "Network error. Check your connection and try again.",
        "auth/invalid-phone-number" => "The phone number is badly formatted.",
        "auth/invalid-verification-code" => "The verification code is incorrect.",
        "auth/code-expired" => "The verification code has expired. Request a new one.",
        _ => "Something went wrong. Please try again.",
    }
}

/// An in-flight phone sign-in confirmation.
///
/// The session wraps the provider's verification handle and is owned by
/// the caller for the duration of the flow; there is no process-wide
/// verifier state. Dropping the session abandons the flow.
#[derive(Debug, Clone)]
pub struct PhoneVerification {
    verification_id: String,
}

impl PhoneVerification {
    pub fn new(verification_id: impl Into<String>) -> Self {
        Self {
            verification_id: verification_id.into(),
        }
    }

    pub fn verification_id(&self) -> &str {
        &self.verification_id
    }

    /// Pairs the handle with the 6-digit confirmation code the user typed.
    /// The code shape is validated here; the provider performs the actual
    /// check when the credential is submitted.
    pub fn credential(&self, code: &str) -> Result<PhoneCredential> {
        let code = code.trim();
        if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(DashboardError::Auth(
                friendly_auth_message("auth/invalid-verification-code").to_string(),
            ));
        }

        Ok(PhoneCredential {
            verification_id: self.verification_id.clone(),
            code: code.to_string(),
        })
    }
}

/// A verification handle paired with its confirmation code, ready to
/// submit to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneCredential {
    pub verification_id: String,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_map_to_fixed_messages() {
        assert_eq!(
            friendly_auth_message("auth/wrong-password"),
            "Incorrect password. Please try again."
        );
        assert_eq!(
            friendly_auth_message("auth/some-new-code"),
            "Something went wrong. Please try again."
        );
    }

    #[test]
    fn test_credential_validates_code_shape() {
        let session = PhoneVerification::new("verif-123");

        let credential = session.credential(" 123456 ").unwrap();
        assert_eq!(credential.verification_id, "verif-123");
        assert_eq!(credential.code, "123456");

        assert!(session.credential("12345").is_err());
        assert!(session.credential("12345a").is_err());
        assert!(session.credential("").is_err());
    }
}
