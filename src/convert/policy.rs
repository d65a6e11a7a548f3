//! Restart policy and security context resolution.

use crate::cluster::{RestartPolicy, SecurityContext};
use crate::error::ConvertError;

/// Maps a compose restart token to a pod restart policy.
///
/// | token                | policy      |
/// |----------------------|-------------|
/// | `""`, `"always"`     | `Always`    |
/// | `"no"`               | `Never`     |
/// | `"on-failure"`       | `OnFailure` |
///
/// # Errors
///
/// Returns [`ConvertError::UnknownRestartPolicy`] for any other token.
pub fn resolve_restart_policy(service: &str, token: &str) -> Result<RestartPolicy, ConvertError> {
    match token {
        "" | "always" => Ok(RestartPolicy::Always),
        "no" => Ok(RestartPolicy::Never),
        "on-failure" => Ok(RestartPolicy::OnFailure),
        other => Err(ConvertError::UnknownRestartPolicy {
            service: service.to_string(),
            policy: other.to_string(),
        }),
    }
}

/// Security context for a container.
///
/// Only privileged containers get one; otherwise the field stays absent
/// rather than carrying `privileged: false`.
#[must_use]
pub fn security_context(privileged: bool) -> Option<SecurityContext> {
    privileged.then(|| SecurityContext {
        privileged: Some(true),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tokens() {
        assert_eq!(resolve_restart_policy("web", ""), Ok(RestartPolicy::Always));
        assert_eq!(resolve_restart_policy("web", "always"), Ok(RestartPolicy::Always));
        assert_eq!(resolve_restart_policy("web", "no"), Ok(RestartPolicy::Never));
        assert_eq!(
            resolve_restart_policy("web", "on-failure"),
            Ok(RestartPolicy::OnFailure)
        );
    }

    #[test]
    fn test_unknown_token_is_rejected() {
        for token in ["unless-stopped", "Always", "on-failure:5"] {
            assert_eq!(
                resolve_restart_policy("web", token),
                Err(ConvertError::UnknownRestartPolicy {
                    service: String::from("web"),
                    policy: token.to_string(),
                })
            );
        }
    }

    #[test]
    fn test_security_context() {
        assert_eq!(
            security_context(true),
            Some(SecurityContext {
                privileged: Some(true)
            })
        );
        assert_eq!(security_context(false), None);
    }
}
