//! Grant tokens proving a permission request succeeded.

use super::kind::DeviceCapability;
use super::provider::{CapabilityError, CapabilityProvider, CapabilityResult, PermissionStatus};
use log::{info, warn};

/// Proof that the user granted `capability` during this screen mount.
///
/// Has no public constructor; obtain one through [`acquire`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    capability: DeviceCapability,
}

impl AccessGrant {
    pub fn capability(&self) -> DeviceCapability {
        self.capability
    }

    /// Fails unless this grant was minted for `expected`.
    pub fn ensure(&self, expected: DeviceCapability) -> CapabilityResult<()> {
        if self.capability == expected {
            return Ok(());
        }
        warn!(
            "event=grant_check module=capability status=error expected={expected} granted={}",
            self.capability
        );
        Err(CapabilityError::GrantMismatch {
            expected,
            granted: self.capability,
        })
    }
}

/// Requests access from `provider` and mints a grant when allowed.
///
/// # Errors
/// - [`CapabilityError::Denied`] when the user refused.
/// - Any provider error from the permission request itself.
pub async fn acquire<P>(provider: &P) -> CapabilityResult<AccessGrant>
where
    P: CapabilityProvider + ?Sized,
{
    let capability = provider.capability();
    info!("event=permission_request module=capability status=start capability={capability}");

    match provider.request_access().await {
        Ok(PermissionStatus::Granted) => {
            info!("event=permission_request module=capability status=ok capability={capability}");
            Ok(AccessGrant { capability })
        }
        Ok(PermissionStatus::Denied) => {
            warn!(
                "event=permission_request module=capability status=denied capability={capability}"
            );
            Err(CapabilityError::Denied(capability))
        }
        Err(err) => {
            warn!(
                "event=permission_request module=capability status=error capability={capability} error={err}"
            );
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::acquire;
    use crate::capability::{
        CapabilityError, CapabilityProvider, CapabilityResult, DeviceCapability, PermissionStatus,
    };
    use async_trait::async_trait;

    struct FixedAnswer(CapabilityResult<PermissionStatus>);

    #[async_trait]
    impl CapabilityProvider for FixedAnswer {
        fn capability(&self) -> DeviceCapability {
            DeviceCapability::Camera
        }

        async fn request_access(&self) -> CapabilityResult<PermissionStatus> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn granted_answer_mints_grant_for_provider_capability() {
        let grant = acquire(&FixedAnswer(Ok(PermissionStatus::Granted)))
            .await
            .expect("grant");
        assert_eq!(grant.capability(), DeviceCapability::Camera);
    }

    #[tokio::test]
    async fn denied_answer_is_an_error() {
        let err = acquire(&FixedAnswer(Ok(PermissionStatus::Denied)))
            .await
            .expect_err("denied");
        assert_eq!(err, CapabilityError::Denied(DeviceCapability::Camera));
    }

    #[tokio::test]
    async fn provider_failure_passes_through() {
        let failure = CapabilityError::Provider("bridge offline".to_string());
        let err = acquire(&FixedAnswer(Err(failure.clone())))
            .await
            .expect_err("provider failure");
        assert_eq!(err, failure);
    }

    #[tokio::test]
    async fn grant_only_unlocks_its_own_capability() {
        let grant = acquire(&FixedAnswer(Ok(PermissionStatus::Granted)))
            .await
            .expect("grant");
        assert_eq!(grant.ensure(DeviceCapability::Camera), Ok(()));
        assert_eq!(
            grant.ensure(DeviceCapability::Location),
            Err(CapabilityError::GrantMismatch {
                expected: DeviceCapability::Location,
                granted: DeviceCapability::Camera,
            })
        );
    }
}
