// ── Control-plane seam ──
//
// The posture controller drives external controls only through this
// trait. Production plugs in the gateway client; tests substitute a
// recording fake.

use drguard_api::ControlClient;

/// Narrow command interface over the managed security controls.
///
/// Four idempotent verbs. The controller depends only on the ok/error
/// signal, never on wire shapes or response bodies.
#[allow(async_fn_in_trait)]
pub trait ControlPlane {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Switch the coarse-grained detector on or off.
    async fn update_detector(&self, detector_id: &str, enable: bool) -> Result<(), Self::Error>;

    /// Set one named sub-feature of the detector.
    async fn update_feature(
        &self,
        detector_id: &str,
        feature: &str,
        enable: bool,
    ) -> Result<(), Self::Error>;

    /// Bind the firewall policy to the protected endpoint.
    async fn associate(&self, resource_id: &str, web_acl_id: &str) -> Result<(), Self::Error>;

    /// Remove whatever firewall policy is bound to the endpoint.
    async fn disassociate(&self, resource_id: &str) -> Result<(), Self::Error>;
}

/// Borrowing callers (and tests) can share one control plane.
impl<C: ControlPlane> ControlPlane for &C {
    type Error = C::Error;

    async fn update_detector(&self, detector_id: &str, enable: bool) -> Result<(), Self::Error> {
        (**self).update_detector(detector_id, enable).await
    }

    async fn update_feature(
        &self,
        detector_id: &str,
        feature: &str,
        enable: bool,
    ) -> Result<(), Self::Error> {
        (**self).update_feature(detector_id, feature, enable).await
    }

    async fn associate(&self, resource_id: &str, web_acl_id: &str) -> Result<(), Self::Error> {
        (**self).associate(resource_id, web_acl_id).await
    }

    async fn disassociate(&self, resource_id: &str) -> Result<(), Self::Error> {
        (**self).disassociate(resource_id).await
    }
}

impl ControlPlane for ControlClient {
    type Error = drguard_api::Error;

    async fn update_detector(&self, detector_id: &str, enable: bool) -> Result<(), Self::Error> {
        ControlClient::update_detector(self, detector_id, enable).await
    }

    async fn update_feature(
        &self,
        detector_id: &str,
        feature: &str,
        enable: bool,
    ) -> Result<(), Self::Error> {
        ControlClient::update_feature(self, detector_id, feature, enable).await
    }

    async fn associate(&self, resource_id: &str, web_acl_id: &str) -> Result<(), Self::Error> {
        ControlClient::associate(self, resource_id, web_acl_id).await
    }

    async fn disassociate(&self, resource_id: &str) -> Result<(), Self::Error> {
        ControlClient::disassociate(self, resource_id).await
    }
}
