//! Verification method resolution.
//!
//! Dereferences a proof's `verificationMethod` through a [`DocumentLoader`],
//! follows the method's `controller` one hop, and recovers raw public key
//! bytes from `publicKeyMultibase`.

use serde_json::Value;

use vcdi_core::KeyMaterial;
use vcdi_vc::{ControllerDocument, VerificationMethodDocument};

use crate::error::ResolutionError;
use crate::loader::DocumentLoader;

/// Resolves verification methods and their controllers.
#[derive(Debug, Clone)]
pub struct VerificationMethodResolver<L> {
    loader: L,
}

impl<L: DocumentLoader> VerificationMethodResolver<L> {
    pub fn new(loader: L) -> Self {
        Self { loader }
    }

    /// Dereference `verification_method`.
    ///
    /// # Errors
    ///
    /// Propagates loader failures; returns [`ResolutionError::Malformed`]
    /// if the document is not an object or its members have the wrong
    /// shape.
    pub async fn resolve(&self, verification_method: &str) -> Result<VerificationMethodDocument, ResolutionError> {
        let document = self.loader.load(verification_method).await?;
        if !document.is_object() {
            return Err(ResolutionError::malformed(
                verification_method,
                "verification method is not a JSON object",
            ));
        }
        let method: VerificationMethodDocument = serde_json::from_value(document)
            .map_err(|e| ResolutionError::malformed(verification_method, e.to_string()))?;
        tracing::debug!(
            verification_method,
            method_type = method.method_type.as_deref().unwrap_or("<none>"),
            "resolved verification method"
        );
        Ok(method)
    }

    /// Follow `method.controller` one hop.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::Malformed`] if the method names no
    /// controller or the controller is not a JSON object, and propagates
    /// loader failures.
    pub async fn resolve_controller(
        &self,
        method: &VerificationMethodDocument,
    ) -> Result<ControllerDocument, ResolutionError> {
        let method_id = method.id.as_deref().unwrap_or("<verification method>");
        let controller = method
            .controller
            .as_deref()
            .ok_or_else(|| ResolutionError::malformed(method_id, "verification method has no controller"))?;

        let document = self.loader.load(controller).await?;
        let found = json_kind(&document);
        let document = ControllerDocument::from_value(document).ok_or_else(|| {
            ResolutionError::malformed(controller, format!("controller document is {found}, not an object"))
        })?;
        tracing::debug!(controller, "resolved controller document");
        Ok(document)
    }

    /// Raw public key of `verification_method`, multicodec prefix removed.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::Malformed`] if the method has no
    /// `publicKeyMultibase` and [`ResolutionError::Decode`] if the value is
    /// not valid multibase/multicodec.
    pub async fn public_key_material(&self, verification_method: &str) -> Result<KeyMaterial, ResolutionError> {
        let method = self.resolve(verification_method).await?;
        Self::key_material_of(verification_method, &method)
    }

    /// Key material of an already-resolved method.
    ///
    /// # Errors
    ///
    /// As for [`public_key_material`](Self::public_key_material), minus
    /// loading.
    fn key_material_of(
        verification_method: &str,
        method: &VerificationMethodDocument,
    ) -> Result<KeyMaterial, ResolutionError> {
        let encoded = method
            .public_key_multibase
            .as_deref()
            .ok_or_else(|| ResolutionError::malformed(verification_method, "verification method has no publicKeyMultibase"))?;
        KeyMaterial::from_multibase(encoded).map_err(|source| ResolutionError::Decode {
            url: verification_method.to_string(),
            source,
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
