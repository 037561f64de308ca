//! Typed request payloads, one per operation.
//!
//! Conversion from the raw [`HandlerRequest`] happens in the typed spawn
//! loop; a failed conversion answers 400 before the controller runs. Ids
//! stay strings here on purpose: a malformed id is a lookup miss (404), not
//! a bad request, so parsing belongs to the controller.

use crate::dispatcher::HandlerRequest;
use anyhow::anyhow;
use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct ListContactsRequest;

impl TryFrom<HandlerRequest> for ListContactsRequest {
    type Error = anyhow::Error;

    fn try_from(_req: HandlerRequest) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}

#[derive(Debug, Clone)]
pub struct ShowContactRequest {
    pub id: String,
}

impl TryFrom<HandlerRequest> for ShowContactRequest {
    type Error = anyhow::Error;

    fn try_from(req: HandlerRequest) -> Result<Self, Self::Error> {
        let id = req
            .get_path_param("id")
            .ok_or_else(|| anyhow!("missing id path parameter"))?
            .to_string();
        Ok(Self { id })
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewContactFormRequest;

impl TryFrom<HandlerRequest> for NewContactFormRequest {
    type Error = anyhow::Error;

    fn try_from(_req: HandlerRequest) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}

/// The submitted `contact` object, still untyped. The allow-list is applied
/// by the controller via `ContactFields::permit`; the object is required
/// here because a create without a `contact` key is a malformed request,
/// not a validation failure.
#[derive(Debug, Clone)]
pub struct CreateContactRequest {
    pub params: Value,
}

impl TryFrom<HandlerRequest> for CreateContactRequest {
    type Error = anyhow::Error;

    fn try_from(req: HandlerRequest) -> Result<Self, Self::Error> {
        let params = req
            .body
            .as_ref()
            .and_then(|b| b.get("contact"))
            .filter(|v| v.is_object())
            .cloned()
            .ok_or_else(|| anyhow!("missing contact object in request body"))?;
        Ok(Self { params })
    }
}

#[derive(Debug, Clone)]
pub struct EditContactFormRequest {
    pub id: String,
}

impl TryFrom<HandlerRequest> for EditContactFormRequest {
    type Error = anyhow::Error;

    fn try_from(req: HandlerRequest) -> Result<Self, Self::Error> {
        let id = req
            .get_path_param("id")
            .ok_or_else(|| anyhow!("missing id path parameter"))?
            .to_string();
        Ok(Self { id })
    }
}
