use super::SharedStore;
use crate::dispatcher::HandlerResponse;
use crate::handlers::CreateContactRequest;
use crate::model::ContactFields;
use crate::store::StoreError;
use crate::typed::{Handler, TypedHandlerRequest};
use crate::views;
use minijinja::context;
use tracing::{error, info};

/// POST /contacts: allow-list the submitted fields, ask the store to create.
///
/// Success redirects to the new record's show view. A validation failure is
/// recovered locally: the form re-renders with the rejected candidate and
/// its per-field messages, and nothing is persisted.
pub struct CreateContactController {
    pub store: SharedStore,
}

impl Handler for CreateContactController {
    type Request = CreateContactRequest;
    type Response = HandlerResponse;

    fn handle(&self, req: TypedHandlerRequest<CreateContactRequest>) -> HandlerResponse {
        let fields = ContactFields::permit(&req.data.params);
        match self.store.create(fields.clone()) {
            Ok(contact) => {
                info!(id = contact.id, "contact created");
                HandlerResponse::redirect(&format!("/contacts/{}", contact.id))
            }
            Err(StoreError::Invalid(errors)) => views::page(
                422,
                "new.html",
                context! {
                    contact => fields,
                    errors => errors.messages(),
                },
            ),
            Err(e) => {
                // create never reports NotFound; anything else is a bug
                error!(error = %e, "unexpected store error on create");
                HandlerResponse::error(500, "internal error")
            }
        }
    }
}
