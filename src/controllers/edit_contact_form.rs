use super::{parse_id, SharedStore};
use crate::dispatcher::HandlerResponse;
use crate::handlers::EditContactFormRequest;
use crate::typed::{Handler, TypedHandlerRequest};
use crate::views;
use minijinja::context;

/// GET /contacts/{id}/edit: the form pre-filled with the record's current
/// values. There is no matching update action, so the form's submit target
/// is unrouted.
pub struct EditContactFormController {
    pub store: SharedStore,
}

impl Handler for EditContactFormController {
    type Request = EditContactFormRequest;
    type Response = HandlerResponse;

    fn handle(&self, req: TypedHandlerRequest<EditContactFormRequest>) -> HandlerResponse {
        let Some(id) = parse_id(&req.data.id) else {
            return views::not_found();
        };
        match self.store.find(id) {
            Ok(contact) => views::page(
                200,
                "edit.html",
                context! {
                    contact,
                    errors => Vec::<String>::new(),
                },
            ),
            Err(_) => views::not_found(),
        }
    }
}
