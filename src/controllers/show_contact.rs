use super::{parse_id, SharedStore};
use crate::dispatcher::HandlerResponse;
use crate::handlers::ShowContactRequest;
use crate::typed::{Handler, TypedHandlerRequest};
use crate::views;
use minijinja::context;

/// GET /contacts/{id}: render a single record, 404 when the id does not
/// resolve (including non-numeric ids).
pub struct ShowContactController {
    pub store: SharedStore,
}

impl Handler for ShowContactController {
    type Request = ShowContactRequest;
    type Response = HandlerResponse;

    fn handle(&self, req: TypedHandlerRequest<ShowContactRequest>) -> HandlerResponse {
        let Some(id) = parse_id(&req.data.id) else {
            return views::not_found();
        };
        match self.store.find(id) {
            Ok(contact) => views::page(200, "show.html", context! { contact }),
            Err(_) => views::not_found(),
        }
    }
}
