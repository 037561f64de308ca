use super::SharedStore;
use crate::dispatcher::HandlerResponse;
use crate::handlers::ListContactsRequest;
use crate::typed::{Handler, TypedHandlerRequest};
use crate::views;
use minijinja::context;

/// GET /contacts (and the root alias): render every contact.
pub struct ListContactsController {
    pub store: SharedStore,
}

impl Handler for ListContactsController {
    type Request = ListContactsRequest;
    type Response = HandlerResponse;

    fn handle(&self, _req: TypedHandlerRequest<ListContactsRequest>) -> HandlerResponse {
        let contacts = self.store.all();
        views::page(200, "index.html", context! { contacts })
    }
}
