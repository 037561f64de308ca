use crate::dispatcher::HandlerResponse;
use crate::handlers::NewContactFormRequest;
use crate::model::ContactFields;
use crate::typed::{Handler, TypedHandlerRequest};
use crate::views;
use minijinja::context;

/// GET /contacts/new: a blank form for a fresh candidate.
pub struct NewContactFormController;

impl Handler for NewContactFormController {
    type Request = NewContactFormRequest;
    type Response = HandlerResponse;

    fn handle(&self, _req: TypedHandlerRequest<NewContactFormRequest>) -> HandlerResponse {
        views::page(
            200,
            "new.html",
            context! {
                contact => ContactFields::default(),
                errors => Vec::<String>::new(),
            },
        )
    }
}
