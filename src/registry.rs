//! The route table and handler registration, kept side by side: routes name
//! handlers, the registry binds those names to controller coroutines.

use crate::controllers::{
    CreateContactController, EditContactFormController, ListContactsController,
    NewContactFormController, ShowContactController,
};
use crate::dispatcher::Dispatcher;
use crate::router::Route;
use crate::store::ContactStore;
use http::Method;
use std::sync::Arc;

/// The application's RESTful surface. Order matters: the literal
/// `/contacts/new` must precede the parameterized `/contacts/{id}`.
pub fn routes() -> Vec<Route> {
    vec![
        Route::new(Method::GET, "/", "list_contacts"),
        Route::new(Method::GET, "/contacts", "list_contacts"),
        Route::new(Method::GET, "/contacts/new", "new_contact_form"),
        Route::new(Method::POST, "/contacts", "create_contact"),
        Route::new(Method::GET, "/contacts/{id}/edit", "edit_contact_form"),
        Route::new(Method::GET, "/contacts/{id}", "show_contact"),
    ]
}

/// Register every controller against the dispatcher.
///
/// # Safety
///
/// Spawns handler coroutines; the May runtime must be initialized first.
pub unsafe fn register_all(dispatcher: &mut Dispatcher, store: Arc<dyn ContactStore>) {
    dispatcher.register_typed(
        "list_contacts",
        ListContactsController {
            store: Arc::clone(&store),
        },
    );
    dispatcher.register_typed(
        "show_contact",
        ShowContactController {
            store: Arc::clone(&store),
        },
    );
    dispatcher.register_typed("new_contact_form", NewContactFormController);
    dispatcher.register_typed(
        "create_contact",
        CreateContactController {
            store: Arc::clone(&store),
        },
    );
    dispatcher.register_typed(
        "edit_contact_form",
        EditContactFormController { store },
    );
}
