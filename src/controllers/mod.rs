//! The five request handlers, one controller each, all stateless across
//! requests: every controller holds only its shared store handle.

mod create_contact;
mod edit_contact_form;
mod list_contacts;
mod new_contact_form;
mod show_contact;

pub use create_contact::CreateContactController;
pub use edit_contact_form::EditContactFormController;
pub use list_contacts::ListContactsController;
pub use new_contact_form::NewContactFormController;
pub use show_contact::ShowContactController;

use crate::store::ContactStore;
use std::sync::Arc;

/// Parse a path id; anything that is not a `u64` behaves like a lookup miss.
fn parse_id(raw: &str) -> Option<u64> {
    raw.parse().ok()
}

pub(crate) type SharedStore = Arc<dyn ContactStore>;
