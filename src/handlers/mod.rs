mod types;

pub use types::{
    CreateContactRequest, EditContactFormRequest, ListContactsRequest, NewContactFormRequest,
    ShowContactRequest,
};
