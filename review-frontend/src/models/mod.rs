pub mod action;
pub mod document;
pub mod query;
pub mod user;

pub use action::{ActionDescriptor, ActionStyle, ActionType};
pub use document::{
    Document, DocumentPage, DocumentStatus, DocumentViewModel, FileUpload, NewDocument,
};
pub use query::{transform_sort_params, DocumentQuery, QueryError, SortDirection, SortableColumn};
pub use user::{Credentials, LoginResponse, Role, User};
