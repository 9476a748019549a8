mod tools;

pub use tools::{Documents, GetDocumentRequest, SearchDocumentsRequest, RETRIEVAL_ERROR_TEXT};
