pub mod contact;
pub mod dashboard;
pub mod document;
pub mod invoice;
pub mod phase;
pub mod profile;
pub mod project;
pub mod task;
pub mod todo;
